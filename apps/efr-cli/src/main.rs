use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use efr_app::{AppResult, RunRequest, Workflows, compile, project_service, report, run_service};
use efr_core::timing::Timer;
use efr_project::schema::CompositionDef;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Biocomp {
    /// Chemical analysis data
    Chem,
    /// Characterization from the ultimate analysis
    Ult,
    /// Characterization with yc, yh and shape parameters from the file
    Ultmod,
}

impl From<Biocomp> for CompositionDef {
    fn from(b: Biocomp) -> Self {
        match b {
            Biocomp::Chem => CompositionDef::Chem,
            Biocomp::Ult => CompositionDef::Ult,
            Biocomp::Ultmod => CompositionDef::Ultmod,
        }
    }
}

#[derive(Parser)]
#[command(name = "efr-cli")]
#[command(about = "Biomass pyrolysis in batch and entrained flow reactors", long_about = None)]
struct Cli {
    /// Path to the parameter file (YAML or JSON)
    params: PathBuf,
    /// Biomass composition strategy (defaults to the file's setting)
    #[arg(long, value_enum)]
    biocomp: Option<Biocomp>,
    /// Run the batch reactor model
    #[arg(long)]
    batch: bool,
    /// Run the Sobol sensitivity analysis of the batch reactor
    #[arg(long, alias = "sensanalysis")]
    sensitivity: bool,
    /// Run the entrained flow reactor model
    #[arg(long, alias = "efrmodel")]
    efr: bool,
    /// Kinetics mechanism file overriding the parameter file
    #[arg(long)]
    mechanism: Option<PathBuf>,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let timer = Timer::start("efr");

    let config = project_service::load_config(&cli.params)?;
    tracing::info!("{}", report::general_info(&config));

    let mut request = RunRequest::new(config);
    request.base_dir = cli.params.parent().map(PathBuf::from);
    request.composition = cli.biocomp.map(CompositionDef::from);
    request.mechanism = cli.mechanism;
    request.workflows = Workflows {
        batch: cli.batch,
        efr: cli.efr,
        sensitivity: cli.sensitivity,
    };

    let (method, resolved) = run_service::resolve(&request)?;
    tracing::info!("{}", report::ultimate_table(&resolved.bases)?);
    tracing::info!("{}", report::composition_report(&resolved, method.label())?);

    let response = run_service::run_workflows(&request, method, resolved)?;
    let reactor = &request.config.reactor;
    if let Some(run) = &response.batch {
        tracing::info!("{}", report::batch_report(&compile::batch_params(reactor), run)?);
    }
    if let Some(run) = &response.sensitivity {
        tracing::info!("{}", report::sensitivity_report(run)?);
    }
    if let Some(run) = &response.efr {
        tracing::info!("{}", report::efr_report(&compile::efr_params(reactor), run)?);
    }

    tracing::info!("{}", report::done_report(&timer.stop()));
    Ok(())
}
