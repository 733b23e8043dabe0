//! Smoke tests for the efr-app service layer.

use std::path::PathBuf;

use efr_app::report;
use efr_app::{AppError, RunRequest, Workflows, execute, load_config, resolve, run_workflows};
use efr_project::schema::{CompositionDef, Config, IntegrationDef};

fn params_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.pop();
    path.push("params");
    path.push("blend3.yaml");
    path
}

/// Blend3 with a short, coarse run so the smoke tests stay quick.
fn quick_config() -> Config {
    let mut config = Config::blend3();
    config.reactor.time_duration_s = 1.0;
    config.reactor.n_cstrs = 4;
    config.reactor.integration = Some(IntegrationDef {
        max_step_s: Some(0.05),
        max_steps: None,
        steady_tol: None,
    });
    if let Some(sa) = config.sensitivity_analysis.as_mut() {
        sa.n_samples = 2;
        sa.names.truncate(3);
        sa.bounds.truncate(3);
        sa.num_resamples = 10;
    }
    config
}

#[test]
fn load_blend3_params() {
    let config = load_config(&params_path()).expect("Failed to load parameters");
    assert_eq!(config.info.feedstock_name, "Blend3");
    let text = report::general_info(&config);
    assert!(text.contains("Entrained Flow Reactor (EFR)"));
}

#[test]
fn no_workflow_only_resolves_composition() {
    let response = execute(&RunRequest::new(Config::blend3())).unwrap();
    assert!(response.batch.is_none());
    assert!(response.efr.is_none());
    assert!(response.sensitivity.is_none());
    assert!(response.timings.is_empty());

    let table = report::ultimate_table(&response.resolved.bases).unwrap();
    assert!(table.contains("moisture"));
    let comp = report::composition_report(&response.resolved, response.method.label()).unwrap();
    assert!(comp.contains("% dry"));
    assert!(comp.contains("triglycerides"));
}

#[test]
fn characterization_report_lists_mixtures() {
    let mut request = RunRequest::new(Config::blend3());
    request.composition = Some(CompositionDef::Ultmod);
    let response = execute(&request).unwrap();
    let comp = report::composition_report(&response.resolved, response.method.label()).unwrap();
    assert!(comp.contains("y_rm1"));
    assert!(comp.contains("parameter file"));
}

#[test]
fn batch_and_efr_reports() {
    let mut request = RunRequest::new(quick_config());
    request.workflows = Workflows {
        batch: true,
        efr: true,
        sensitivity: false,
    };
    let response = execute(&request).unwrap();
    assert_eq!(response.timings.len(), 2);

    let batch = response.batch.as_ref().unwrap();
    let params = efr_app::compile::batch_params(&request.config.reactor);
    let text = report::batch_report(&params, batch).unwrap();
    assert!(text.contains("101,325 Pa"));
    assert!(text.contains("energy        = off"));

    let efr = response.efr.as_ref().unwrap();
    assert_eq!(efr.stages.len(), 4);
    let params = efr_app::compile::efr_params(&request.config.reactor);
    let text = report::efr_report(&params, efr).unwrap();
    assert!(text.contains("Final mass fractions without N2"));
    assert!(text.contains("96.0"));
}

#[test]
fn sensitivity_report_tables() {
    let mut request = RunRequest::new(quick_config());
    request.workflows.sensitivity = true;
    let response = execute(&request).unwrap();

    let run = response.sensitivity.as_ref().unwrap();
    assert_eq!(run.shape(), (16, 3));
    let text = report::sensitivity_report(run).unwrap();
    assert!(text.contains("shape     = (16, 3)"));
    for output in ["gas", "liquid", "solid"] {
        assert!(text.contains(&format!("Sobol analysis for {output}:")));
    }
    assert!(text.contains("CELL"));
}

#[test]
fn sensitivity_without_section_fails() {
    let mut config = quick_config();
    config.sensitivity_analysis = None;
    let mut request = RunRequest::new(config);
    request.workflows.sensitivity = true;
    assert!(matches!(
        execute(&request),
        Err(efr_app::AppError::MissingSection(_))
    ));
}

#[test]
fn composition_resolves_before_any_workflow_runs() {
    let mut request = RunRequest::new(quick_config());
    request.mechanism = Some(PathBuf::from("does/not/exist.yaml"));
    request.workflows.batch = true;

    // The feedstock is available for reporting even though the engine cannot be built.
    let (method, resolved) = resolve(&request).unwrap();
    let table = report::ultimate_table(&resolved.bases).unwrap();
    assert!(table.contains("Ultimate analysis"));
    let comp = report::composition_report(&resolved, method.label()).unwrap();
    assert!(comp.contains("Biomass composition"));

    assert!(matches!(
        run_workflows(&request, method, resolved),
        Err(AppError::Mechanism { .. })
    ));
}

#[test]
fn split_run_matches_execute() {
    let request = RunRequest::new(Config::blend3());
    let (method, resolved) = resolve(&request).unwrap();
    let split = run_workflows(&request, method, resolved).unwrap();
    let whole = execute(&request).unwrap();
    assert_eq!(split.method, whole.method);
    assert_eq!(split.resolved, whole.resolved);
}
