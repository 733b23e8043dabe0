//! Run services for the three workflows.

use std::path::PathBuf;

use efr_core::timing::{Elapsed, Timer};
use efr_feedstock::{CompositionMethod, ResolvedComposition};
use efr_kinetics::LumpedEngine;
use efr_project::schema::{CompositionDef, Config};
use efr_reactor::{BatchRun, EfrRun};
use efr_sensitivity::SensitivityRun;

use crate::compile;
use crate::error::AppResult;
use crate::project_service;

/// Which workflows a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Workflows {
    pub batch: bool,
    pub efr: bool,
    pub sensitivity: bool,
}

impl Workflows {
    pub fn any(&self) -> bool {
        self.batch || self.efr || self.sensitivity
    }
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub config: Config,
    /// Directory relative mechanism paths are resolved against.
    pub base_dir: Option<PathBuf>,
    pub composition: Option<CompositionDef>,
    pub mechanism: Option<PathBuf>,
    pub workflows: Workflows,
}

impl RunRequest {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            base_dir: None,
            composition: None,
            mechanism: None,
            workflows: Workflows::default(),
        }
    }
}

#[derive(Debug)]
pub struct RunResponse {
    pub method: CompositionMethod,
    pub resolved: ResolvedComposition,
    pub batch: Option<BatchRun>,
    pub efr: Option<EfrRun>,
    pub sensitivity: Option<SensitivityRun>,
    pub timings: Vec<Elapsed>,
}

pub fn run_batch(engine: &LumpedEngine, config: &Config, resolved: &ResolvedComposition) -> AppResult<BatchRun> {
    let params = compile::batch_params(&config.reactor);
    Ok(efr_reactor::run_batch(engine, &resolved.composition, &params)?)
}

pub fn run_efr(engine: &LumpedEngine, config: &Config, resolved: &ResolvedComposition) -> AppResult<EfrRun> {
    let params = compile::efr_params(&config.reactor);
    Ok(efr_reactor::run_efr(engine, &resolved.composition, &params)?)
}

/// Sobol analysis of the batch reactor over the composition parameters.
pub fn run_sensitivity(engine: &LumpedEngine, config: &Config) -> AppResult<SensitivityRun> {
    let sa = compile::sensitivity_section(config)?;
    let problem = compile::problem(sa)?;
    let options = compile::sensitivity_options(sa);
    let params = compile::batch_params(&config.reactor);
    Ok(efr_sensitivity::run_sensitivity(engine, &problem, &params, &options)?)
}

/// Composition strategy and resolved feedstock of a request.
pub fn resolve(request: &RunRequest) -> AppResult<(CompositionMethod, ResolvedComposition)> {
    let method = project_service::composition_method(&request.config, request.composition);
    let resolved = project_service::resolve_feedstock(&request.config, &method)?;
    Ok((method, resolved))
}

/// Resolve the feedstock, then run every requested workflow in order.
pub fn execute(request: &RunRequest) -> AppResult<RunResponse> {
    let (method, resolved) = resolve(request)?;
    run_workflows(request, method, resolved)
}

/// Run the requested workflows on an already resolved feedstock.
pub fn run_workflows(
    request: &RunRequest,
    method: CompositionMethod,
    resolved: ResolvedComposition,
) -> AppResult<RunResponse> {
    let config = &request.config;
    let mut response = RunResponse {
        method,
        resolved,
        batch: None,
        efr: None,
        sensitivity: None,
        timings: Vec::new(),
    };
    if !request.workflows.any() {
        return Ok(response);
    }

    let engine = compile::build_engine(
        config,
        request.base_dir.as_deref(),
        request.mechanism.as_deref(),
    )?;

    if request.workflows.batch {
        let timer = Timer::start("batch");
        response.batch = Some(run_batch(&engine, config, &response.resolved)?);
        response.timings.push(timer.stop());
    }
    if request.workflows.sensitivity {
        let timer = Timer::start("sensitivity");
        response.sensitivity = Some(run_sensitivity(&engine, config)?);
        response.timings.push(timer.stop());
    }
    if request.workflows.efr {
        let timer = Timer::start("efr");
        response.efr = Some(run_efr(&engine, config, &response.resolved)?);
        response.timings.push(timer.stop());
    }
    for elapsed in &response.timings {
        tracing::debug!(workflow = elapsed.label, seconds = elapsed.seconds, "workflow finished");
    }

    Ok(response)
}
