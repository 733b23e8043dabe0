//! Shared application service layer for the pyrolysis reactor models.
//!
//! Turns a validated parameter file into typed run parameters, runs the batch,
//! entrained-flow and sensitivity workflows, and formats their summaries.

pub mod compile;
pub mod error;
pub mod project_service;
pub mod report;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use project_service::{composition_method, load_config, resolve_feedstock, ultimate_analysis};
pub use run_service::{RunRequest, RunResponse, Workflows, execute, resolve, run_workflows};
