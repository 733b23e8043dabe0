//! Error types for the efr-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Parameter file error: {0}")]
    Project(String),

    #[error("Failed to load mechanism: {path}")]
    Mechanism {
        path: PathBuf,
        #[source]
        source: efr_kinetics::KineticsError,
    },

    #[error("Feedstock error: {0}")]
    Feedstock(String),

    #[error("Kinetics error: {0}")]
    Kinetics(String),

    #[error("Reactor error: {0}")]
    Reactor(String),

    #[error("Sensitivity error: {0}")]
    Sensitivity(String),

    #[error("Missing section: {0}")]
    MissingSection(&'static str),

    #[error("Report formatting failed")]
    Report(#[from] std::fmt::Error),
}

/// Result type for efr-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<efr_project::ProjectError> for AppError {
    fn from(err: efr_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<efr_feedstock::FeedstockError> for AppError {
    fn from(err: efr_feedstock::FeedstockError) -> Self {
        AppError::Feedstock(err.to_string())
    }
}

impl From<efr_kinetics::KineticsError> for AppError {
    fn from(err: efr_kinetics::KineticsError) -> Self {
        AppError::Kinetics(err.to_string())
    }
}

impl From<efr_reactor::ReactorError> for AppError {
    fn from(err: efr_reactor::ReactorError) -> Self {
        AppError::Reactor(err.to_string())
    }
}

impl From<efr_sensitivity::SensitivityError> for AppError {
    fn from(err: efr_sensitivity::SensitivityError) -> Self {
        AppError::Sensitivity(err.to_string())
    }
}
