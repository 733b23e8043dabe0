//! Error types for sensitivity analysis.

use efr_feedstock::FeedstockError;
use efr_reactor::ReactorError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensitivityError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Sobol sequence supports at most {max} dimensions, {requested} requested")]
    UnsupportedDimension { requested: usize, max: usize },

    #[error("Design row {row} cannot be rescaled: sum = {sum}")]
    DegenerateRow { row: usize, sum: f64 },

    #[error("Output {output} has zero variance")]
    ZeroVariance { output: String },

    #[error("Output length {got} does not match a design of {expected} rows")]
    OutputLength { expected: usize, got: usize },

    #[error("Sample {row} failed: {source}")]
    Sample {
        row: usize,
        #[source]
        source: ReactorError,
    },

    #[error("Every base sample was skipped after failures")]
    AllSamplesFailed,

    #[error("Reactor error: {0}")]
    Reactor(#[from] ReactorError),

    #[error("Feedstock error: {0}")]
    Feedstock(#[from] FeedstockError),
}

pub type SensitivityResult<T> = Result<T, SensitivityError>;
