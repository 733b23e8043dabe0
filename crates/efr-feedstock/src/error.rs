//! Feedstock characterization errors.

use efr_core::EfrError;
use thiserror::Error;

/// Result type for feedstock operations.
pub type FeedstockResult<T> = Result<T, FeedstockError>;

/// Errors raised while converting bases or resolving a composition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedstockError {
    /// Degenerate input, e.g. a basis whose excluded component is the whole sample.
    #[error("Input domain error: {0}")]
    Domain(#[from] EfrError),

    /// A composition failed its closure or sign checks.
    #[error("Composition invariant violated: {what} (sum={sum})")]
    CompositionInvariant { what: &'static str, sum: f64 },

    /// Carbon/hydrogen point cannot be reached by the reference mixtures.
    #[error(
        "Characterization outside reference mixtures: yc={yc}, yh={yh} gives y_rm={y_rm:?}"
    )]
    OutsideReferenceMixtures { yc: f64, yh: f64, y_rm: [f64; 3] },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Linear solve for the reference-mixture fractions failed.
    #[error("Singular reference-mixture system for shape parameters {what}")]
    Singular { what: String },
}
