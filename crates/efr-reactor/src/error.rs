//! Error types for reactor drivers.

use efr_feedstock::FeedstockError;
use efr_kinetics::KineticsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReactorError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Unknown {phase} species in mechanism: {name}")]
    UnknownSpecies { phase: &'static str, name: String },

    #[error("Species {name} is listed in more than one phase")]
    OverlappingPhases { name: String },

    #[error("Phase closure violated at index {index}: sum = {sum}")]
    PhaseClosure { index: usize, sum: f64 },

    #[error("Degenerate carrier-free basis at index {index}: biomass fraction = {value}")]
    CarrierFreeBasis { index: usize, value: f64 },

    #[error("Stage {stage} failed: {source}")]
    Stage {
        stage: usize,
        #[source]
        source: KineticsError,
    },

    #[error("Kinetics error: {0}")]
    Kinetics(#[from] KineticsError),

    #[error("Feedstock error: {0}")]
    Feedstock(#[from] FeedstockError),
}

pub type ReactorResult<T> = Result<T, ReactorError>;

impl ReactorError {
    /// True when the kinetics engine failed to converge (including within a stage).
    pub fn is_convergence_failure(&self) -> bool {
        match self {
            ReactorError::Kinetics(e) => e.is_convergence_failure(),
            ReactorError::Stage { source, .. } => source.is_convergence_failure(),
            _ => false,
        }
    }
}
