//! Error types for kinetics operations.

use thiserror::Error;

/// Errors raised by the kinetics engine and its reactors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KineticsError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Unknown species: {name}")]
    UnknownSpecies { name: String },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },

    #[error("Mechanism error: {what}")]
    Mechanism { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Step budget exhausted after {steps} steps: {what}")]
    BudgetExhausted { steps: usize, what: &'static str },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type KineticsResult<T> = Result<T, KineticsError>;

impl From<serde_yaml::Error> for KineticsError {
    fn from(e: serde_yaml::Error) -> Self {
        KineticsError::Mechanism {
            what: e.to_string(),
        }
    }
}

impl From<std::io::Error> for KineticsError {
    fn from(e: std::io::Error) -> Self {
        KineticsError::Mechanism {
            what: e.to_string(),
        }
    }
}

impl KineticsError {
    /// True for failures of the numerical integration (as opposed to bad input).
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            KineticsError::ConvergenceFailed { .. } | KineticsError::BudgetExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergence_failures_are_classified() {
        let err = KineticsError::BudgetExhausted {
            steps: 10,
            what: "batch reactor",
        };
        assert!(err.is_convergence_failure());
        assert!(err.to_string().contains("10 steps"));

        let err = KineticsError::UnknownSpecies {
            name: "XYZ".into(),
        };
        assert!(!err.is_convergence_failure());
    }
}
