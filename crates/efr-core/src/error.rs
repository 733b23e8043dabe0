use thiserror::Error;

pub type EfrResult<T> = Result<T, EfrError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EfrError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Degenerate divisor while computing {what}: {value}")]
    Domain { what: &'static str, value: f64 },

    #[error("Length mismatch for {what} (expected={expected}, got={got})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}
