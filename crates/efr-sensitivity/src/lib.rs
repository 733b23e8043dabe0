//! efr-sensitivity: variance-based sensitivity of batch yields to composition.
//!
//! Provides:
//! - [`Problem`] definition (names, bounds)
//! - Sobol low-discrepancy sequence and the Saltelli design
//! - Simplex rescaling of design rows
//! - First- and total-order Sobol indices with bootstrap confidence
//! - A driver running one batch reactor per design row, optionally in parallel

pub mod analyze;
pub mod driver;
pub mod error;
pub mod problem;
pub mod saltelli;
pub mod sobol_seq;

pub use analyze::{AnalysisOptions, SobolIndices, analyze};
pub use driver::{
    FailurePolicy, OUTPUTS, SensitivityOptions, SensitivityRun, parameter_components,
    run_sensitivity, sample_design,
};
pub use error::{SensitivityError, SensitivityResult};
pub use problem::Problem;
pub use saltelli::{
    DEFAULT_SKIP, SaltelliDesign, SamplingScheme, rescale_row, rescale_to_simplex,
    rows_per_sample,
};
pub use sobol_seq::{MAX_DIMENSION, SobolSequence};
