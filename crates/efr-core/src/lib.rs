//! efr-core: shared foundation for the pyrolysis reactor models.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - timing (wall-clock timers for run summaries)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{EfrError, EfrResult};
pub use numeric::*;
pub use units::*;
