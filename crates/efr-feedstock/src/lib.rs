//! efr-feedstock: biomass feedstock characterization.
//!
//! Provides:
//! - Ultimate analysis basis conversion (as-received → dry → daf → daf CHO)
//! - Chemical analysis renormalization to a dry ash-free basis
//! - Reference-mixture biomass characterization from C and H mass fractions
//! - The canonical 7-component [`BiomassComposition`]
//! - [`CompositionMethod`] to select how a composition is resolved
//!
//! # Example
//!
//! ```
//! use efr_feedstock::{ChemicalAnalysis, CompositionMethod, UltimateAnalysis, resolve_composition};
//!
//! let ultimate = UltimateAnalysis::new([49.52, 5.28, 38.35, 0.15, 0.02, 0.64, 6.04]);
//! let chemical = ChemicalAnalysis {
//!     cellulose: 38.95,
//!     hemicellulose: 23.12,
//!     lignin_c: 0.0,
//!     lignin_h: 14.74,
//!     lignin_o: 14.74,
//!     tannins: 0.0,
//!     triglycerides: 7.83,
//!     ash: 0.63,
//! };
//! let resolved = resolve_composition(&CompositionMethod::Chemical(chemical), &ultimate).unwrap();
//! assert!((resolved.composition.sum() - 1.0).abs() < 1e-9);
//! ```

pub mod basis;
pub mod characterization;
pub mod chemical;
pub mod composition;
pub mod error;
pub mod resolver;

pub use basis::{UltimateAnalysis, UltimateAnalysisBases};
pub use characterization::{Characterization, ReferenceMixtures, ShapeParameters, characterize};
pub use chemical::{ChemicalAnalysis, ChemicalAnalysisDaf};
pub use composition::{BiomassComponent, BiomassComposition};
pub use error::{FeedstockError, FeedstockResult};
pub use resolver::{CompositionMethod, ResolutionDetail, ResolvedComposition, resolve_composition};
