//! efr-reactor: batch and entrained-flow pyrolysis reactor drivers.
//!
//! Provides:
//! - Typed reactor parameters ([`BatchParams`], [`EfrParams`])
//! - The engine adapter mapping a [`efr_feedstock::BiomassComposition`] onto
//!   mechanism species and stepping reactors
//! - Phase aggregation (gas, liquid, solid, metaplastic) with carrier-free basis
//! - Batch and entrained-flow drivers, the latter compared to measured yields

pub mod adapter;
pub mod batch;
pub mod efr;
pub mod error;
pub mod params;
pub mod phases;

pub use adapter::{
    FEED_SPECIES, SpeciesSeries, StageChain, StageRecord, feed_mass_fractions,
    run_batch_protocol, run_stage_chain,
};
pub use batch::{BatchRun, batch_final_yields, run_batch, run_batch_with_phases};
pub use efr::{EFR_REFERENCE, EfrRun, ReferenceYields, YieldComparison, run_efr};
pub use error::{ReactorError, ReactorResult};
pub use params::{BATCH_TIME_POINTS, BatchParams, EfrParams};
pub use phases::{
    Phase, PhaseIndex, PhasePoint, PhaseSpecies, PhaseYields, aggregate, aggregate_carrier_free,
};
