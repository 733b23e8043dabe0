//! Batch reactor driver.

use crate::adapter::{SpeciesSeries, run_batch_protocol};
use crate::error::{ReactorError, ReactorResult};
use crate::params::BatchParams;
use crate::phases::{Phase, PhaseIndex, PhasePoint, PhaseSpecies, PhaseYields, aggregate};
use efr_core::numeric::Tolerances;
use efr_feedstock::BiomassComposition;
use efr_kinetics::KineticsEngine;

/// Outputs of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    /// Per-species states on the time grid.
    pub series: SpeciesSeries,
    pub yields: PhaseYields,
    pub final_yields: PhasePoint,
    /// Final `(species, mass fraction)` of each phase's members.
    pub final_species: Vec<(Phase, Vec<(String, f64)>)>,
}

impl BatchRun {
    pub fn times(&self) -> &[f64] {
        &self.series.index
    }
}

/// Run the batch protocol and aggregate phases with the softwood lists.
pub fn run_batch<E: KineticsEngine>(
    engine: &E,
    composition: &BiomassComposition,
    params: &BatchParams,
) -> ReactorResult<BatchRun> {
    let index = PhaseSpecies::softwood().resolve(engine.mechanism())?;
    run_batch_with_phases(engine, composition, params, &index)
}

pub fn run_batch_with_phases<E: KineticsEngine>(
    engine: &E,
    composition: &BiomassComposition,
    params: &BatchParams,
    index: &PhaseIndex,
) -> ReactorResult<BatchRun> {
    let series = run_batch_protocol(engine, composition, params)?;
    let yields = aggregate(index, &series.states);
    if let Err(e) = yields.check_closure(Tolerances::CLOSURE) {
        tracing::warn!(error = %e, "batch phase sums drift from 1");
    }

    let last = series.last().ok_or_else(|| ReactorError::InvalidArg {
        what: "batch run produced no states".to_string(),
    })?;
    let final_yields = index.point(&last.mass_fractions);
    let final_species = Phase::ALL
        .iter()
        .map(|p| (*p, index.breakdown(*p, &last.mass_fractions)))
        .collect();

    tracing::info!(
        gas = final_yields.gas,
        liquid = final_yields.liquid,
        solid = final_yields.solid,
        metaplastic = final_yields.metaplastic,
        "batch run finished"
    );

    Ok(BatchRun {
        series,
        yields,
        final_yields,
        final_species,
    })
}

/// Final phase sums only; nothing else is retained.
pub fn batch_final_yields<E: KineticsEngine>(
    engine: &E,
    composition: &BiomassComposition,
    params: &BatchParams,
    index: &PhaseIndex,
) -> ReactorResult<PhasePoint> {
    let series = run_batch_protocol(engine, composition, params)?;
    series
        .last()
        .map(|s| index.point(&s.mass_fractions))
        .ok_or_else(|| ReactorError::InvalidArg {
            what: "batch run produced no states".to_string(),
        })
}
