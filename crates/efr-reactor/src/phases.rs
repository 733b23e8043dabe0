//! Phase aggregation of per-species mass fractions.
//!
//! Species are grouped into gas, liquid, solid and metaplastic phases by fixed
//! membership lists. The lists are resolved against a mechanism once, so a
//! missing species is reported up front instead of silently reading zero.

use crate::error::{ReactorError, ReactorResult};
use efr_core::numeric::{Tolerances, nearly_equal};
use efr_kinetics::{Mechanism, ThermoState, phases};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Gas,
    Liquid,
    Solid,
    Metaplastic,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Gas, Phase::Liquid, Phase::Solid, Phase::Metaplastic];

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Gas => "gas",
            Phase::Liquid => "liquid",
            Phase::Solid => "solid",
            Phase::Metaplastic => "metaplastic",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Species names per phase, plus an optional inert carrier counted as gas.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSpecies {
    pub gas: Vec<String>,
    pub liquid: Vec<String>,
    pub solid: Vec<String>,
    pub metaplastic: Vec<String>,
    pub carrier: Option<String>,
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}

impl PhaseSpecies {
    /// Phases of the built-in softwood scheme, without a carrier gas.
    pub fn softwood() -> Self {
        Self {
            gas: owned(phases::gases()),
            liquid: owned(phases::liquids()),
            solid: owned(phases::solids()),
            metaplastic: owned(phases::metaplastics()),
            carrier: None,
        }
    }

    /// Softwood phases with the carrier gas counted in the gas phase.
    pub fn softwood_with_carrier() -> Self {
        let mut p = Self::softwood();
        p.gas.push(phases::CARRIER.to_string());
        p.carrier = Some(phases::CARRIER.to_string());
        p
    }

    /// Same lists with the metaplastics counted as solid.
    pub fn metaplastics_as_solid(mut self) -> Self {
        let meta = std::mem::take(&mut self.metaplastic);
        self.solid.extend(meta);
        self
    }

    pub fn members(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::Gas => &self.gas,
            Phase::Liquid => &self.liquid,
            Phase::Solid => &self.solid,
            Phase::Metaplastic => &self.metaplastic,
        }
    }

    /// Resolve names to mechanism indices.
    pub fn resolve(&self, mechanism: &Mechanism) -> ReactorResult<PhaseIndex> {
        let mut seen = HashSet::new();
        let mut members: [Vec<(String, usize)>; 4] = Default::default();

        for phase in Phase::ALL {
            for name in self.members(phase) {
                if !seen.insert(name.as_str()) {
                    return Err(ReactorError::OverlappingPhases { name: name.clone() });
                }
                let i = mechanism
                    .species_index(name)
                    .ok_or_else(|| ReactorError::UnknownSpecies {
                        phase: phase.label(),
                        name: name.clone(),
                    })?;
                members[phase_slot(phase)].push((name.clone(), i));
            }
        }

        let carrier = match &self.carrier {
            Some(name) => {
                if !self.gas.contains(name) {
                    return Err(ReactorError::InvalidArg {
                        what: format!("carrier '{name}' must be a gas-phase species"),
                    });
                }
                Some(mechanism.species_index(name).ok_or_else(|| {
                    ReactorError::UnknownSpecies {
                        phase: "carrier",
                        name: name.clone(),
                    }
                })?)
            }
            None => None,
        };

        Ok(PhaseIndex { members, carrier })
    }
}

fn phase_slot(phase: Phase) -> usize {
    match phase {
        Phase::Gas => 0,
        Phase::Liquid => 1,
        Phase::Solid => 2,
        Phase::Metaplastic => 3,
    }
}

/// Phase sums at one time point or stage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhasePoint {
    pub gas: f64,
    pub liquid: f64,
    pub solid: f64,
    pub metaplastic: f64,
}

impl PhasePoint {
    pub fn total(&self) -> f64 {
        self.gas + self.liquid + self.solid + self.metaplastic
    }

    pub fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Gas => self.gas,
            Phase::Liquid => self.liquid,
            Phase::Solid => self.solid,
            Phase::Metaplastic => self.metaplastic,
        }
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            gas: self.gas * factor,
            liquid: self.liquid * factor,
            solid: self.solid * factor,
            metaplastic: self.metaplastic * factor,
        }
    }
}

/// Phase membership resolved to species indices.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseIndex {
    members: [Vec<(String, usize)>; 4],
    carrier: Option<usize>,
}

impl PhaseIndex {
    pub fn sum(&self, phase: Phase, y: &[f64]) -> f64 {
        self.members[phase_slot(phase)]
            .iter()
            .map(|(_, i)| y.get(*i).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn point(&self, y: &[f64]) -> PhasePoint {
        PhasePoint {
            gas: self.sum(Phase::Gas, y),
            liquid: self.sum(Phase::Liquid, y),
            solid: self.sum(Phase::Solid, y),
            metaplastic: self.sum(Phase::Metaplastic, y),
        }
    }

    pub fn carrier_fraction(&self, y: &[f64]) -> f64 {
        self.carrier
            .and_then(|i| y.get(i).copied())
            .unwrap_or(0.0)
    }

    /// Phase sums with the carrier removed from the gas and every phase divided
    /// by the remaining biomass-derived mass, so the result sums to 1.
    pub fn carrier_free_point(&self, y: &[f64], index: usize) -> ReactorResult<PhasePoint> {
        let mut p = self.point(y);
        let carrier = self.carrier_fraction(y);
        let biomass = p.total() - carrier;
        if !(biomass.is_finite() && biomass > 0.0) {
            return Err(ReactorError::CarrierFreeBasis {
                index,
                value: biomass,
            });
        }
        p.gas -= carrier;
        Ok(p.scaled(1.0 / biomass))
    }

    /// `(name, mass fraction)` of every member of `phase`.
    pub fn breakdown(&self, phase: Phase, y: &[f64]) -> Vec<(String, f64)> {
        self.members[phase_slot(phase)]
            .iter()
            .map(|(name, i)| (name.clone(), y.get(*i).copied().unwrap_or(0.0)))
            .collect()
    }
}

/// Four parallel phase series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseYields {
    pub gas: Vec<f64>,
    pub liquid: Vec<f64>,
    pub solid: Vec<f64>,
    pub metaplastic: Vec<f64>,
}

impl PhaseYields {
    fn push(&mut self, p: PhasePoint) {
        self.gas.push(p.gas);
        self.liquid.push(p.liquid);
        self.solid.push(p.solid);
        self.metaplastic.push(p.metaplastic);
    }

    pub fn len(&self) -> usize {
        self.gas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gas.is_empty()
    }

    pub fn point(&self, i: usize) -> Option<PhasePoint> {
        Some(PhasePoint {
            gas: *self.gas.get(i)?,
            liquid: *self.liquid.get(i)?,
            solid: *self.solid.get(i)?,
            metaplastic: *self.metaplastic.get(i)?,
        })
    }

    pub fn last(&self) -> Option<PhasePoint> {
        self.len().checked_sub(1).and_then(|i| self.point(i))
    }

    pub fn series(&self, phase: Phase) -> &[f64] {
        match phase {
            Phase::Gas => &self.gas,
            Phase::Liquid => &self.liquid,
            Phase::Solid => &self.solid,
            Phase::Metaplastic => &self.metaplastic,
        }
    }

    /// Fail on the first index whose four phases do not sum to 1.
    pub fn check_closure(&self, tol: Tolerances) -> ReactorResult<()> {
        for i in 0..self.len() {
            let sum = self.point(i).map_or(f64::NAN, |p| p.total());
            if !nearly_equal(sum, 1.0, tol) {
                return Err(ReactorError::PhaseClosure { index: i, sum });
            }
        }
        Ok(())
    }
}

/// Carrier-inclusive phase sums of every state.
pub fn aggregate(index: &PhaseIndex, states: &[ThermoState]) -> PhaseYields {
    let mut out = PhaseYields::default();
    for s in states {
        out.push(index.point(&s.mass_fractions));
    }
    out
}

/// Carrier-free phase fractions of every state.
pub fn aggregate_carrier_free(
    index: &PhaseIndex,
    states: &[ThermoState],
) -> ReactorResult<PhaseYields> {
    let mut out = PhaseYields::default();
    for (i, s) in states.iter().enumerate() {
        out.push(index.carrier_free_point(&s.mass_fractions, i)?);
    }
    Ok(out)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn any_closed_state_aggregates_to_one(
            weights in prop::collection::vec(0.0f64..1.0, 55),
            carrier in 0.0f64..0.9,
        ) {
            let mech = Mechanism::debiagi_softwood().unwrap();
            let index = PhaseSpecies::softwood_with_carrier().resolve(&mech).unwrap();
            let n2 = mech.species_index("N2").unwrap();

            let total: f64 = weights.iter().sum();
            prop_assume!(total > 1e-3);
            let mut y = vec![0.0; mech.n_species()];
            let mut w = weights.iter();
            for (i, yi) in y.iter_mut().enumerate() {
                if i != n2 {
                    *yi = w.next().copied().unwrap_or(0.0) / total * (1.0 - carrier);
                }
            }
            y[n2] = carrier;

            let p = index.point(&y);
            prop_assert!((p.total() - 1.0).abs() < 1e-9);
            let free = index.carrier_free_point(&y, 0).unwrap();
            prop_assert!((free.total() - 1.0).abs() < 1e-9);
        }
    }
}
