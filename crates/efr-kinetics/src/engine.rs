//! Built-in lumped kinetics engine.

use crate::error::{KineticsError, KineticsResult};
use crate::mechanism::Mechanism;
use crate::model::{EnergyEquation, KineticsEngine, ReactorKind};
use crate::newton::NewtonConfig;
use crate::reactor::{BatchReactor, FlowStage, check_state, density};
use crate::state::ThermoState;
use efr_core::numeric::Tolerances;
use std::sync::Arc;

/// Limits of the implicit integration.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationOptions {
    /// Largest implicit step inside an output interval (seconds)
    pub max_step: f64,
    /// Total implicit steps allowed per reactor (safety limit)
    pub max_steps: usize,
    /// Steady-state tolerance on `‖τ·F‖∞`
    pub steady_tol: f64,
    pub newton: NewtonConfig,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            max_step: 1e-2,
            max_steps: 100_000,
            steady_tol: 1e-9,
            newton: NewtonConfig::default(),
        }
    }
}

impl IntegrationOptions {
    pub fn validate(&self) -> KineticsResult<()> {
        if !(self.max_step.is_finite() && self.max_step > 0.0) {
            return Err(KineticsError::InvalidArg {
                what: "max_step must be positive".to_string(),
            });
        }
        if self.max_steps == 0 {
            return Err(KineticsError::InvalidArg {
                what: "max_steps must be positive".to_string(),
            });
        }
        if !(self.steady_tol.is_finite() && self.steady_tol > 0.0) {
            return Err(KineticsError::InvalidArg {
                what: "steady_tol must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Engine over a shared mechanism; every reactor it builds owns its own state.
#[derive(Clone, Debug)]
pub struct LumpedEngine {
    mechanism: Arc<Mechanism>,
    options: IntegrationOptions,
}

impl LumpedEngine {
    pub fn new(mechanism: Mechanism) -> Self {
        Self {
            mechanism: Arc::new(mechanism),
            options: IntegrationOptions::default(),
        }
    }

    /// Engine over the built-in softwood scheme.
    pub fn softwood() -> KineticsResult<Self> {
        Ok(Self::new(Mechanism::debiagi_softwood()?))
    }

    pub fn with_options(mut self, options: IntegrationOptions) -> KineticsResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn options(&self) -> &IntegrationOptions {
        &self.options
    }
}

impl KineticsEngine for LumpedEngine {
    type Batch = BatchReactor;
    type Stage = FlowStage;

    fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    fn state(
        &self,
        temperature: f64,
        pressure: f64,
        mass_fractions: &[(&str, f64)],
    ) -> KineticsResult<ThermoState> {
        let mut y = vec![0.0; self.mechanism.n_species()];
        let mut seen = vec![false; y.len()];
        for &(name, value) in mass_fractions {
            let i = self.mechanism.require_species(name)?;
            if seen[i] {
                return Err(KineticsError::InvalidArg {
                    what: format!("species '{name}' given twice"),
                });
            }
            if !value.is_finite() || value < 0.0 {
                return Err(KineticsError::NonPhysical {
                    what: format!("mass fraction of '{name}' is {value}"),
                });
            }
            seen[i] = true;
            y[i] = value;
        }

        let total: f64 = y.iter().sum();
        if (total - 1.0).abs() > Tolerances::CLOSURE.abs {
            return Err(KineticsError::NonPhysical {
                what: format!("mass fractions sum to {total}, expected 1"),
            });
        }
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(KineticsError::NonPhysical {
                what: format!("temperature must be positive, got {temperature} K"),
            });
        }
        if !(pressure.is_finite() && pressure > 0.0) {
            return Err(KineticsError::NonPhysical {
                what: format!("pressure must be positive, got {pressure} Pa"),
            });
        }

        Ok(ThermoState {
            temperature,
            pressure,
            mass_fractions: y,
        })
    }

    fn isolated_reactor(
        &self,
        initial: &ThermoState,
        kind: ReactorKind,
        energy: EnergyEquation,
    ) -> KineticsResult<BatchReactor> {
        BatchReactor::new(
            Arc::clone(&self.mechanism),
            initial,
            kind,
            energy,
            self.options.clone(),
        )
    }

    fn density(&self, state: &ThermoState) -> KineticsResult<f64> {
        check_state(&self.mechanism, state)?;
        Ok(density(&self.mechanism, state))
    }

    fn flow_stage(
        &self,
        initial: &ThermoState,
        mass: f64,
        mass_flow: f64,
        energy: EnergyEquation,
    ) -> KineticsResult<FlowStage> {
        FlowStage::new(
            Arc::clone(&self.mechanism),
            initial,
            mass,
            mass_flow,
            energy,
            self.options.clone(),
        )
    }
}
