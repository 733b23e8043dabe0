//! Capability traits of a kinetics engine.
//!
//! Drivers only talk to these traits, so the built-in lumped engine can be
//! swapped for another implementation without touching reactor protocols.

use crate::error::KineticsResult;
use crate::mechanism::Mechanism;
use crate::state::ThermoState;

/// Closed-reactor flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactorKind {
    /// Fixed volume; pressure follows the ideal-gas law.
    #[default]
    ConstantVolume,
    /// Fixed pressure.
    ConstantPressure,
}

/// Whether the energy balance is solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyEquation {
    /// Temperature evolves with the heat of reaction.
    On,
    /// Temperature is held at its initial value.
    #[default]
    Off,
}

impl EnergyEquation {
    pub fn from_flag(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl std::fmt::Display for EnergyEquation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// Closed reactor advanced in absolute time.
pub trait IsolatedReactor {
    /// Current absolute time [s].
    fn time(&self) -> f64;

    fn state(&self) -> ThermoState;

    /// Advance to absolute time `t`, which must not lie before [`Self::time`].
    fn advance(&mut self, t: f64) -> KineticsResult<()>;
}

/// Flow-through stage relaxed to steady state.
pub trait FlowReactor {
    fn state(&self) -> ThermoState;

    /// Replace the inlet stream.
    fn set_inlet(&mut self, inlet: &ThermoState) -> KineticsResult<()>;

    /// Relax to steady state, failing when the engine's limits are reached first.
    fn advance_to_steady_state(&mut self) -> KineticsResult<()>;

    /// Mean residence time [s].
    fn residence_time(&self) -> f64;
}

/// Factory for states and reactors.
pub trait KineticsEngine: Sync {
    type Batch: IsolatedReactor;
    type Stage: FlowReactor;

    fn mechanism(&self) -> &Mechanism;

    /// Build a state from temperature [K], pressure [Pa] and named mass fractions.
    ///
    /// Species not named are zero. The named fractions must sum to 1.
    fn state(
        &self,
        temperature: f64,
        pressure: f64,
        mass_fractions: &[(&str, f64)],
    ) -> KineticsResult<ThermoState>;

    fn isolated_reactor(
        &self,
        initial: &ThermoState,
        kind: ReactorKind,
        energy: EnergyEquation,
    ) -> KineticsResult<Self::Batch>;

    /// Ideal-gas mass density of `state` [kg/m³].
    fn density(&self, state: &ThermoState) -> KineticsResult<f64>;

    /// Constant-pressure stage holding `mass` [kg] fed at `mass_flow` [kg/s].
    ///
    /// The stage contents and its inlet both start at `initial`.
    fn flow_stage(
        &self,
        initial: &ThermoState,
        mass: f64,
        mass_flow: f64,
        energy: EnergyEquation,
    ) -> KineticsResult<Self::Stage>;
}
