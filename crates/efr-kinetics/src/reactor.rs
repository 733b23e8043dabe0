//! Closed batch reactor and flow-through stage of the lumped engine.

use crate::engine::IntegrationOptions;
use crate::error::{KineticsError, KineticsResult};
use crate::integrator::{BackwardEuler, StiffModel};
use crate::kinetics::{HeatCapacity, add_source, add_source_jacobian, species_heat_capacities};
use crate::mechanism::Mechanism;
use crate::model::{EnergyEquation, FlowReactor, IsolatedReactor, ReactorKind};
use crate::state::ThermoState;
use efr_core::units::constants::R_UNIVERSAL;
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;

fn pack(state: &ThermoState) -> DVector<f64> {
    let n = state.mass_fractions.len();
    DVector::from_fn(n + 1, |i, _| {
        if i < n {
            state.mass_fractions[i]
        } else {
            state.temperature
        }
    })
}

fn fractions(x: &DVector<f64>) -> Vec<f64> {
    x.iter().take(x.len() - 1).copied().collect()
}

/// Ideal-gas mass density [kg/m³].
pub(crate) fn density(mech: &Mechanism, state: &ThermoState) -> f64 {
    state.pressure * mech.mean_molar_mass(&state.mass_fractions) / (R_UNIVERSAL * state.temperature)
}

/// Kinetics of a closed reactor.
struct ClosedModel {
    mechanism: Arc<Mechanism>,
    heat: Option<Vec<f64>>,
}

impl std::fmt::Debug for ClosedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosedModel")
            .field("mechanism", &self.mechanism.name())
            .field("energy", &self.heat.is_some())
            .finish()
    }
}

impl StiffModel for ClosedModel {
    fn dim(&self) -> usize {
        self.mechanism.n_species() + 1
    }

    fn n_bounded(&self) -> usize {
        self.mechanism.n_species()
    }

    fn rhs(&self, x: &DVector<f64>) -> KineticsResult<DVector<f64>> {
        let mut f = DVector::zeros(self.dim());
        add_source(&self.mechanism, x, self.heat.as_deref(), &mut f);
        Ok(f)
    }

    fn jacobian(&self, x: &DVector<f64>) -> KineticsResult<DMatrix<f64>> {
        let n = self.dim();
        let mut jac = DMatrix::zeros(n, n);
        add_source_jacobian(&self.mechanism, x, self.heat.as_deref(), &mut jac);
        Ok(jac)
    }

    fn is_linear(&self) -> bool {
        self.heat.is_none()
    }
}

/// Isolated reactor with constant volume or constant pressure.
#[derive(Debug)]
pub struct BatchReactor {
    model: ClosedModel,
    kind: ReactorKind,
    x: DVector<f64>,
    time: f64,
    pressure0: f64,
    density: f64,
    integrator: BackwardEuler,
    options: IntegrationOptions,
    steps: usize,
}


impl BatchReactor {
    pub(crate) fn new(
        mechanism: Arc<Mechanism>,
        initial: &ThermoState,
        kind: ReactorKind,
        energy: EnergyEquation,
        options: IntegrationOptions,
    ) -> KineticsResult<Self> {
        check_state(&mechanism, initial)?;
        let basis = match kind {
            ReactorKind::ConstantVolume => HeatCapacity::Volume,
            ReactorKind::ConstantPressure => HeatCapacity::Pressure,
        };
        let heat = energy
            .is_on()
            .then(|| species_heat_capacities(&mechanism, basis));
        if let Some(c) = &heat {
            if c.iter().any(|v| *v <= 0.0) {
                return Err(KineticsError::NonPhysical {
                    what: "species heat capacity must be positive".to_string(),
                });
            }
        }
        let rho = density(&mechanism, initial);
        Ok(Self {
            model: ClosedModel { mechanism, heat },
            kind,
            x: pack(initial),
            time: 0.0,
            pressure0: initial.pressure,
            density: rho,
            integrator: BackwardEuler::new(options.newton.clone()),
            options,
            steps: 0,
        })
    }

    /// Implicit steps taken so far.
    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    pub fn kind(&self) -> ReactorKind {
        self.kind
    }
}

impl IsolatedReactor for BatchReactor {
    fn time(&self) -> f64 {
        self.time
    }

    fn state(&self) -> ThermoState {
        let mass_fractions = fractions(&self.x);
        let temperature = self.x[self.x.len() - 1];
        let pressure = match self.kind {
            ReactorKind::ConstantPressure => self.pressure0,
            ReactorKind::ConstantVolume => {
                let w = self.model.mechanism.mean_molar_mass(&mass_fractions);
                self.density * R_UNIVERSAL * temperature / w
            }
        };
        ThermoState {
            temperature,
            pressure,
            mass_fractions,
        }
    }

    fn advance(&mut self, t: f64) -> KineticsResult<()> {
        if !t.is_finite() || t < self.time {
            return Err(KineticsError::InvalidArg {
                what: format!("cannot advance from t = {} s back to t = {t} s", self.time),
            });
        }
        let span = t - self.time;
        if span == 0.0 {
            return Ok(());
        }

        let n_sub = (span / self.options.max_step).ceil().max(1.0) as usize;
        let dt = span / n_sub as f64;
        for _ in 0..n_sub {
            if self.steps >= self.options.max_steps {
                return Err(KineticsError::BudgetExhausted {
                    steps: self.steps,
                    what: "batch reactor",
                });
            }
            self.x = self.integrator.step(&self.model, &self.x, dt)?;
            self.steps += 1;
        }
        self.time = t;
        Ok(())
    }
}

/// Kinetics of a stirred flow-through stage at constant pressure.
struct StageModel {
    mechanism: Arc<Mechanism>,
    heat: Option<Vec<f64>>,
    inlet: DVector<f64>,
    tau: f64,
}

impl StiffModel for StageModel {
    fn dim(&self) -> usize {
        self.mechanism.n_species() + 1
    }

    fn n_bounded(&self) -> usize {
        self.mechanism.n_species()
    }

    fn rhs(&self, x: &DVector<f64>) -> KineticsResult<DVector<f64>> {
        let n = self.mechanism.n_species();
        let mut f = (&self.inlet - x) / self.tau;
        if self.heat.is_none() {
            f[n] = 0.0;
        }
        add_source(&self.mechanism, x, self.heat.as_deref(), &mut f);
        Ok(f)
    }

    fn jacobian(&self, x: &DVector<f64>) -> KineticsResult<DMatrix<f64>> {
        let n = self.mechanism.n_species();
        let mut jac = DMatrix::zeros(n + 1, n + 1);
        for i in 0..n {
            jac[(i, i)] = -1.0 / self.tau;
        }
        if self.heat.is_some() {
            jac[(n, n)] = -1.0 / self.tau;
        }
        add_source_jacobian(&self.mechanism, x, self.heat.as_deref(), &mut jac);
        Ok(jac)
    }

    fn is_linear(&self) -> bool {
        self.heat.is_none()
    }
}

/// Constant-pressure stirred stage holding a fixed mass.
pub struct FlowStage {
    model: StageModel,
    x: DVector<f64>,
    pressure: f64,
    integrator: BackwardEuler,
    options: IntegrationOptions,
    steps: usize,
}

impl std::fmt::Debug for FlowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowStage")
            .field("tau", &self.model.tau)
            .field("pressure", &self.pressure)
            .field("steps", &self.steps)
            .finish()
    }
}

impl FlowStage {
    pub(crate) fn new(
        mechanism: Arc<Mechanism>,
        initial: &ThermoState,
        mass: f64,
        mass_flow: f64,
        energy: EnergyEquation,
        options: IntegrationOptions,
    ) -> KineticsResult<Self> {
        check_state(&mechanism, initial)?;
        if !(mass.is_finite() && mass > 0.0) {
            return Err(KineticsError::InvalidArg {
                what: format!("stage mass must be positive, got {mass}"),
            });
        }
        if !(mass_flow.is_finite() && mass_flow > 0.0) {
            return Err(KineticsError::InvalidArg {
                what: format!("stage mass flow must be positive, got {mass_flow}"),
            });
        }
        let tau = mass / mass_flow;
        let heat = energy
            .is_on()
            .then(|| species_heat_capacities(&mechanism, HeatCapacity::Pressure));
        Ok(Self {
            model: StageModel {
                mechanism,
                heat,
                inlet: pack(initial),
                tau,
            },
            x: pack(initial),
            pressure: initial.pressure,
            integrator: BackwardEuler::new(options.newton.clone()),
            options,
            steps: 0,
        })
    }

    /// Implicit steps taken so far.
    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    /// `‖τ·F(x)‖∞` at the current state.
    pub fn steady_residual(&self) -> KineticsResult<f64> {
        let f = self.model.rhs(&self.x)?;
        Ok(self.model.tau * f.amax())
    }
}

impl FlowReactor for FlowStage {
    fn state(&self) -> ThermoState {
        ThermoState {
            temperature: self.x[self.x.len() - 1],
            pressure: self.pressure,
            mass_fractions: fractions(&self.x),
        }
    }

    fn set_inlet(&mut self, inlet: &ThermoState) -> KineticsResult<()> {
        check_state(&self.model.mechanism, inlet)?;
        self.model.inlet = pack(inlet);
        self.integrator.invalidate();
        Ok(())
    }

    fn residence_time(&self) -> f64 {
        self.model.tau
    }

    fn advance_to_steady_state(&mut self) -> KineticsResult<()> {
        let tau = self.model.tau;
        let min_dt = tau * 1e-10;
        // Newton residuals lose precision once dt·f dwarfs the state.
        let max_dt = if self.model.is_linear() { tau * 1e12 } else { tau * 1e3 };
        let mut dt = tau * 1e-2;

        loop {
            if self.steady_residual()? < self.options.steady_tol {
                tracing::debug!(steps = self.steps, tau, "flow stage reached steady state");
                return Ok(());
            }
            if self.steps >= self.options.max_steps {
                return Err(KineticsError::ConvergenceFailed {
                    what: format!(
                        "flow stage not steady after {} steps, residual = {:e}",
                        self.steps,
                        self.steady_residual()?
                    ),
                });
            }
            self.steps += 1;

            match self.integrator.step(&self.model, &self.x, dt) {
                Ok(next) => {
                    self.x = next;
                    dt = (dt * 4.0).min(max_dt);
                }
                Err(e) if e.is_convergence_failure() && dt > min_dt => {
                    dt /= 4.0;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

pub(crate) fn check_state(mech: &Mechanism, state: &ThermoState) -> KineticsResult<()> {
    if state.mass_fractions.len() != mech.n_species() {
        return Err(KineticsError::InvalidArg {
            what: format!(
                "state has {} mass fractions, mechanism has {} species",
                state.mass_fractions.len(),
                mech.n_species()
            ),
        });
    }
    if !(state.temperature.is_finite() && state.temperature > 0.0) {
        return Err(KineticsError::NonPhysical {
            what: format!("temperature must be positive, got {} K", state.temperature),
        });
    }
    if !(state.pressure.is_finite() && state.pressure > 0.0) {
        return Err(KineticsError::NonPhysical {
            what: format!("pressure must be positive, got {} Pa", state.pressure),
        });
    }
    if state.mass_fractions.iter().any(|y| !y.is_finite() || *y < 0.0) {
        return Err(KineticsError::NonPhysical {
            what: "mass fractions must be finite and non-negative".to_string(),
        });
    }
    Ok(())
}
