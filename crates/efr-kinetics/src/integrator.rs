//! Implicit time stepping for stiff kinetic models.

use crate::error::{KineticsError, KineticsResult};
use crate::newton::{NewtonConfig, newton_solve};
use nalgebra::{DMatrix, DVector, Dyn, LU};

/// Autonomous ODE system `dx/dt = f(x)`.
pub trait StiffModel {
    fn dim(&self) -> usize;

    /// Leading unknowns that must stay non-negative.
    fn n_bounded(&self) -> usize;

    fn rhs(&self, x: &DVector<f64>) -> KineticsResult<DVector<f64>>;

    /// `∂f/∂x`.
    fn jacobian(&self, x: &DVector<f64>) -> KineticsResult<DMatrix<f64>>;

    /// True when `f` is affine in `x`, so the Jacobian never changes.
    fn is_linear(&self) -> bool {
        false
    }
}

/// Backward Euler with Newton iterations.
///
/// For affine models the factorization of `I − dt·J` is cached per step size.
#[derive(Debug, Clone)]
pub struct BackwardEuler {
    newton: NewtonConfig,
    cached: Option<(f64, LU<f64, Dyn, Dyn>)>,
}

impl BackwardEuler {
    pub fn new(newton: NewtonConfig) -> Self {
        Self {
            newton,
            cached: None,
        }
    }

    /// Take one step of size `dt` from `x`.
    pub fn step<M: StiffModel>(
        &mut self,
        model: &M,
        x: &DVector<f64>,
        dt: f64,
    ) -> KineticsResult<DVector<f64>> {
        let n = model.dim();
        let mut z = if model.is_linear() {
            self.linear_step(model, x, dt)?
        } else {
            let residual = |z: &DVector<f64>| -> KineticsResult<DVector<f64>> {
                Ok(z - x - dt * model.rhs(z)?)
            };
            let jacobian = |z: &DVector<f64>| -> KineticsResult<DMatrix<f64>> {
                Ok(DMatrix::identity(n, n) - dt * model.jacobian(z)?)
            };
            newton_solve(x.clone(), residual, jacobian, model.n_bounded(), &self.newton)?.x
        };

        if z.iter().any(|v| !v.is_finite()) {
            return Err(KineticsError::Numeric {
                what: "non-finite state after implicit step".to_string(),
            });
        }
        // Round-off below the line-search tolerance.
        for v in z.iter_mut().take(model.n_bounded()) {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
        Ok(z)
    }

    fn linear_step<M: StiffModel>(
        &mut self,
        model: &M,
        x: &DVector<f64>,
        dt: f64,
    ) -> KineticsResult<DVector<f64>> {
        let stale = !matches!(&self.cached, Some((h, _)) if *h == dt);
        if stale {
            let n = model.dim();
            let a = DMatrix::identity(n, n) - dt * model.jacobian(x)?;
            self.cached = Some((dt, a.lu()));
        }
        let Some((_, lu)) = &self.cached else {
            return Err(KineticsError::Numeric {
                what: "missing step factorization".to_string(),
            });
        };
        let dx = lu.solve(&(dt * model.rhs(x)?)).ok_or_else(|| KineticsError::Numeric {
            what: "step matrix is singular".to_string(),
        })?;
        Ok(x + dx)
    }

    /// Forget the cached factorization after the model changed.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
