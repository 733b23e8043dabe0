//! Newton solver with a non-negativity constrained line search.

use crate::error::{KineticsError, KineticsResult};
use nalgebra::{DMatrix, DVector};

/// Newton solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Most negative value accepted for a bounded unknown
    pub negativity_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            abs_tol: 1e-10,
            rel_tol: 1e-12,
            negativity_tol: 1e-12,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
        }
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    pub x: DVector<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
}

/// Solve `r(x) = 0` starting from `x0`.
///
/// The first `n_bounded` unknowns must stay non-negative: the line search
/// backtracks until they do and the residual decreases.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    n_bounded: usize,
    config: &NewtonConfig,
) -> KineticsResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> KineticsResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> KineticsResult<DMatrix<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    let admissible = |v: &DVector<f64>| {
        v.iter()
            .take(n_bounded)
            .all(|&vi| vi >= -config.negativity_tol)
    };

    for iter in 0..config.max_iterations {
        if r_norm <= config.abs_tol || r_norm <= config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = jacobian_fn(&x)?;
        let dx = jac.lu().solve(&(-&r)).ok_or_else(|| KineticsError::Numeric {
            what: "Newton Jacobian is singular".to_string(),
        })?;

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            if admissible(&x_new) {
                let r_new = residual_fn(&x_new)?;
                let r_new_norm = r_new.norm();
                if r_new_norm < r_norm {
                    accepted = Some((x_new, r_new, r_new_norm));
                    break;
                }
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            return Err(KineticsError::ConvergenceFailed {
                what: format!(
                    "line search stagnated at iteration {iter}, residual = {r_norm:e}"
                ),
            });
        };
        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    if r_norm <= config.abs_tol || r_norm <= config.rel_tol * r0_norm {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
        });
    }

    Err(KineticsError::ConvergenceFailed {
        what: format!(
            "maximum Newton iterations {} reached, residual = {r_norm:e}",
            config.max_iterations
        ),
    })
}
