//! Reaction source terms and their Jacobians.
//!
//! The state vector is `[Y_0 … Y_{n-1}, T]`.

use crate::mechanism::Mechanism;
use nalgebra::{DMatrix, DVector};

/// Heat-capacity basis of the energy balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeatCapacity {
    Pressure,
    Volume,
}

/// Per-species heat capacities on the chosen basis [J/(kg·K)].
pub(crate) fn species_heat_capacities(mech: &Mechanism, basis: HeatCapacity) -> Vec<f64> {
    use efr_core::units::constants::R_UNIVERSAL;
    mech.species()
        .iter()
        .map(|s| match basis {
            HeatCapacity::Pressure => s.cp,
            HeatCapacity::Volume => s.cp - R_UNIVERSAL / s.molar_mass,
        })
        .collect()
}

/// Reaction contributions to `dx/dt` at `x`.
///
/// Adds `S·r` to the species rows and, when `heat` is given, `−Σ r_j·ΔH_j / c`
/// to the temperature row.
pub(crate) fn add_source(
    mech: &Mechanism,
    x: &DVector<f64>,
    heat: Option<&[f64]>,
    out: &mut DVector<f64>,
) {
    let n = mech.n_species();
    let t = x[n];
    let mut q = 0.0;
    for r in mech.reactions() {
        let rate = r.rate_constant(t) * x[r.reactant];
        out[r.reactant] -= rate;
        for &(p, yield_) in &r.products {
            out[p] += yield_ * rate;
        }
        q += rate * r.dh;
    }
    if let Some(c_species) = heat {
        let c = mixture_heat_capacity(c_species, x);
        out[n] -= q / c;
    }
}

/// Jacobian of [`add_source`] added into `jac`.
pub(crate) fn add_source_jacobian(
    mech: &Mechanism,
    x: &DVector<f64>,
    heat: Option<&[f64]>,
    jac: &mut DMatrix<f64>,
) {
    let n = mech.n_species();
    let t = x[n];
    let mut q = 0.0;
    let mut dq_dt = 0.0;
    let mut dq_dy = vec![0.0; n];

    for r in mech.reactions() {
        let k = r.rate_constant(t);
        let y_r = x[r.reactant];
        let dk = r.rate_constant_dt(t);

        jac[(r.reactant, r.reactant)] -= k;
        jac[(r.reactant, n)] -= dk * y_r;
        for &(p, yield_) in &r.products {
            jac[(p, r.reactant)] += yield_ * k;
            jac[(p, n)] += yield_ * dk * y_r;
        }

        q += k * y_r * r.dh;
        dq_dt += dk * y_r * r.dh;
        dq_dy[r.reactant] += k * r.dh;
    }

    if let Some(c_species) = heat {
        let c = mixture_heat_capacity(c_species, x);
        for m in 0..n {
            jac[(n, m)] += -dq_dy[m] / c + q * c_species[m] / (c * c);
        }
        jac[(n, n)] -= dq_dt / c;
    }
}

pub(crate) fn mixture_heat_capacity(c_species: &[f64], x: &DVector<f64>) -> f64 {
    c_species.iter().zip(x.iter()).map(|(c, y)| c * y).sum()
}
