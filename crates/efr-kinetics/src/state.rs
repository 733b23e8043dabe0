//! Thermodynamic state exchanged with reactors.

/// Bulk state of a reactor or inlet stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    /// Temperature [K].
    pub temperature: f64,
    /// Pressure [Pa].
    pub pressure: f64,
    /// Mass fractions in mechanism species order.
    pub mass_fractions: Vec<f64>,
}

impl ThermoState {
    pub fn n_species(&self) -> usize {
        self.mass_fractions.len()
    }

    pub fn mass_fraction(&self, index: usize) -> f64 {
        self.mass_fractions.get(index).copied().unwrap_or(0.0)
    }

    pub fn total_mass_fraction(&self) -> f64 {
        self.mass_fractions.iter().sum()
    }
}
