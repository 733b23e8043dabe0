//! Sensitivity problem definition.

use crate::error::{SensitivityError, SensitivityResult};

/// Named input parameters with uniform bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    names: Vec<String>,
    bounds: Vec<[f64; 2]>,
}

impl Problem {
    pub fn new(names: Vec<String>, bounds: Vec<[f64; 2]>) -> SensitivityResult<Self> {
        if names.is_empty() {
            return Err(SensitivityError::InvalidArg {
                what: "problem needs at least one parameter".to_string(),
            });
        }
        if names.len() != bounds.len() {
            return Err(SensitivityError::InvalidArg {
                what: format!("{} names but {} bounds", names.len(), bounds.len()),
            });
        }
        for (name, [lo, hi]) in names.iter().zip(&bounds) {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(SensitivityError::InvalidArg {
                    what: format!("bounds of '{name}' must satisfy lo < hi, got [{lo}, {hi}]"),
                });
            }
        }
        Ok(Self { names, bounds })
    }

    pub fn num_vars(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn bounds(&self) -> &[[f64; 2]] {
        &self.bounds
    }

    /// Map unit-cube coordinates into the bounds.
    pub fn scale(&self, unit: &[f64]) -> Vec<f64> {
        unit.iter()
            .zip(&self.bounds)
            .map(|(u, [lo, hi])| lo + u * (hi - lo))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_and_scales() {
        let p = Problem::new(vec!["a".into(), "b".into()], vec![[0.0, 1.0], [2.0, 4.0]]).unwrap();
        assert_eq!(p.num_vars(), 2);
        assert_eq!(p.scale(&[0.5, 0.5]), vec![0.5, 3.0]);

        assert!(Problem::new(vec!["a".into()], vec![]).is_err());
        assert!(Problem::new(vec!["a".into()], vec![[1.0, 1.0]]).is_err());
    }
}
