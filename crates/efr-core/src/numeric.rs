use crate::EfrError;

pub type Real = f64;

/// Absolute and relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    /// Closure of mass-fraction sums.
    pub const CLOSURE: Tolerances = Tolerances {
        abs: 1e-6,
        rel: 1e-9,
    };
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// `|a - b| <= abs` or `|a - b| <= rel * max(|a|, |b|)`.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, EfrError> {
    match v.is_finite() {
        true => Ok(v),
        false => Err(EfrError::NonFinite { what, value: v }),
    }
}

/// Accept `v` as a divisor only if it is finite and strictly positive.
///
/// A zero divisor shows up when an excluded component makes up the whole
/// total (e.g. 100% moisture).
pub fn ensure_divisor(v: Real, what: &'static str) -> Result<Real, EfrError> {
    if v.is_finite() && v > 0.0 && !nearly_equal(v, 0.0, Tolerances::default()) {
        Ok(v)
    } else {
        Err(EfrError::Domain { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_tolerance_accepts_rounded_percentages() {
        let y = [38.95, 23.12, 0.0, 14.74, 14.74, 0.0, 7.83].map(|p| p / 99.38);
        let sum: Real = y.iter().sum();
        assert!(nearly_equal(sum, 1.0, Tolerances::CLOSURE));
        assert!(!nearly_equal(sum + 1e-4, 1.0, Tolerances::CLOSURE));
    }

    #[test]
    fn default_tolerance_is_tight() {
        assert!(nearly_equal(773.15, 773.15 + 1e-10, Tolerances::default()));
        assert!(!nearly_equal(0.0, 1e-9, Tolerances::default()));
    }

    #[test]
    fn non_finite_rejected() {
        let err = ensure_finite(Real::INFINITY, "ultimate analysis value").unwrap_err();
        assert!(err.to_string().contains("ultimate analysis value"));
        assert_eq!(ensure_finite(49.52, "carbon").unwrap(), 49.52);
    }

    #[test]
    fn ensure_divisor_rejects_zero_and_negative() {
        assert!(matches!(
            ensure_divisor(0.0, "dry total"),
            Err(EfrError::Domain { .. })
        ));
        assert!(ensure_divisor(-1.0, "dry total").is_err());
        assert!(ensure_divisor(Real::INFINITY, "dry total").is_err());
        assert_eq!(ensure_divisor(93.96, "dry total").unwrap(), 93.96);
    }
}
