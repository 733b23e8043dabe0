//! Ultimate analysis bases.
//!
//! Each narrower basis removes one group of components from the previous one
//! and renormalizes what is left to 100 %.

use crate::error::{FeedstockError, FeedstockResult};
use efr_core::numeric::ensure_divisor;
use efr_core::{EfrError, ensure_finite};

const C: usize = 0;
const H: usize = 1;
const O: usize = 2;
const N: usize = 3;
const S: usize = 4;
const ASH: usize = 5;
const MOISTURE: usize = 6;

/// Ultimate analysis `[C, H, O, N, S, ash, moisture]` in mass %, as received.
///
/// The values are expected to sum to 100; that is the caller's contract and is
/// not checked here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UltimateAnalysis([f64; 7]);

impl UltimateAnalysis {
    pub const LABELS: [&'static str; 7] = ["C", "H", "O", "N", "S", "ash", "moisture"];

    pub fn new(values: [f64; 7]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; 7] {
        &self.0
    }

    pub fn carbon(&self) -> f64 {
        self.0[C]
    }

    pub fn hydrogen(&self) -> f64 {
        self.0[H]
    }

    pub fn oxygen(&self) -> f64 {
        self.0[O]
    }

    pub fn ash(&self) -> f64 {
        self.0[ASH]
    }

    pub fn moisture(&self) -> f64 {
        self.0[MOISTURE]
    }

    /// Derive the dry, dry ash-free and dry ash-free CHO bases.
    pub fn bases(&self) -> FeedstockResult<UltimateAnalysisBases> {
        for v in &self.0 {
            ensure_finite(*v, "ultimate analysis value")?;
        }

        let dry = exclude_and_renormalize(&self.0, &[MOISTURE], "dry basis total")?;
        let daf = exclude_and_renormalize(&dry, &[ASH], "dry ash-free basis total")?;
        let dafcho = exclude_and_renormalize(&daf, &[N, S], "dry ash-free CHO basis total")?;

        Ok(UltimateAnalysisBases {
            ar: self.0,
            dry: to_array(dry)?,
            daf: to_array(daf)?,
            dafcho: to_array(dafcho)?,
        })
    }
}

/// All four bases of an ultimate analysis.
///
/// Downstream bases are computed from upstream ones at construction and the
/// fields are read-only, so they can never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct UltimateAnalysisBases {
    ar: [f64; 7],
    dry: [f64; 6],
    daf: [f64; 5],
    dafcho: [f64; 3],
}

impl UltimateAnalysisBases {
    /// As-received `[C, H, O, N, S, ash, moisture]`.
    pub fn ar(&self) -> &[f64; 7] {
        &self.ar
    }

    /// Dry basis `[C, H, O, N, S, ash]`.
    pub fn dry(&self) -> &[f64; 6] {
        &self.dry
    }

    /// Dry ash-free basis `[C, H, O, N, S]`.
    pub fn daf(&self) -> &[f64; 5] {
        &self.daf
    }

    /// Dry ash-free basis restricted to `[C, H, O]`.
    pub fn dafcho(&self) -> &[f64; 3] {
        &self.dafcho
    }

    /// Carbon mass fraction (0–1) on the daf CHO basis.
    pub fn yc(&self) -> f64 {
        self.dafcho[C] / 100.0
    }

    /// Hydrogen mass fraction (0–1) on the daf CHO basis.
    pub fn yh(&self) -> f64 {
        self.dafcho[H] / 100.0
    }

    /// Oxygen mass fraction (0–1) on the daf CHO basis.
    pub fn yo(&self) -> f64 {
        self.dafcho[O] / 100.0
    }

    /// Sums of the `(ar, dry, daf, dafcho)` bases.
    pub fn sums(&self) -> (f64, f64, f64, f64) {
        (
            self.ar.iter().sum(),
            self.dry.iter().sum(),
            self.daf.iter().sum(),
            self.dafcho.iter().sum(),
        )
    }
}

/// Remove the `excluded` entries and scale the rest so they sum to 100.
///
/// `out[i] = 100 * x[i] / (sum(x) - sum(x[excluded]))`
pub(crate) fn exclude_and_renormalize(
    values: &[f64],
    excluded: &[usize],
    what: &'static str,
) -> FeedstockResult<Vec<f64>> {
    let total: f64 = values.iter().sum();
    let removed: f64 = excluded.iter().map(|&i| values[i]).sum();
    let divisor = ensure_divisor(total - removed, what)?;

    Ok(values
        .iter()
        .enumerate()
        .filter(|(i, _)| !excluded.contains(i))
        .map(|(_, v)| 100.0 * v / divisor)
        .collect())
}

fn to_array<const LEN: usize>(values: Vec<f64>) -> FeedstockResult<[f64; LEN]> {
    let got = values.len();
    let array: Result<[f64; LEN], _> = values.try_into();
    array.map_err(|_| {
        FeedstockError::from(EfrError::LengthMismatch {
            what: "basis",
            expected: LEN,
            got,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use efr_core::{Tolerances, nearly_equal};

    const BLEND3: [f64; 7] = [49.52, 5.28, 38.35, 0.15, 0.02, 0.64, 6.04];

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-6,
            rel: 1e-9,
        }
    }

    #[test]
    fn dry_basis_carbon() {
        let bases = UltimateAnalysis::new(BLEND3).bases().unwrap();
        let expected = 100.0 * 49.52 / (100.0 - 6.04);
        assert!(nearly_equal(bases.dry()[0], expected, tol()));
        assert!((bases.dry()[0] - 52.72).abs() < 0.05);
    }

    #[test]
    fn each_basis_sums_to_100() {
        let bases = UltimateAnalysis::new(BLEND3).bases().unwrap();
        let (_, dry, daf, dafcho) = bases.sums();
        assert!(nearly_equal(dry, 100.0, tol()));
        assert!(nearly_equal(daf, 100.0, tol()));
        assert!(nearly_equal(dafcho, 100.0, tol()));
    }

    #[test]
    fn dafcho_fractions_match_basis() {
        let bases = UltimateAnalysis::new(BLEND3).bases().unwrap();
        assert!(nearly_equal(bases.yc(), bases.dafcho()[0] / 100.0, tol()));
        assert!(nearly_equal(bases.yc() + bases.yh() + bases.yo(), 1.0, tol()));
        // C, H, O only: 49.52 / 93.15
        assert!(nearly_equal(bases.yc(), 49.52 / 93.15, tol()));
    }

    #[test]
    fn full_moisture_is_a_domain_error() {
        let err = UltimateAnalysis::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 100.0])
            .bases()
            .unwrap_err();
        assert!(matches!(err, FeedstockError::Domain(EfrError::Domain { .. })));
    }

    #[test]
    fn all_ash_is_a_domain_error() {
        let err = UltimateAnalysis::new([0.0, 0.0, 0.0, 0.0, 0.0, 90.0, 10.0])
            .bases()
            .unwrap_err();
        assert!(matches!(err, FeedstockError::Domain(_)));
    }

    #[test]
    fn non_finite_input_rejected() {
        let err = UltimateAnalysis::new([f64::NAN, 5.0, 40.0, 0.0, 0.0, 1.0, 4.0])
            .bases()
            .unwrap_err();
        assert!(matches!(
            err,
            FeedstockError::Domain(EfrError::NonFinite { .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use efr_core::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bases_close_to_100(raw in prop::collection::vec(0.01_f64..1.0_f64, 7)) {
            // Scale so the as-received analysis sums to 100.
            let total: f64 = raw.iter().sum();
            let mut ar = [0.0; 7];
            for (dst, v) in ar.iter_mut().zip(&raw) {
                *dst = 100.0 * v / total;
            }

            let bases = UltimateAnalysis::new(ar).bases().unwrap();
            let (_, dry, daf, dafcho) = bases.sums();
            let tol = Tolerances { abs: 1e-6, rel: 1e-9 };
            prop_assert!(nearly_equal(dry, 100.0, tol));
            prop_assert!(nearly_equal(daf, 100.0, tol));
            prop_assert!(nearly_equal(dafcho, 100.0, tol));
        }
    }
}
