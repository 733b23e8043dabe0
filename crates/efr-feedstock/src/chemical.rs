//! Chemical analysis of a feedstock.

use crate::basis::exclude_and_renormalize;
use crate::error::FeedstockResult;
use efr_core::ensure_finite;

/// Chemical analysis in mass %, dry basis. Ash is carried so it can be removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChemicalAnalysis {
    pub cellulose: f64,
    pub hemicellulose: f64,
    pub lignin_c: f64,
    pub lignin_h: f64,
    pub lignin_o: f64,
    pub tannins: f64,
    pub triglycerides: f64,
    pub ash: f64,
}

impl ChemicalAnalysis {
    /// Values ordered as the biomass components followed by ash.
    pub fn values(&self) -> [f64; 8] {
        [
            self.cellulose,
            self.hemicellulose,
            self.lignin_c,
            self.lignin_h,
            self.lignin_o,
            self.tannins,
            self.triglycerides,
            self.ash,
        ]
    }

    /// Total of all entries including ash.
    pub fn sum(&self) -> f64 {
        self.values().iter().sum()
    }

    /// Remove ash and renormalize the seven components to 100 %.
    pub fn dry_ash_free(&self) -> FeedstockResult<ChemicalAnalysisDaf> {
        let values = self.values();
        for v in &values {
            ensure_finite(*v, "chemical analysis value")?;
        }

        let daf = exclude_and_renormalize(&values, &[7], "chemical analysis ash-free total")?;
        let mut percent = [0.0; 7];
        percent.copy_from_slice(&daf);

        Ok(ChemicalAnalysisDaf {
            dry: *self,
            percent,
        })
    }
}

/// Chemical analysis on a dry ash-free basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChemicalAnalysisDaf {
    /// The dry-basis analysis this was derived from.
    pub dry: ChemicalAnalysis,
    /// Daf mass %, ordered as [`crate::BiomassComponent::ALL`].
    pub percent: [f64; 7],
}

impl ChemicalAnalysisDaf {
    pub fn sum(&self) -> f64 {
        self.percent.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedstockError;
    use efr_core::{Tolerances, nearly_equal};

    fn blend3_case5() -> ChemicalAnalysis {
        ChemicalAnalysis {
            cellulose: 38.95,
            hemicellulose: 23.12,
            lignin_c: 0.0,
            lignin_h: 14.74,
            lignin_o: 14.74,
            tannins: 0.0,
            triglycerides: 7.83,
            ash: 0.63,
        }
    }

    #[test]
    fn daf_cellulose() {
        let daf = blend3_case5().dry_ash_free().unwrap();
        let total = blend3_case5().sum();
        let expected = 38.95 / (total - 0.63) * 100.0;
        let tol = Tolerances {
            abs: 1e-9,
            rel: 1e-9,
        };
        assert!(nearly_equal(daf.percent[0], expected, tol));
        assert!((daf.percent[0] - 39.20).abs() < 0.05);
    }

    #[test]
    fn daf_sums_to_100() {
        let daf = blend3_case5().dry_ash_free().unwrap();
        let tol = Tolerances {
            abs: 1e-6,
            rel: 1e-9,
        };
        assert!(nearly_equal(daf.sum(), 100.0, tol));
        assert_eq!(daf.dry, blend3_case5());
    }

    #[test]
    fn pure_ash_rejected() {
        let ash_only = ChemicalAnalysis {
            cellulose: 0.0,
            hemicellulose: 0.0,
            lignin_c: 0.0,
            lignin_h: 0.0,
            lignin_o: 0.0,
            tannins: 0.0,
            triglycerides: 0.0,
            ash: 100.0,
        };
        assert!(matches!(
            ash_only.dry_ash_free(),
            Err(FeedstockError::Domain(_))
        ));
    }
}
