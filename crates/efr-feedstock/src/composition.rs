//! Canonical biomass composition.

use crate::error::{FeedstockError, FeedstockResult};
use efr_core::numeric::{Tolerances, nearly_equal};

/// The seven biomass components used as kinetics inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiomassComponent {
    Cellulose,
    Hemicellulose,
    LigninC,
    LigninH,
    LigninO,
    Tannins,
    Triglycerides,
}

impl BiomassComponent {
    pub const ALL: [BiomassComponent; 7] = [
        BiomassComponent::Cellulose,
        BiomassComponent::Hemicellulose,
        BiomassComponent::LigninC,
        BiomassComponent::LigninH,
        BiomassComponent::LigninO,
        BiomassComponent::Tannins,
        BiomassComponent::Triglycerides,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BiomassComponent::Cellulose => "cellulose",
            BiomassComponent::Hemicellulose => "hemicellulose",
            BiomassComponent::LigninC => "lignin-c",
            BiomassComponent::LigninH => "lignin-h",
            BiomassComponent::LigninO => "lignin-o",
            BiomassComponent::Tannins => "tannins",
            BiomassComponent::Triglycerides => "triglycerides",
        }
    }

    /// Position in [`BiomassComponent::ALL`].
    pub fn index(&self) -> usize {
        match self {
            BiomassComponent::Cellulose => 0,
            BiomassComponent::Hemicellulose => 1,
            BiomassComponent::LigninC => 2,
            BiomassComponent::LigninH => 3,
            BiomassComponent::LigninO => 4,
            BiomassComponent::Tannins => 5,
            BiomassComponent::Triglycerides => 6,
        }
    }
}

impl std::fmt::Display for BiomassComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for BiomassComponent {
    type Err = FeedstockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "cellulose" => Ok(BiomassComponent::Cellulose),
            "hemicellulose" => Ok(BiomassComponent::Hemicellulose),
            "lignin-c" => Ok(BiomassComponent::LigninC),
            "lignin-h" => Ok(BiomassComponent::LigninH),
            "lignin-o" => Ok(BiomassComponent::LigninO),
            "tannins" => Ok(BiomassComponent::Tannins),
            "triglycerides" => Ok(BiomassComponent::Triglycerides),
            _ => Err(FeedstockError::InvalidArg {
                what: "unknown biomass component",
            }),
        }
    }
}

/// Dry ash-free biomass composition as mass fractions.
///
/// Always closed: the seven fractions are finite, non-negative and sum to 1
/// within [`Tolerances::CLOSURE`]. A composition that fails these checks is
/// rejected, never renormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomassComposition {
    pub cellulose: f64,
    pub hemicellulose: f64,
    pub lignin_c: f64,
    pub lignin_h: f64,
    pub lignin_o: f64,
    pub tannins: f64,
    pub triglycerides: f64,
}

impl BiomassComposition {
    /// Build a composition from fractions ordered as [`BiomassComponent::ALL`].
    pub fn from_fractions(y: [f64; 7]) -> FeedstockResult<Self> {
        let composition = Self {
            cellulose: y[0],
            hemicellulose: y[1],
            lignin_c: y[2],
            lignin_h: y[3],
            lignin_o: y[4],
            tannins: y[5],
            triglycerides: y[6],
        };
        composition.validate()?;
        Ok(composition)
    }

    /// Build a composition from mass percentages (sum 100).
    pub fn from_percentages(percent: [f64; 7]) -> FeedstockResult<Self> {
        Self::from_fractions(percent.map(|p| p / 100.0))
    }

    /// Check sign, finiteness and closure.
    pub fn validate(&self) -> FeedstockResult<()> {
        let y = self.fractions();
        let sum: f64 = y.iter().sum();

        if y.iter().any(|v| !v.is_finite()) {
            return Err(FeedstockError::CompositionInvariant {
                what: "non-finite mass fraction",
                sum,
            });
        }
        if y.iter().any(|v| *v < 0.0) {
            return Err(FeedstockError::CompositionInvariant {
                what: "negative mass fraction",
                sum,
            });
        }
        if !nearly_equal(sum, 1.0, Tolerances::CLOSURE) {
            return Err(FeedstockError::CompositionInvariant {
                what: "mass fractions do not sum to 1",
                sum,
            });
        }
        Ok(())
    }

    /// Fractions ordered as [`BiomassComponent::ALL`].
    pub fn fractions(&self) -> [f64; 7] {
        [
            self.cellulose,
            self.hemicellulose,
            self.lignin_c,
            self.lignin_h,
            self.lignin_o,
            self.tannins,
            self.triglycerides,
        ]
    }

    pub fn get(&self, component: BiomassComponent) -> f64 {
        self.fractions()[component.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BiomassComponent, f64)> + '_ {
        BiomassComponent::ALL
            .into_iter()
            .zip(self.fractions())
    }

    pub fn sum(&self) -> f64 {
        self.fractions().iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_keys_round_trip() {
        for c in BiomassComponent::ALL {
            let parsed: BiomassComponent = c.key().parse().unwrap();
            assert_eq!(parsed, c);
            assert_eq!(BiomassComponent::ALL[c.index()], c);
        }
        assert_eq!(
            "lignin_h".parse::<BiomassComponent>().unwrap(),
            BiomassComponent::LigninH
        );
        assert!("lignin".parse::<BiomassComponent>().is_err());
    }

    #[test]
    fn closed_composition_accepted() {
        let comp =
            BiomassComposition::from_fractions([0.4, 0.2, 0.1, 0.1, 0.1, 0.05, 0.05]).unwrap();
        assert!((comp.sum() - 1.0).abs() < 1e-12);
        assert_eq!(comp.get(BiomassComponent::Tannins), 0.05);
        assert_eq!(comp.iter().count(), 7);
    }

    #[test]
    fn percentages_are_scaled() {
        let comp = BiomassComposition::from_percentages([40.0, 20.0, 10.0, 10.0, 10.0, 5.0, 5.0])
            .unwrap();
        assert!((comp.cellulose - 0.4).abs() < 1e-12);
    }

    #[test]
    fn open_composition_rejected() {
        let err =
            BiomassComposition::from_fractions([0.4, 0.2, 0.1, 0.1, 0.1, 0.05, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            FeedstockError::CompositionInvariant {
                what: "mass fractions do not sum to 1",
                ..
            }
        ));
    }

    #[test]
    fn negative_fraction_rejected() {
        let err =
            BiomassComposition::from_fractions([0.5, 0.6, -0.1, 0.0, 0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            FeedstockError::CompositionInvariant {
                what: "negative mass fraction",
                ..
            }
        ));
    }

    #[test]
    fn nan_fraction_rejected() {
        assert!(
            BiomassComposition::from_fractions([f64::NAN, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err()
        );
    }
}
