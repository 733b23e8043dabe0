//! Lumped pyrolysis mechanism: species and first-order reactions.
//!
//! Every reaction consumes one reactant and distributes its mass over the
//! products with mass yields that are normalized to sum to 1 when the
//! mechanism is built, so total mass is conserved by construction.

use crate::error::{KineticsError, KineticsResult};
use efr_core::units::constants::R_MOLAR;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Default specific heat capacity [J/(kg·K)].
fn default_cp() -> f64 {
    1500.0
}

/// Species entry of a mechanism file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDef {
    pub name: String,
    /// Molar mass [kg/kmol].
    pub molar_mass: f64,
    /// Specific heat capacity [J/(kg·K)].
    #[serde(default = "default_cp")]
    pub cp: f64,
}

/// Reaction entry of a mechanism file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionDef {
    pub reactant: String,
    /// Product mass yields (renormalized to sum 1).
    pub products: BTreeMap<String, f64>,
    /// Pre-exponential factor [1/s · K^-b].
    pub a: f64,
    /// Temperature exponent.
    #[serde(default)]
    pub b: f64,
    /// Activation energy [J/mol].
    pub ea: f64,
    /// Heat of reaction [J/kg of reactant], positive when endothermic.
    #[serde(default)]
    pub dh: f64,
}

/// Serializable mechanism definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismDef {
    pub name: String,
    pub species: Vec<SpeciesDef>,
    pub reactions: Vec<ReactionDef>,
}

/// A species of a built mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub name: String,
    pub molar_mass: f64,
    pub cp: f64,
}

/// A reaction resolved to species indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub reactant: usize,
    /// `(species index, mass yield)`; yields sum to 1.
    pub products: Vec<(usize, f64)>,
    pub a: f64,
    pub b: f64,
    pub ea: f64,
    pub dh: f64,
}

impl Reaction {
    /// Rate constant `k = A·T^b·exp(−Ea/(R·T))` [1/s].
    pub fn rate_constant(&self, t: f64) -> f64 {
        self.a * t.powf(self.b) * (-self.ea / (R_MOLAR * t)).exp()
    }

    /// Temperature derivative of the rate constant.
    pub fn rate_constant_dt(&self, t: f64) -> f64 {
        self.rate_constant(t) * (self.b / t + self.ea / (R_MOLAR * t * t))
    }
}

/// Validated mechanism with a species-name index.
#[derive(Debug, Clone, PartialEq)]
pub struct Mechanism {
    name: String,
    species: Vec<Species>,
    reactions: Vec<Reaction>,
    index: HashMap<String, usize>,
}

impl Mechanism {
    pub fn from_def(def: MechanismDef) -> KineticsResult<Self> {
        if def.species.is_empty() {
            return Err(KineticsError::Mechanism {
                what: format!("mechanism '{}' has no species", def.name),
            });
        }

        let mut index = HashMap::with_capacity(def.species.len());
        let mut species = Vec::with_capacity(def.species.len());
        for (i, s) in def.species.into_iter().enumerate() {
            if !(s.molar_mass.is_finite() && s.molar_mass > 0.0) {
                return Err(KineticsError::Mechanism {
                    what: format!("species '{}' has non-positive molar mass", s.name),
                });
            }
            if !(s.cp.is_finite() && s.cp > 0.0) {
                return Err(KineticsError::Mechanism {
                    what: format!("species '{}' has non-positive heat capacity", s.name),
                });
            }
            if index.insert(s.name.clone(), i).is_some() {
                return Err(KineticsError::Mechanism {
                    what: format!("duplicate species '{}'", s.name),
                });
            }
            species.push(Species {
                name: s.name,
                molar_mass: s.molar_mass,
                cp: s.cp,
            });
        }

        let lookup = |name: &str| -> KineticsResult<usize> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| KineticsError::UnknownSpecies {
                    name: name.to_string(),
                })
        };

        let mut reactions = Vec::with_capacity(def.reactions.len());
        for r in def.reactions {
            let reactant = lookup(&r.reactant)?;
            let total: f64 = r.products.values().sum();
            if r.products.values().any(|v| !v.is_finite() || *v < 0.0)
                || !(total.is_finite() && total > 0.0)
            {
                return Err(KineticsError::Mechanism {
                    what: format!("reaction of '{}' has invalid product yields", r.reactant),
                });
            }
            if !(r.a.is_finite() && r.a > 0.0 && r.ea.is_finite() && r.b.is_finite()) {
                return Err(KineticsError::Mechanism {
                    what: format!("reaction of '{}' has invalid Arrhenius parameters", r.reactant),
                });
            }

            let mut products = Vec::with_capacity(r.products.len());
            for (name, y) in &r.products {
                products.push((lookup(name)?, y / total));
            }

            reactions.push(Reaction {
                reactant,
                products,
                a: r.a,
                b: r.b,
                ea: r.ea,
                dh: r.dh,
            });
        }

        Ok(Self {
            name: def.name,
            species,
            reactions,
            index,
        })
    }

    pub fn from_yaml_str(content: &str) -> KineticsResult<Self> {
        let def: MechanismDef = serde_yaml::from_str(content)?;
        Self::from_def(def)
    }

    pub fn load_yaml(path: &Path) -> KineticsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn require_species(&self, name: &str) -> KineticsResult<usize> {
        self.species_index(name)
            .ok_or_else(|| KineticsError::UnknownSpecies {
                name: name.to_string(),
            })
    }

    pub fn species_names(&self) -> impl Iterator<Item = &str> {
        self.species.iter().map(|s| s.name.as_str())
    }

    /// Mean molar mass `1 / Σ(Y_i / W_i)` [kg/kmol].
    pub fn mean_molar_mass(&self, y: &[f64]) -> f64 {
        let inv: f64 = self
            .species
            .iter()
            .zip(y)
            .map(|(s, yi)| yi / s.molar_mass)
            .sum();
        1.0 / inv
    }

    /// Mixture specific heat `Σ Y_i·cp_i` [J/(kg·K)].
    pub fn cp_mass(&self, y: &[f64]) -> f64 {
        self.species.iter().zip(y).map(|(s, yi)| yi * s.cp).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY: &str = r#"
name: toy
species:
  - { name: A, molar_mass: 100.0 }
  - { name: B, molar_mass: 50.0, cp: 1000.0 }
  - { name: G, molar_mass: 25.0 }
reactions:
  - reactant: A
    products: { B: 3.0, G: 1.0 }
    a: 1.0e3
    ea: 50000.0
"#;

    #[test]
    fn yaml_mechanism_builds_and_normalizes_yields() {
        let mech = Mechanism::from_yaml_str(TOY).unwrap();
        assert_eq!(mech.name(), "toy");
        assert_eq!(mech.n_species(), 3);
        assert_eq!(mech.species_index("G"), Some(2));
        assert_eq!(mech.species()[0].cp, 1500.0);

        let r = &mech.reactions()[0];
        let total: f64 = r.products.iter().map(|(_, y)| y).sum();
        assert!((total - 1.0).abs() < 1e-15);
        assert!((r.products.iter().find(|(i, _)| *i == 1).unwrap().1 - 0.75).abs() < 1e-15);
    }

    #[test]
    fn unknown_product_is_rejected() {
        let bad = TOY.replace("G: 1.0", "X: 1.0");
        let err = Mechanism::from_yaml_str(&bad).unwrap_err();
        assert_eq!(err, KineticsError::UnknownSpecies { name: "X".into() });
    }

    #[test]
    fn duplicate_species_rejected() {
        let bad = TOY.replace("name: G", "name: B");
        assert!(matches!(
            Mechanism::from_yaml_str(&bad),
            Err(KineticsError::Mechanism { .. })
        ));
    }

    #[test]
    fn rate_constant_derivative_matches_finite_difference() {
        let mech = Mechanism::from_yaml_str(TOY).unwrap();
        let r = &mech.reactions()[0];
        let t = 773.15;
        let h = 1e-3;
        let fd = (r.rate_constant(t + h) - r.rate_constant(t - h)) / (2.0 * h);
        assert!((r.rate_constant_dt(t) - fd).abs() < 1e-6 * fd.abs());
    }

    #[test]
    fn mixture_properties() {
        let mech = Mechanism::from_yaml_str(TOY).unwrap();
        let y = [0.5, 0.5, 0.0];
        // 1 / (0.5/100 + 0.5/50) = 66.67
        assert!((mech.mean_molar_mass(&y) - 200.0 / 3.0).abs() < 1e-9);
        assert!((mech.cp_mass(&y) - 1250.0).abs() < 1e-9);
    }
}
