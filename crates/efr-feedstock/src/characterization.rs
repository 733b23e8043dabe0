//! Biomass characterization from elemental carbon and hydrogen.
//!
//! The seven biomass components are grouped into three reference mixtures:
//!
//! - RM1 = α·CELL + (1−α)·HCE
//! - RM2 = δ·(β·LIG-O + (1−β)·LIG-C) + (1−δ)·TANN
//! - RM3 = ε·(γ·LIG-H + (1−γ)·LIG-C) + (1−ε)·TGL
//!
//! Splits are molar. Given the daf carbon and hydrogen mass fractions, the
//! mass fractions of the three mixtures follow from
//!
//! ```text
//! | 1   1   1  | |y_rm1|   | 1  |
//! | c1  c2  c3 | |y_rm2| = | yc |
//! | h1  h2  h3 | |y_rm3|   | yh |
//! ```
//!
//! and each mixture is split back into its components by mass. Oxygen closes
//! the balance (`yo = 1 − yc − yh`).

use crate::composition::{BiomassComponent, BiomassComposition};
use crate::error::{FeedstockError, FeedstockResult};
use nalgebra::{Matrix3, Vector3};

const MW_C: f64 = 12.011;
const MW_H: f64 = 1.008;
const MW_O: f64 = 15.999;

/// Tiny negative fractions from round-off are clipped to zero below this.
const NEGATIVE_ROUNDOFF: f64 = 1e-12;

/// Elemental formula `C_c H_h O_o` of each biomass component.
fn formula(component: BiomassComponent) -> [f64; 3] {
    match component {
        BiomassComponent::Cellulose => [6.0, 10.0, 5.0],
        BiomassComponent::Hemicellulose => [5.0, 8.0, 4.0],
        BiomassComponent::LigninC => [15.0, 14.0, 4.0],
        BiomassComponent::LigninH => [22.0, 28.0, 9.0],
        BiomassComponent::LigninO => [20.0, 22.0, 10.0],
        BiomassComponent::Tannins => [15.0, 12.0, 7.0],
        BiomassComponent::Triglycerides => [57.0, 100.0, 7.0],
    }
}

fn molar_mass(component: BiomassComponent) -> f64 {
    let [c, h, o] = formula(component);
    c * MW_C + h * MW_H + o * MW_O
}

/// Splitting parameters of the reference mixtures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParameters {
    /// Cellulose / hemicellulose split in RM1.
    pub alpha: f64,
    /// Lignin-O / lignin-C split in RM2.
    pub beta: f64,
    /// Lignin-H / lignin-C split in RM3.
    pub gamma: f64,
    /// Lignins / tannins split in RM2.
    pub delta: f64,
    /// Lignins / triglycerides split in RM3.
    pub epsilon: f64,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            alpha: 0.6,
            beta: 0.8,
            gamma: 0.8,
            delta: 1.0,
            epsilon: 1.0,
        }
    }
}

impl ShapeParameters {
    fn validate(&self) -> FeedstockResult<()> {
        let all = [self.alpha, self.beta, self.gamma, self.delta, self.epsilon];
        if all.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
            return Err(FeedstockError::InvalidArg {
                what: "shape parameters must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

/// The three reference mixtures for a set of shape parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMixtures {
    /// Mass fraction of each component inside each mixture (rows: RM1..RM3).
    split: [[f64; 7]; 3],
    /// Carbon mass fraction of each mixture.
    carbon: [f64; 3],
    /// Hydrogen mass fraction of each mixture.
    hydrogen: [f64; 3],
}

impl ReferenceMixtures {
    pub fn new(shape: &ShapeParameters) -> FeedstockResult<Self> {
        shape.validate()?;
        let ShapeParameters {
            alpha,
            beta,
            gamma,
            delta,
            epsilon,
        } = *shape;

        use BiomassComponent::*;
        let moles: [Vec<(BiomassComponent, f64)>; 3] = [
            vec![(Cellulose, alpha), (Hemicellulose, 1.0 - alpha)],
            vec![
                (LigninO, delta * beta),
                (LigninC, delta * (1.0 - beta)),
                (Tannins, 1.0 - delta),
            ],
            vec![
                (LigninH, epsilon * gamma),
                (LigninC, epsilon * (1.0 - gamma)),
                (Triglycerides, 1.0 - epsilon),
            ],
        ];

        let mut split = [[0.0; 7]; 3];
        let mut carbon = [0.0; 3];
        let mut hydrogen = [0.0; 3];

        for (rm, members) in moles.iter().enumerate() {
            let mass: f64 = members.iter().map(|(c, n)| n * molar_mass(*c)).sum();
            for (component, n) in members {
                let [nc, nh, _] = formula(*component);
                split[rm][component.index()] += n * molar_mass(*component) / mass;
                carbon[rm] += n * nc * MW_C / mass;
                hydrogen[rm] += n * nh * MW_H / mass;
            }
        }

        Ok(Self {
            split,
            carbon,
            hydrogen,
        })
    }

    pub fn carbon(&self) -> [f64; 3] {
        self.carbon
    }

    pub fn hydrogen(&self) -> [f64; 3] {
        self.hydrogen
    }

    /// Component mass fractions inside reference mixture `rm` (0, 1 or 2).
    pub fn split(&self, rm: usize) -> [f64; 7] {
        self.split[rm]
    }
}

/// Result of a characterization: the composition and the mixture fractions
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Characterization {
    pub yc: f64,
    pub yh: f64,
    pub shape: ShapeParameters,
    /// Mass fractions of RM1, RM2, RM3.
    pub y_rm: [f64; 3],
    pub composition: BiomassComposition,
}

/// Decompose a feedstock with daf mass fractions `yc`, `yh` into the seven
/// biomass components.
pub fn characterize(yc: f64, yh: f64, shape: &ShapeParameters) -> FeedstockResult<Characterization> {
    if !(yc.is_finite() && yh.is_finite()) || yc <= 0.0 || yh <= 0.0 || yc + yh >= 1.0 {
        return Err(FeedstockError::InvalidArg {
            what: "yc and yh must be positive with yc + yh < 1",
        });
    }

    let rms = ReferenceMixtures::new(shape)?;
    let [c1, c2, c3] = rms.carbon;
    let [h1, h2, h3] = rms.hydrogen;

    let a = Matrix3::new(1.0, 1.0, 1.0, c1, c2, c3, h1, h2, h3);
    let b = Vector3::new(1.0, yc, yh);
    let solved = a.lu().solve(&b).ok_or_else(|| FeedstockError::Singular {
        what: format!("{shape:?}"),
    })?;

    let y_rm = [solved[0], solved[1], solved[2]];
    if y_rm.iter().any(|y| *y < -NEGATIVE_ROUNDOFF) {
        return Err(FeedstockError::OutsideReferenceMixtures { yc, yh, y_rm });
    }
    let y_rm = y_rm.map(|y| y.max(0.0));

    let mut y = [0.0; 7];
    for (rm, weight) in y_rm.iter().enumerate() {
        for (dst, frac) in y.iter_mut().zip(rms.split[rm]) {
            *dst += weight * frac;
        }
    }

    tracing::debug!(yc, yh, ?y_rm, "biomass characterization solved");

    Ok(Characterization {
        yc,
        yh,
        shape: *shape,
        y_rm,
        composition: BiomassComposition::from_fractions(y)?,
    })
}
