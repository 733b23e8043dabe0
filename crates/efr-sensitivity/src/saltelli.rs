//! Saltelli sample design and simplex rescaling.

use crate::error::{SensitivityError, SensitivityResult};
use crate::problem::Problem;
use crate::sobol_seq::SobolSequence;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Leading Sobol points dropped by default.
pub const DEFAULT_SKIP: usize = 1024;

/// Source of the base samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingScheme {
    #[default]
    Sobol,
    /// Seeded uniform random numbers.
    Random { seed: u64 },
}

/// Rows generated per base sample for `d` parameters.
pub fn rows_per_sample(d: usize) -> usize {
    2 * d + 2
}

/// Saltelli design with `n × (2D + 2)` rows of length D.
///
/// Per base sample the rows are `A`, `AB_1..AB_D`, `BA_1..BA_D`, `B`, where
/// `AB_j` is `A` with column `j` taken from `B` and `BA_j` the reverse.
#[derive(Debug, Clone, PartialEq)]
pub struct SaltelliDesign {
    pub num_vars: usize,
    pub rows: Vec<Vec<f64>>,
}

impl SaltelliDesign {
    pub fn generate(
        problem: &Problem,
        n: usize,
        scheme: SamplingScheme,
        skip: usize,
    ) -> SensitivityResult<Self> {
        if n == 0 {
            return Err(SensitivityError::InvalidArg {
                what: "sample multiplier n must be positive".to_string(),
            });
        }
        let d = problem.num_vars();
        let base = match scheme {
            SamplingScheme::Sobol => SobolSequence::sample(2 * d, n, skip)?,
            SamplingScheme::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..n)
                    .map(|_| (0..2 * d).map(|_| rng.random::<f64>()).collect())
                    .collect()
            }
        };

        let mut rows = Vec::with_capacity(n * rows_per_sample(d));
        for point in &base {
            let (a, b) = point.split_at(d);
            rows.push(problem.scale(a));
            for j in 0..d {
                let mut ab = a.to_vec();
                ab[j] = b[j];
                rows.push(problem.scale(&ab));
            }
            for j in 0..d {
                let mut ba = b.to_vec();
                ba[j] = a[j];
                rows.push(problem.scale(&ba));
            }
            rows.push(problem.scale(b));
        }

        Ok(Self { num_vars: d, rows })
    }

    pub fn n_base(&self) -> usize {
        self.rows.len() / rows_per_sample(self.num_vars)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Divide a row by its sum so its entries add up to 1.
pub fn rescale_row(row: &[f64], index: usize) -> SensitivityResult<Vec<f64>> {
    let sum: f64 = row.iter().sum();
    if !(sum.is_finite() && sum > 0.0) || row.iter().any(|v| *v < 0.0) {
        return Err(SensitivityError::DegenerateRow { row: index, sum });
    }
    Ok(row.iter().map(|v| v / sum).collect())
}

/// Rescale every row onto the unit simplex.
///
/// This changes the distribution of the inputs away from independent uniforms.
pub fn rescale_to_simplex(rows: &[Vec<f64>]) -> SensitivityResult<Vec<Vec<f64>>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| rescale_row(row, i))
        .collect()
}
