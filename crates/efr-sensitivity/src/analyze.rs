//! Sobol first- and total-order indices from a Saltelli design.

use crate::error::{SensitivityError, SensitivityResult};
use crate::problem::Problem;
use crate::saltelli::rows_per_sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub num_resamples: usize,
    pub conf_level: f64,
    /// Seed of the bootstrap resampling.
    pub seed: u64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            num_resamples: 100,
            conf_level: 0.95,
            seed: 0,
        }
    }
}

/// Indices of one output, one entry per parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SobolIndices {
    pub names: Vec<String>,
    pub s1: Vec<f64>,
    pub s1_conf: Vec<f64>,
    pub st: Vec<f64>,
    pub st_conf: Vec<f64>,
}

/// Split outputs into the `A`, `AB_j` and `B` columns of each base sample.
struct Blocks {
    a: Vec<f64>,
    ab: Vec<Vec<f64>>,
    b: Vec<f64>,
}

impl Blocks {
    fn new(y: &[f64], d: usize) -> Self {
        let step = rows_per_sample(d);
        let n = y.len() / step;
        let a = (0..n).map(|i| y[i * step]).collect();
        let b = (0..n).map(|i| y[i * step + step - 1]).collect();
        let ab = (0..d)
            .map(|j| (0..n).map(|i| y[i * step + 1 + j]).collect())
            .collect();
        Self { a, ab, b }
    }
}

/// Population variance of `A ∪ B` over the selected rows.
fn pooled_variance(a: &[f64], b: &[f64], idx: &[usize]) -> f64 {
    idx.iter()
        .map(|&i| a[i])
        .chain(idx.iter().map(|&i| b[i]))
        .population_variance()
}

fn first_order(a: &[f64], ab: &[f64], b: &[f64], idx: &[usize]) -> f64 {
    idx.iter().map(|&i| b[i] * (ab[i] - a[i])).mean() / pooled_variance(a, b, idx)
}

fn total_order(a: &[f64], ab: &[f64], b: &[f64], idx: &[usize]) -> f64 {
    0.5 * idx.iter().map(|&i| (a[i] - ab[i]).powi(2)).mean() / pooled_variance(a, b, idx)
}

/// Compute S1/ST and their bootstrap confidence half-widths for output `y`.
pub fn analyze(
    problem: &Problem,
    y: &[f64],
    output: &str,
    options: &AnalysisOptions,
) -> SensitivityResult<SobolIndices> {
    let d = problem.num_vars();
    let step = rows_per_sample(d);
    if y.is_empty() || y.len() % step != 0 {
        return Err(SensitivityError::OutputLength {
            expected: (y.len() / step).max(1) * step,
            got: y.len(),
        });
    }
    if options.num_resamples < 2 {
        return Err(SensitivityError::InvalidArg {
            what: "at least two bootstrap resamples are needed".to_string(),
        });
    }
    if !(options.conf_level > 0.0 && options.conf_level < 1.0) {
        return Err(SensitivityError::InvalidArg {
            what: format!("confidence level must lie in (0, 1), got {}", options.conf_level),
        });
    }

    let mu = y.mean();
    let sigma = y.population_std_dev();
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(SensitivityError::ZeroVariance {
            output: output.to_string(),
        });
    }
    let standardized: Vec<f64> = y.iter().map(|v| (v - mu) / sigma).collect();
    let blocks = Blocks::new(&standardized, d);
    let n = blocks.a.len();

    let all: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(options.seed);
    let resamples: Vec<Vec<usize>> = (0..options.num_resamples)
        .map(|_| (0..n).map(|_| rng.random_range(0..n)).collect())
        .collect();
    let z = Normal::standard().inverse_cdf(0.5 + options.conf_level / 2.0);

    let mut out = SobolIndices {
        names: problem.names().to_vec(),
        s1: Vec::with_capacity(d),
        s1_conf: Vec::with_capacity(d),
        st: Vec::with_capacity(d),
        st_conf: Vec::with_capacity(d),
    };
    for ab in &blocks.ab {
        out.s1.push(first_order(&blocks.a, ab, &blocks.b, &all));
        out.st.push(total_order(&blocks.a, ab, &blocks.b, &all));

        let s1_boot: Vec<f64> = resamples
            .iter()
            .map(|r| first_order(&blocks.a, ab, &blocks.b, r))
            .collect();
        let st_boot: Vec<f64> = resamples
            .iter()
            .map(|r| total_order(&blocks.a, ab, &blocks.b, r))
            .collect();
        out.s1_conf.push(z * s1_boot.std_dev());
        out.st_conf.push(z * st_boot.std_dev());
    }

    tracing::debug!(output, n, "Sobol indices computed");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saltelli::{DEFAULT_SKIP, SaltelliDesign, SamplingScheme};

    fn run(f: impl Fn(&[f64]) -> f64, d: usize, n: usize) -> SobolIndices {
        run_with(f, d, n, &AnalysisOptions::default())
    }

    fn run_with(
        f: impl Fn(&[f64]) -> f64,
        d: usize,
        n: usize,
        options: &AnalysisOptions,
    ) -> SobolIndices {
        let problem = Problem::new(
            (0..d).map(|i| format!("x{i}")).collect(),
            vec![[0.0, 1.0]; d],
        )
        .unwrap();
        let design = SaltelliDesign::generate(&problem, n, SamplingScheme::Sobol, DEFAULT_SKIP)
            .unwrap();
        let y: Vec<f64> = design.rows.iter().map(|r| f(r.as_slice())).collect();
        analyze(&problem, &y, "y", options).unwrap()
    }

    #[test]
    fn additive_model_indices() {
        // y = x0 + 2·x1: V = 1/12 + 4/12, S = [0.2, 0.8, 0]
        let si = run(|x| x[0] + 2.0 * x[1], 3, 1024);
        assert!((si.s1[0] - 0.2).abs() < 0.03, "{si:?}");
        assert!((si.s1[1] - 0.8).abs() < 0.03, "{si:?}");
        assert!(si.s1[2].abs() < 1e-12);
        assert!((si.st[0] - 0.2).abs() < 0.03);
        assert!((si.st[1] - 0.8).abs() < 0.03);
        assert!(si.st[2].abs() < 1e-12);
        assert!(si.s1_conf.iter().all(|c| c.is_finite() && *c >= 0.0));
    }

    #[test]
    fn interaction_shows_in_total_order_only() {
        // y = x0·x1 has ST > S1 for both inputs.
        let si = run(|x| x[0] * x[1], 2, 1024);
        for j in 0..2 {
            assert!(si.st[j] > si.s1[j] + 0.05, "{si:?}");
        }
    }

    #[test]
    fn confidence_width_follows_normal_quantile() {
        // Same resamples, so half-widths scale by z(0.99) / z(0.95).
        let f = |x: &[f64]| x[0] + 2.0 * x[1] + x[0] * x[1];
        let narrow = run_with(f, 2, 256, &AnalysisOptions::default());
        let wide = run_with(
            f,
            2,
            256,
            &AnalysisOptions {
                conf_level: 0.99,
                ..AnalysisOptions::default()
            },
        );
        let ratio = 2.575_829_303_548_901 / 1.959_963_984_540_054;
        for j in 0..2 {
            assert!(narrow.s1_conf[j] > 0.0);
            assert!((wide.s1_conf[j] / narrow.s1_conf[j] - ratio).abs() < 1e-9);
            assert!((wide.st_conf[j] / narrow.st_conf[j] - ratio).abs() < 1e-9);
        }
        assert_eq!(narrow.s1, wide.s1);
    }

    #[test]
    fn constant_output_is_an_error() {
        let problem = Problem::new(vec!["a".into()], vec![[0.0, 1.0]]).unwrap();
        let y = vec![3.0; 8];
        assert!(matches!(
            analyze(&problem, &y, "gas", &AnalysisOptions::default()),
            Err(SensitivityError::ZeroVariance { .. })
        ));
    }

    #[test]
    fn mismatched_output_length() {
        let problem = Problem::new(vec!["a".into()], vec![[0.0, 1.0]]).unwrap();
        assert!(matches!(
            analyze(&problem, &[1.0, 2.0, 3.0], "gas", &AnalysisOptions::default()),
            Err(SensitivityError::OutputLength { .. })
        ));
    }
}
