//! Sensitivity driver: design, one batch run per row, Sobol analysis per output.

use crate::analyze::{AnalysisOptions, SobolIndices, analyze};
use crate::error::{SensitivityError, SensitivityResult};
use crate::problem::Problem;
use crate::saltelli::{
    DEFAULT_SKIP, SaltelliDesign, SamplingScheme, rescale_to_simplex, rows_per_sample,
};
use efr_feedstock::{BiomassComponent, BiomassComposition};
use efr_kinetics::KineticsEngine;
use efr_reactor::{
    BatchParams, FEED_SPECIES, PhaseIndex, PhaseSpecies, ReactorError, batch_final_yields,
};
use rayon::prelude::*;

/// What to do when a sample run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the analysis on the first failing row.
    #[default]
    FailFast,
    /// Drop every base sample block containing a failed row.
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityOptions {
    /// Sample multiplier `n`
    pub n_samples: usize,
    pub scheme: SamplingScheme,
    /// Leading Sobol points skipped
    pub skip: usize,
    /// Evaluate rows on the rayon thread pool
    pub parallel: bool,
    pub failure_policy: FailurePolicy,
    pub analysis: AnalysisOptions,
}

impl Default for SensitivityOptions {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            scheme: SamplingScheme::Sobol,
            skip: DEFAULT_SKIP,
            parallel: false,
            failure_policy: FailurePolicy::FailFast,
            analysis: AnalysisOptions::default(),
        }
    }
}

/// Names of the three analyzed outputs.
pub const OUTPUTS: [&str; 3] = ["gas", "liquid", "solid"];

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityRun {
    pub problem: Problem,
    /// Design rows after rescaling onto the simplex.
    pub samples: Vec<Vec<f64>>,
    /// `[gas, liquid, solid]` final yields per row; `None` for skipped rows.
    pub outputs: Vec<Option<[f64; 3]>>,
    /// Rows dropped under [`FailurePolicy::Skip`], ascending.
    pub skipped_rows: Vec<usize>,
    pub gas: SobolIndices,
    pub liquid: SobolIndices,
    pub solid: SobolIndices,
}

impl SensitivityRun {
    pub fn indices(&self) -> [(&'static str, &SobolIndices); 3] {
        [
            (OUTPUTS[0], &self.gas),
            (OUTPUTS[1], &self.liquid),
            (OUTPUTS[2], &self.solid),
        ]
    }

    /// `(rows, columns)` of the design.
    pub fn shape(&self) -> (usize, usize) {
        (self.samples.len(), self.problem.num_vars())
    }
}

/// Map parameter names (species such as `CELL` or component keys such as
/// `cellulose`) to biomass components.
pub fn parameter_components(problem: &Problem) -> SensitivityResult<Vec<BiomassComponent>> {
    let mut components: Vec<BiomassComponent> = Vec::with_capacity(problem.num_vars());
    for name in problem.names() {
        let component = FEED_SPECIES
            .iter()
            .find(|(_, species)| species.eq_ignore_ascii_case(name))
            .map(|(c, _)| *c)
            .map_or_else(|| name.parse::<BiomassComponent>(), Ok)
            .map_err(|_| SensitivityError::InvalidArg {
                what: format!("parameter '{name}' is not a biomass component"),
            })?;
        if components.contains(&component) {
            return Err(SensitivityError::InvalidArg {
                what: format!("parameter '{name}' repeats component {component}"),
            });
        }
        components.push(component);
    }
    Ok(components)
}

fn composition_of(
    components: &[BiomassComponent],
    row: &[f64],
) -> Result<BiomassComposition, ReactorError> {
    let mut y = [0.0; 7];
    for (c, v) in components.iter().zip(row) {
        y[c.index()] = *v;
    }
    Ok(BiomassComposition::from_fractions(y)?)
}

/// Saltelli design rescaled so every row sums to 1.
pub fn sample_design(
    problem: &Problem,
    options: &SensitivityOptions,
) -> SensitivityResult<Vec<Vec<f64>>> {
    let design = SaltelliDesign::generate(problem, options.n_samples, options.scheme, options.skip)?;
    rescale_to_simplex(&design.rows)
}

/// Run the full sensitivity workflow on batch reactors.
pub fn run_sensitivity<E: KineticsEngine>(
    engine: &E,
    problem: &Problem,
    batch: &BatchParams,
    options: &SensitivityOptions,
) -> SensitivityResult<SensitivityRun> {
    let components = parameter_components(problem)?;
    let index: PhaseIndex = PhaseSpecies::softwood()
        .metaplastics_as_solid()
        .resolve(engine.mechanism())?;

    let samples = sample_design(problem, options)?;
    let n_base = samples.len() / rows_per_sample(problem.num_vars());
    tracing::info!(
        n = options.n_samples,
        rows = samples.len(),
        parallel = options.parallel,
        "sensitivity design generated"
    );

    let eval = |(row, values): (usize, &Vec<f64>)| -> Result<[f64; 3], SensitivityError> {
        let result = composition_of(&components, values)
            .and_then(|comp| batch_final_yields(engine, &comp, batch, &index));
        match result {
            Ok(p) => {
                tracing::debug!(row, gas = p.gas, liquid = p.liquid, solid = p.solid, "sample done");
                Ok([p.gas, p.liquid, p.solid])
            }
            Err(source) => Err(SensitivityError::Sample { row, source }),
        }
    };

    let results: Vec<Result<[f64; 3], SensitivityError>> = if options.parallel {
        samples.par_iter().enumerate().map(eval).collect()
    } else {
        let mut out = Vec::with_capacity(samples.len());
        for item in samples.iter().enumerate() {
            let r = eval(item);
            let failed = r.is_err();
            out.push(r);
            if failed && options.failure_policy == FailurePolicy::FailFast {
                break;
            }
        }
        out
    };

    let step = rows_per_sample(problem.num_vars());
    let mut outputs: Vec<Option<[f64; 3]>> = Vec::with_capacity(samples.len());
    let mut skipped_rows = Vec::new();
    let mut failed_blocks = vec![false; n_base];
    for (row, r) in results.into_iter().enumerate() {
        match r {
            Ok(y) => outputs.push(Some(y)),
            Err(e) => match options.failure_policy {
                FailurePolicy::FailFast => return Err(e),
                FailurePolicy::Skip => {
                    tracing::warn!(row, error = %e, "sample failed; dropping its block");
                    failed_blocks[row / step] = true;
                    outputs.push(None);
                }
            },
        }
    }

    for (block, failed) in failed_blocks.iter().enumerate() {
        if *failed {
            for row in block * step..(block + 1) * step {
                outputs[row] = None;
                skipped_rows.push(row);
            }
        }
    }
    if skipped_rows.len() == outputs.len() {
        return Err(SensitivityError::AllSamplesFailed);
    }

    let column = |k: usize| -> Vec<f64> { outputs.iter().flatten().map(|y| y[k]).collect() };
    let gas = analyze(problem, &column(0), OUTPUTS[0], &options.analysis)?;
    let liquid = analyze(problem, &column(1), OUTPUTS[1], &options.analysis)?;
    let solid = analyze(problem, &column(2), OUTPUTS[2], &options.analysis)?;

    tracing::info!(
        rows = outputs.len(),
        skipped = skipped_rows.len(),
        "sensitivity analysis finished"
    );

    Ok(SensitivityRun {
        problem: problem.clone(),
        samples,
        outputs,
        skipped_rows,
        gas,
        liquid,
        solid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn species_and_component_names_map() {
        let p = Problem::new(
            names(&["CELL", "hemicellulose", "LIGC", "lignin_h", "LIGO", "TANN", "TGL"]),
            vec![[0.01, 1.0]; 7],
        )
        .unwrap();
        let c = parameter_components(&p).unwrap();
        assert_eq!(c[0], BiomassComponent::Cellulose);
        assert_eq!(c[1], BiomassComponent::Hemicellulose);
        assert_eq!(c[3], BiomassComponent::LigninH);
    }

    #[test]
    fn repeated_or_unknown_names_rejected() {
        let p = Problem::new(names(&["CELL", "cellulose"]), vec![[0.01, 1.0]; 2]).unwrap();
        assert!(parameter_components(&p).is_err());
        let p = Problem::new(names(&["ASH"]), vec![[0.01, 1.0]]).unwrap();
        assert!(parameter_components(&p).is_err());
    }

    #[test]
    fn rescaled_row_becomes_composition() {
        let comps = vec![BiomassComponent::Tannins, BiomassComponent::Cellulose];
        let comp = composition_of(&comps, &[0.25, 0.75]).unwrap();
        assert_eq!(comp.tannins, 0.25);
        assert_eq!(comp.cellulose, 0.75);
        assert!(composition_of(&comps, &[0.25, 0.5]).is_err());
    }
}
