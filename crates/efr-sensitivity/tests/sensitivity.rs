//! Sensitivity design and end-to-end runs on the built-in engine.

use efr_core::units::{k, pa, s};
use efr_kinetics::{
    BatchReactor, EnergyEquation, FlowStage, IntegrationOptions, KineticsEngine, KineticsError,
    KineticsResult, LumpedEngine, Mechanism, ReactorKind, ThermoState,
};
use efr_reactor::BatchParams;
use efr_sensitivity::{
    FailurePolicy, Problem, SamplingScheme, SensitivityError, SensitivityOptions, analyze,
    run_sensitivity, sample_design,
};

fn problem() -> Problem {
    Problem::new(
        ["CELL", "GMSW", "LIGC", "LIGH", "LIGO", "TANN", "TGL"]
            .iter()
            .map(|n| n.to_string())
            .collect(),
        vec![[0.01, 1.0]; 7],
    )
    .unwrap()
}

fn batch() -> BatchParams {
    BatchParams {
        temperature: k(773.15),
        pressure: pa(101_325.0),
        duration: s(2.0),
        energy: EnergyEquation::Off,
        kind: ReactorKind::ConstantVolume,
    }
}

#[test]
fn design_of_one_thousand_base_samples() {
    let options = SensitivityOptions::default();
    assert_eq!(options.n_samples, 1000);
    let rows = sample_design(&problem(), &options).unwrap();

    assert_eq!(rows.len(), 16_000);
    for row in &rows {
        assert_eq!(row.len(), 7);
        let sum: f64 = row.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(row.iter().all(|v| *v > 0.0));
    }
}

#[test]
fn seeded_random_design_is_reproducible() {
    let options = SensitivityOptions {
        n_samples: 8,
        scheme: SamplingScheme::Random { seed: 42 },
        ..SensitivityOptions::default()
    };
    assert_eq!(
        sample_design(&problem(), &options).unwrap(),
        sample_design(&problem(), &options).unwrap()
    );
}

#[test]
fn small_analysis_runs_in_parallel_and_in_order() {
    let engine = LumpedEngine::softwood().unwrap();
    let base = SensitivityOptions {
        n_samples: 4,
        ..SensitivityOptions::default()
    };
    let serial = run_sensitivity(&engine, &problem(), &batch(), &base).unwrap();
    let parallel = run_sensitivity(
        &engine,
        &problem(),
        &batch(),
        &SensitivityOptions {
            parallel: true,
            ..base
        },
    )
    .unwrap();

    assert_eq!(serial.shape(), (64, 7));
    assert!(serial.skipped_rows.is_empty());
    assert_eq!(serial.outputs, parallel.outputs);
    assert_eq!(serial.gas, parallel.gas);

    for y in serial.outputs.iter().flatten() {
        let total: f64 = y.iter().sum();
        assert!((total - 1.0).abs() < 1e-6, "{y:?}");
    }
    for (_, si) in serial.indices() {
        assert_eq!(si.s1.len(), 7);
        assert!(si.st.iter().all(|v| v.is_finite()));
        assert!(si.s1_conf.iter().all(|v| v.is_finite() && *v >= 0.0));
    }
}

#[test]
fn exhausted_budget_fails_fast_or_skips_everything() {
    let tight = IntegrationOptions {
        max_steps: 3,
        ..IntegrationOptions::default()
    };
    let engine = LumpedEngine::softwood().unwrap().with_options(tight).unwrap();
    let options = SensitivityOptions {
        n_samples: 2,
        ..SensitivityOptions::default()
    };

    let err = run_sensitivity(&engine, &problem(), &batch(), &options).unwrap_err();
    match err {
        SensitivityError::Sample { row, source } => {
            assert_eq!(row, 0);
            assert!(source.is_convergence_failure());
        }
        other => panic!("unexpected error {other:?}"),
    }

    let skip = SensitivityOptions {
        failure_policy: FailurePolicy::Skip,
        ..options
    };
    assert!(matches!(
        run_sensitivity(&engine, &problem(), &batch(), &skip),
        Err(SensitivityError::AllSamplesFailed)
    ));
}

/// Engine that refuses feeds richer in cellulose than `max_cell`.
struct CelluloseLimited {
    inner: LumpedEngine,
    max_cell: f64,
}

impl KineticsEngine for CelluloseLimited {
    type Batch = BatchReactor;
    type Stage = FlowStage;

    fn mechanism(&self) -> &Mechanism {
        self.inner.mechanism()
    }

    fn state(
        &self,
        temperature: f64,
        pressure: f64,
        mass_fractions: &[(&str, f64)],
    ) -> KineticsResult<ThermoState> {
        self.inner.state(temperature, pressure, mass_fractions)
    }

    fn isolated_reactor(
        &self,
        initial: &ThermoState,
        kind: ReactorKind,
        energy: EnergyEquation,
    ) -> KineticsResult<BatchReactor> {
        let cell = initial.mass_fractions[self.mechanism().require_species("CELL")?];
        if cell > self.max_cell {
            return Err(KineticsError::NonPhysical {
                what: format!("cellulose fraction {cell} above {}", self.max_cell),
            });
        }
        self.inner.isolated_reactor(initial, kind, energy)
    }

    fn density(&self, state: &ThermoState) -> KineticsResult<f64> {
        self.inner.density(state)
    }

    fn flow_stage(
        &self,
        initial: &ThermoState,
        mass: f64,
        mass_flow: f64,
        energy: EnergyEquation,
    ) -> KineticsResult<FlowStage> {
        self.inner.flow_stage(initial, mass, mass_flow, energy)
    }
}

#[test]
fn skip_drops_only_failing_blocks() {
    let options = SensitivityOptions {
        n_samples: 8,
        failure_policy: FailurePolicy::Skip,
        ..SensitivityOptions::default()
    };
    let step = 16;
    let rows = sample_design(&problem(), &options).unwrap();
    let block_max: Vec<f64> = rows
        .chunks(step)
        .map(|block| block.iter().map(|r| r[0]).fold(f64::MIN, f64::max))
        .collect();
    let mut sorted = block_max.clone();
    sorted.sort_by(f64::total_cmp);
    // At least two blocks pass and the richest one fails.
    let max_cell = sorted[1];
    assert!(max_cell < sorted[sorted.len() - 1]);

    let engine = CelluloseLimited {
        inner: LumpedEngine::softwood().unwrap(),
        max_cell,
    };
    let run = run_sensitivity(&engine, &problem(), &batch(), &options).unwrap();

    let expected: Vec<usize> = block_max
        .iter()
        .enumerate()
        .filter(|(_, m)| **m > max_cell)
        .flat_map(|(b, _)| b * step..(b + 1) * step)
        .collect();
    assert!(!expected.is_empty());
    assert_eq!(run.skipped_rows, expected);
    assert!(run.skipped_rows.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(run.shape(), (128, 7));

    // Kept rows match an unrestricted run, in design order.
    let full = run_sensitivity(
        &LumpedEngine::softwood().unwrap(),
        &problem(),
        &batch(),
        &SensitivityOptions {
            failure_policy: FailurePolicy::FailFast,
            ..options.clone()
        },
    )
    .unwrap();
    for (row, y) in run.outputs.iter().enumerate() {
        if expected.contains(&row) {
            assert!(y.is_none(), "row {row} kept");
        } else {
            assert_eq!(*y, full.outputs[row], "row {row}");
        }
    }

    let gas: Vec<f64> = run.outputs.iter().flatten().map(|y| y[0]).collect();
    assert_eq!(gas.len(), 128 - expected.len());
    let indices = analyze(&problem(), &gas, "gas", &options.analysis).unwrap();
    assert_eq!(run.gas, indices);
}
