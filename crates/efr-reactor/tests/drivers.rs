//! End-to-end batch and entrained-flow runs on the built-in engine.

use efr_core::units::{k, kgph, m, pa, s};
use efr_core::{Tolerances, nearly_equal};
use efr_feedstock::{BiomassComposition, ChemicalAnalysis};
use efr_kinetics::{
    EnergyEquation, IntegrationOptions, KineticsEngine, KineticsError, LumpedEngine, ReactorKind,
};
use efr_reactor::{
    BatchParams, EfrParams, PhaseSpecies, ReactorError, batch_final_yields, run_batch, run_efr,
};

fn blend3() -> BiomassComposition {
    let chemical = ChemicalAnalysis {
        cellulose: 39.19,
        hemicellulose: 23.26,
        lignin_c: 0.0,
        lignin_h: 14.83,
        lignin_o: 14.83,
        tannins: 0.0,
        triglycerides: 7.26,
        ash: 0.63,
    };
    let daf = chemical.dry_ash_free().unwrap();
    BiomassComposition::from_percentages(daf.percent).unwrap()
}

fn batch_params(energy: EnergyEquation) -> BatchParams {
    BatchParams {
        temperature: k(773.15),
        pressure: pa(101_325.0),
        duration: s(10.0),
        energy,
        kind: ReactorKind::ConstantVolume,
    }
}

fn efr_params(n_stages: usize) -> EfrParams {
    EfrParams {
        pipe_diameter: m(0.0254 * 2.0),
        pipe_length: m(4.5),
        temperature: k(773.15),
        gauge_pressure: pa(18_618.0),
        atmospheric_pressure: pa(81_343.0),
        biomass_flow: kgph(2.0),
        carrier_flow: kgph(0.5),
        n_stages,
        energy: EnergyEquation::Off,
    }
}

#[test]
fn batch_solids_never_increase_with_energy_off() {
    let engine = LumpedEngine::softwood().unwrap();
    let run = run_batch(&engine, &blend3(), &batch_params(EnergyEquation::Off)).unwrap();

    assert_eq!(run.times().len(), 100);
    assert_eq!(run.yields.len(), 100);
    assert_eq!(run.times()[99], 10.0);
    assert!(
        run.yields.solid.windows(2).all(|w| w[1] <= w[0] + 1e-12),
        "solid fraction increased"
    );
    run.yields.check_closure(Tolerances::CLOSURE).unwrap();

    let first = run.yields.point(0).unwrap();
    assert!(nearly_equal(first.solid, 1.0, Tolerances::CLOSURE));
    assert!(run.final_yields.solid < first.solid);
    assert!(run.final_yields.gas > 0.0 && run.final_yields.liquid > 0.0);
    assert_eq!(run.final_species.len(), 4);
}

#[test]
fn final_yields_match_full_run() {
    let engine = LumpedEngine::softwood().unwrap();
    let params = batch_params(EnergyEquation::Off);
    let index = PhaseSpecies::softwood().resolve(engine.mechanism()).unwrap();
    let light = batch_final_yields(&engine, &blend3(), &params, &index).unwrap();
    let full = run_batch(&engine, &blend3(), &params).unwrap();
    assert_eq!(light, full.final_yields);
}

#[test]
fn batch_rejects_open_composition() {
    let engine = LumpedEngine::softwood().unwrap();
    let mut comp = blend3();
    comp.cellulose += 0.1;
    let err = run_batch(&engine, &comp, &batch_params(EnergyEquation::Off)).unwrap_err();
    assert!(matches!(err, ReactorError::Feedstock(_)));
}

#[test]
fn stages_chain_outlet_to_inlet() {
    let engine = LumpedEngine::softwood().unwrap();
    let params = efr_params(5);
    let run = run_efr(&engine, &blend3(), &params).unwrap();

    assert_eq!(run.series.len(), params.n_stages + 1);
    assert_eq!(run.stages.len(), params.n_stages);
    assert_eq!(run.positions().len(), params.n_stages + 1);
    assert_eq!(run.stages[0].inlet, run.series.states[0]);
    for k in 1..run.stages.len() {
        assert_eq!(run.stages[k].inlet, run.stages[k - 1].outlet);
    }
    for (k, stage) in run.stages.iter().enumerate() {
        assert_eq!(stage.stage, k + 1);
        assert_eq!(&stage.outlet, &run.series.states[k + 1]);
    }

    run.yields.check_closure(Tolerances::CLOSURE).unwrap();
    run.yields_carrier_free
        .check_closure(Tolerances::CLOSURE)
        .unwrap();
    assert!((run.carrier_fraction - 0.2).abs() < 1e-12);

    // Inlet: carrier is the only gas, the rest is biomass solid.
    let inlet = run.yields.point(0).unwrap();
    assert!((inlet.gas - 0.2).abs() < 1e-9);
    assert!((inlet.solid - 0.8).abs() < 1e-9);

    let c = run.comparison;
    assert!((c.reference.sum() - 96.0).abs() < 1e-12);
    assert!((c.sum - 100.0).abs() < 1e-6);
    assert!(c.char < 100.0);
}

#[test]
fn invalid_efr_parameters_fail_before_running() {
    let engine = LumpedEngine::softwood().unwrap();
    let mut params = efr_params(5);
    params.n_stages = 0;
    assert!(matches!(
        run_efr(&engine, &blend3(), &params),
        Err(ReactorError::InvalidArg { .. })
    ));
}

#[test]
fn every_stage_holds_the_feed_mass() {
    let engine = LumpedEngine::softwood().unwrap();
    let params = efr_params(20);
    let run = run_efr(&engine, &blend3(), &params).unwrap();

    let feed = &run.series.states[0];
    let tau = engine.density(feed).unwrap() * params.stage_volume_m3() / params.total_flow_kgps();
    for stage in &run.stages {
        assert!(
            (stage.residence_time - tau).abs() <= 1e-12 * tau,
            "stage {} tau {} != {tau}",
            stage.stage,
            stage.residence_time
        );
    }
}

#[test]
fn unconverged_stage_aborts_the_run() {
    let options = IntegrationOptions {
        max_steps: 1,
        ..IntegrationOptions::default()
    };
    let engine = LumpedEngine::softwood().unwrap().with_options(options).unwrap();
    let err = run_efr(&engine, &blend3(), &efr_params(5)).unwrap_err();
    assert!(err.is_convergence_failure());
    match err {
        ReactorError::Stage { stage, source } => {
            assert_eq!(stage, 1);
            assert!(matches!(source, KineticsError::ConvergenceFailed { .. }));
        }
        other => panic!("expected a stage failure, got {other:?}"),
    }
}
