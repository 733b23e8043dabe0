//! Conversion of parameter file sections into typed run parameters.

use std::path::Path;

use efr_core::units::{k, kgph, m, pa, s};
use efr_kinetics::{EnergyEquation, IntegrationOptions, LumpedEngine, Mechanism, ReactorKind};
use efr_project::schema::{
    BatchKindDef, Config, EnergyDef, FailurePolicyDef, ReactorDef, SchemeDef, SensitivityDef,
};
use efr_reactor::{BatchParams, EfrParams};
use efr_sensitivity::{AnalysisOptions, FailurePolicy, Problem, SamplingScheme, SensitivityOptions};

use crate::error::{AppError, AppResult};

pub fn energy_equation(energy: EnergyDef) -> EnergyEquation {
    match energy {
        EnergyDef::On => EnergyEquation::On,
        EnergyDef::Off => EnergyEquation::Off,
    }
}

pub fn batch_params(reactor: &ReactorDef) -> BatchParams {
    BatchParams {
        temperature: k(reactor.temperature_k),
        pressure: pa(reactor.pressure_pa),
        duration: s(reactor.time_duration_s),
        energy: energy_equation(reactor.energy),
        kind: match reactor.batch_kind {
            BatchKindDef::ConstantVolume => ReactorKind::ConstantVolume,
            BatchKindDef::ConstantPressure => ReactorKind::ConstantPressure,
        },
    }
}

pub fn efr_params(reactor: &ReactorDef) -> EfrParams {
    EfrParams {
        pipe_diameter: m(reactor.pipe_inner_diameter_m),
        pipe_length: m(reactor.pipe_length_m),
        temperature: k(reactor.temperature_k),
        gauge_pressure: pa(reactor.pressure_gauge_pa),
        atmospheric_pressure: pa(reactor.pressure_atm_pa),
        biomass_flow: kgph(reactor.mass_flowrate_biomass_kg_per_h),
        carrier_flow: kgph(reactor.mass_flowrate_n2_kg_per_h),
        n_stages: reactor.n_cstrs,
        energy: energy_equation(reactor.energy),
    }
}

pub fn integration_options(reactor: &ReactorDef) -> IntegrationOptions {
    let mut options = IntegrationOptions::default();
    if let Some(integration) = &reactor.integration {
        if let Some(v) = integration.max_step_s {
            options.max_step = v;
        }
        if let Some(v) = integration.max_steps {
            options.max_steps = v;
        }
        if let Some(v) = integration.steady_tol {
            options.steady_tol = v;
        }
    }
    options
}

/// Build the kinetics engine for a config.
///
/// `mechanism` overrides the file's mechanism reference. Relative paths in the
/// file are taken from `base_dir`.
pub fn build_engine(
    config: &Config,
    base_dir: Option<&Path>,
    mechanism: Option<&Path>,
) -> AppResult<LumpedEngine> {
    let from_file = config.reactor.mechanism.as_deref().map(|p| match base_dir {
        Some(dir) => dir.join(p),
        None => Path::new(p).to_path_buf(),
    });
    let path = mechanism.map(Path::to_path_buf).or(from_file);

    let mechanism = match path {
        Some(path) => Mechanism::load_yaml(&path).map_err(|source| AppError::Mechanism {
            path: path.clone(),
            source,
        })?,
        None => Mechanism::debiagi_softwood()?,
    };
    tracing::debug!(
        mechanism = mechanism.name(),
        species = mechanism.n_species(),
        reactions = mechanism.reactions().len(),
        "kinetics mechanism ready"
    );

    Ok(LumpedEngine::new(mechanism).with_options(integration_options(&config.reactor))?)
}

pub fn problem(sa: &SensitivityDef) -> AppResult<Problem> {
    Ok(Problem::new(sa.names.clone(), sa.bounds.clone())?)
}

pub fn sensitivity_options(sa: &SensitivityDef) -> SensitivityOptions {
    SensitivityOptions {
        n_samples: sa.n_samples,
        scheme: match sa.scheme {
            SchemeDef::Sobol => SamplingScheme::Sobol,
            SchemeDef::Random => SamplingScheme::Random { seed: sa.seed },
        },
        skip: sa.skip,
        parallel: sa.parallel,
        failure_policy: match sa.failure_policy {
            FailurePolicyDef::FailFast => FailurePolicy::FailFast,
            FailurePolicyDef::Skip => FailurePolicy::Skip,
        },
        analysis: AnalysisOptions {
            num_resamples: sa.num_resamples,
            conf_level: sa.conf_level,
            seed: sa.seed,
        },
    }
}

pub fn sensitivity_section(config: &Config) -> AppResult<&SensitivityDef> {
    config
        .sensitivity_analysis
        .as_ref()
        .ok_or(AppError::MissingSection("sensitivity_analysis"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use efr_project::schema::IntegrationDef;

    #[test]
    fn blend3_efr_geometry() {
        let config = Config::blend3();
        let params = efr_params(&config.reactor);
        params.validate().unwrap();
        assert_eq!(params.n_stages, 20);
        assert!((params.absolute_pressure_pa() - 141_000.0).abs() < 1e-6);
        assert!((params.carrier_fraction() - 0.5).abs() < 1e-12);
        assert!((params.biomass_flow_kgps() - 15.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn blend3_batch() {
        let config = Config::blend3();
        let params = batch_params(&config.reactor);
        params.validate().unwrap();
        assert_eq!(params.energy, EnergyEquation::Off);
        assert_eq!(params.kind, ReactorKind::ConstantVolume);
        assert!((params.temperature_k() - 773.15).abs() < 1e-9);
    }

    #[test]
    fn integration_overrides_apply() {
        let mut config = Config::blend3();
        config.reactor.integration = Some(IntegrationDef {
            max_step_s: None,
            max_steps: Some(42),
            steady_tol: None,
        });
        let options = integration_options(&config.reactor);
        assert_eq!(options.max_steps, 42);
        assert_eq!(options.max_step, IntegrationOptions::default().max_step);
    }

    #[test]
    fn random_scheme_carries_seed() {
        let mut config = Config::blend3();
        let sa = config.sensitivity_analysis.as_mut().unwrap();
        sa.scheme = SchemeDef::Random;
        sa.seed = 7;
        let options = sensitivity_options(sa);
        assert_eq!(options.scheme, SamplingScheme::Random { seed: 7 });
        assert_eq!(options.analysis.seed, 7);
    }

    #[test]
    fn missing_mechanism_file_reports_path() {
        let mut config = Config::blend3();
        config.reactor.mechanism = Some("no_such_mechanism.yaml".to_string());
        let err = build_engine(&config, Some(Path::new("/nonexistent")), None).unwrap_err();
        assert!(matches!(err, AppError::Mechanism { .. }));
        assert!(err.to_string().contains("no_such_mechanism.yaml"));
    }

    #[test]
    fn missing_section_is_reported() {
        let mut config = Config::blend3();
        config.sensitivity_analysis = None;
        assert!(matches!(
            sensitivity_section(&config),
            Err(AppError::MissingSection("sensitivity_analysis"))
        ));
    }
}
