//! Parameter file validation.

use crate::schema::{Config, FeedstockDef, IntegrationDef, ReactorDef, SensitivityDef};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Length mismatch: {context} has {got} entries, expected {expected}")]
    LengthMismatch {
        context: String,
        expected: usize,
        got: usize,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl std::fmt::Display, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive and finite"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative and finite"))
    }
}

pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }
    validate_feedstock(&config.feedstock)?;
    validate_reactor(&config.reactor)?;
    if let Some(sa) = &config.sensitivity_analysis {
        validate_sensitivity(sa)?;
    }
    Ok(())
}

fn validate_feedstock(feedstock: &FeedstockDef) -> Result<(), ValidationError> {
    for (label, v) in ["C", "H", "O", "N", "S", "ash", "moisture"]
        .iter()
        .zip(feedstock.ultimate_analysis)
    {
        non_negative(&format!("feedstock.ultimate_analysis.{label}"), v)?;
    }

    let ca = &feedstock.chemical_analysis;
    let chemical = [
        ("cellulose", ca.cellulose),
        ("hemicellulose", ca.hemicellulose),
        ("lignin_c", ca.lignin_c),
        ("lignin_h", ca.lignin_h),
        ("lignin_o", ca.lignin_o),
        ("tannins", ca.tannins),
        ("triglycerides", ca.triglycerides),
        ("ash", ca.ash),
    ];
    for (label, v) in chemical {
        non_negative(&format!("feedstock.chemical_analysis.{label}"), v)?;
    }

    let bc = &feedstock.biomass_characterization;
    positive("feedstock.biomass_characterization.yc", bc.yc)?;
    positive("feedstock.biomass_characterization.yh", bc.yh)?;
    if bc.yc + bc.yh >= 1.0 {
        return Err(invalid(
            "feedstock.biomass_characterization.yc + yh",
            bc.yc + bc.yh,
            "must be below 1",
        ));
    }
    let shape = [
        ("alpha", bc.alpha),
        ("beta", bc.beta),
        ("gamma", bc.gamma),
        ("delta", bc.delta),
        ("epsilon", bc.epsilon),
    ];
    for (label, v) in shape {
        if !(v.is_finite() && (0.0..=1.0).contains(&v)) {
            return Err(invalid(
                &format!("feedstock.biomass_characterization.{label}"),
                v,
                "must lie in [0, 1]",
            ));
        }
    }
    Ok(())
}

fn validate_reactor(reactor: &ReactorDef) -> Result<(), ValidationError> {
    if let Some(path) = &reactor.mechanism {
        if path.trim().is_empty() {
            return Err(invalid("reactor.mechanism", "\"\"", "must name a file"));
        }
    }
    positive(
        "reactor.mass_flowrate_biomass_kg_per_h",
        reactor.mass_flowrate_biomass_kg_per_h,
    )?;
    non_negative(
        "reactor.mass_flowrate_n2_kg_per_h",
        reactor.mass_flowrate_n2_kg_per_h,
    )?;
    if reactor.n_cstrs == 0 {
        return Err(invalid("reactor.n_cstrs", 0, "must be at least 1"));
    }
    positive("reactor.pipe_inner_diameter_m", reactor.pipe_inner_diameter_m)?;
    positive("reactor.pipe_length_m", reactor.pipe_length_m)?;
    non_negative("reactor.pressure_gauge_pa", reactor.pressure_gauge_pa)?;
    non_negative("reactor.pressure_atm_pa", reactor.pressure_atm_pa)?;
    positive(
        "reactor.pressure_gauge_pa + pressure_atm_pa",
        reactor.pressure_gauge_pa + reactor.pressure_atm_pa,
    )?;
    positive("reactor.pressure_pa", reactor.pressure_pa)?;
    positive("reactor.temperature_k", reactor.temperature_k)?;
    positive("reactor.time_duration_s", reactor.time_duration_s)?;
    if let Some(integration) = &reactor.integration {
        validate_integration(integration)?;
    }
    Ok(())
}

fn validate_integration(integration: &IntegrationDef) -> Result<(), ValidationError> {
    if let Some(v) = integration.max_step_s {
        positive("reactor.integration.max_step_s", v)?;
    }
    if integration.max_steps == Some(0) {
        return Err(invalid("reactor.integration.max_steps", 0, "must be at least 1"));
    }
    if let Some(v) = integration.steady_tol {
        positive("reactor.integration.steady_tol", v)?;
    }
    Ok(())
}

fn validate_sensitivity(sa: &SensitivityDef) -> Result<(), ValidationError> {
    if sa.n_samples == 0 {
        return Err(invalid("sensitivity_analysis.n_samples", 0, "must be at least 1"));
    }
    if sa.names.is_empty() {
        return Err(invalid("sensitivity_analysis.names", "[]", "must not be empty"));
    }
    if sa.bounds.len() != sa.names.len() {
        return Err(ValidationError::LengthMismatch {
            context: "sensitivity_analysis.bounds".to_string(),
            expected: sa.names.len(),
            got: sa.bounds.len(),
        });
    }

    let mut seen = HashSet::new();
    for name in &sa.names {
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateName {
                name: name.clone(),
                context: "sensitivity_analysis.names".to_string(),
            });
        }
    }

    for (name, [lo, hi]) in sa.names.iter().zip(&sa.bounds) {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(invalid(
                &format!("sensitivity_analysis.bounds.{name}"),
                format!("[{lo}, {hi}]"),
                "lower bound must be below upper bound",
            ));
        }
    }

    if sa.num_resamples == 0 {
        return Err(invalid(
            "sensitivity_analysis.num_resamples",
            0,
            "must be at least 1",
        ));
    }
    if !(sa.conf_level > 0.0 && sa.conf_level < 1.0) {
        return Err(invalid(
            "sensitivity_analysis.conf_level",
            sa.conf_level,
            "must lie in (0, 1)",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend3_is_valid() {
        validate_config(&Config::blend3()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut config = Config::blend3();
        config.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_zero_stages() {
        let mut config = Config::blend3();
        config.reactor.n_cstrs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("n_cstrs"));
    }

    #[test]
    fn rejects_negative_chemical_analysis() {
        let mut config = Config::blend3();
        config.feedstock.chemical_analysis.tannins = -1.0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("tannins"));
    }

    #[test]
    fn rejects_shape_out_of_range() {
        let mut config = Config::blend3();
        config.feedstock.biomass_characterization.delta = 1.2;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_bounds_length_mismatch() {
        let mut config = Config::blend3();
        if let Some(sa) = config.sensitivity_analysis.as_mut() {
            sa.bounds.pop();
        }
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::LengthMismatch { expected: 7, got: 6, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut config = Config::blend3();
        if let Some(sa) = config.sensitivity_analysis.as_mut() {
            sa.names[1] = "CELL".to_string();
        }
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::DuplicateName { .. })
        ));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut config = Config::blend3();
        if let Some(sa) = config.sensitivity_analysis.as_mut() {
            sa.bounds[0] = [0.5, 0.5];
        }
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_step_budget() {
        let mut config = Config::blend3();
        config.reactor.integration = Some(IntegrationDef {
            max_steps: Some(0),
            ..IntegrationDef::default()
        });
        assert!(validate_config(&config).is_err());
    }
}
