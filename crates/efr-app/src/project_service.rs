//! Parameter file loading and feedstock resolution.

use std::path::Path;

use efr_feedstock::{
    ChemicalAnalysis, CompositionMethod, ResolvedComposition, ShapeParameters, UltimateAnalysis,
    resolve_composition,
};
use efr_project::schema::{CompositionDef, Config};

use crate::error::AppResult;

/// Load and validate a parameter file (YAML or JSON).
pub fn load_config(path: &Path) -> AppResult<Config> {
    let config = efr_project::load(path)?;
    tracing::debug!(path = %path.display(), "parameter file loaded");
    Ok(config)
}

/// Composition strategy for the config; `choice` overrides the file's setting.
pub fn composition_method(config: &Config, choice: Option<CompositionDef>) -> CompositionMethod {
    let feedstock = &config.feedstock;
    match choice.unwrap_or(config.reactor.composition) {
        CompositionDef::Chem => {
            let ca = feedstock.chemical_analysis;
            CompositionMethod::Chemical(ChemicalAnalysis {
                cellulose: ca.cellulose,
                hemicellulose: ca.hemicellulose,
                lignin_c: ca.lignin_c,
                lignin_h: ca.lignin_h,
                lignin_o: ca.lignin_o,
                tannins: ca.tannins,
                triglycerides: ca.triglycerides,
                ash: ca.ash,
            })
        }
        CompositionDef::Ult => CompositionMethod::Ultimate,
        CompositionDef::Ultmod => {
            let bc = feedstock.biomass_characterization;
            CompositionMethod::UltimateModified {
                yc: bc.yc,
                yh: bc.yh,
                shape: ShapeParameters {
                    alpha: bc.alpha,
                    beta: bc.beta,
                    gamma: bc.gamma,
                    delta: bc.delta,
                    epsilon: bc.epsilon,
                },
            }
        }
    }
}

pub fn ultimate_analysis(config: &Config) -> UltimateAnalysis {
    UltimateAnalysis::new(config.feedstock.ultimate_analysis)
}

/// Resolve the biomass composition of the configured feedstock.
pub fn resolve_feedstock(config: &Config, method: &CompositionMethod) -> AppResult<ResolvedComposition> {
    Ok(resolve_composition(method, &ultimate_analysis(config))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_setting_used_without_override() {
        let config = Config::blend3();
        let method = composition_method(&config, None);
        assert_eq!(method.label(), "chem");
    }

    #[test]
    fn override_wins() {
        let config = Config::blend3();
        let method = composition_method(&config, Some(CompositionDef::Ultmod));
        match method {
            CompositionMethod::UltimateModified { yc, shape, .. } => {
                assert_eq!(yc, 0.51);
                assert_eq!(shape.delta, 0.78);
            }
            other => panic!("unexpected method {other:?}"),
        }
    }

    #[test]
    fn blend3_resolves_with_every_strategy() {
        let config = Config::blend3();
        for choice in [CompositionDef::Chem, CompositionDef::Ult, CompositionDef::Ultmod] {
            let method = composition_method(&config, Some(choice));
            let resolved = resolve_feedstock(&config, &method).unwrap();
            assert!((resolved.composition.sum() - 1.0).abs() < 1e-6);
        }
    }
}
