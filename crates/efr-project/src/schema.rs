//! Parameter file schema.

use serde::{Deserialize, Serialize};

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub info: InfoDef,
    pub feedstock: FeedstockDef,
    pub reactor: ReactorDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity_analysis: Option<SensitivityDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoDef {
    pub reactor_name: String,
    pub feedstock_name: String,
    pub case: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedstockDef {
    pub name: String,
    /// Mass % as received: C, H, O, N, S, ash, moisture.
    pub ultimate_analysis: [f64; 7],
    pub chemical_analysis: ChemicalAnalysisDef,
    pub biomass_characterization: CharacterizationDef,
}

/// Mass % on a dry basis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChemicalAnalysisDef {
    pub cellulose: f64,
    pub hemicellulose: f64,
    pub lignin_c: f64,
    pub lignin_h: f64,
    pub lignin_o: f64,
    pub tannins: f64,
    pub triglycerides: f64,
    pub ash: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CharacterizationDef {
    pub yc: f64,
    pub yh: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
    pub epsilon: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompositionDef {
    #[default]
    Chem,
    Ult,
    Ultmod,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnergyDef {
    On,
    #[default]
    Off,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchKindDef {
    #[default]
    ConstantVolume,
    ConstantPressure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactorDef {
    /// Path to a YAML mechanism; the built-in softwood scheme when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<String>,
    #[serde(default)]
    pub composition: CompositionDef,
    #[serde(default)]
    pub energy: EnergyDef,
    pub mass_flowrate_biomass_kg_per_h: f64,
    pub mass_flowrate_n2_kg_per_h: f64,
    pub n_cstrs: usize,
    pub pipe_inner_diameter_m: f64,
    pub pipe_length_m: f64,
    pub pressure_gauge_pa: f64,
    pub pressure_atm_pa: f64,
    /// Batch reactor pressure.
    pub pressure_pa: f64,
    pub temperature_k: f64,
    /// Batch reactor duration.
    pub time_duration_s: f64,
    #[serde(default)]
    pub batch_kind: BatchKindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<IntegrationDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct IntegrationDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_step_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steady_tol: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemeDef {
    #[default]
    Sobol,
    Random,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicyDef {
    #[default]
    FailFast,
    Skip,
}

fn default_skip() -> usize {
    1024
}

fn default_resamples() -> usize {
    100
}

fn default_conf_level() -> f64 {
    0.95
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensitivityDef {
    pub n_samples: usize,
    pub names: Vec<String>,
    pub bounds: Vec<[f64; 2]>,
    #[serde(default)]
    pub scheme: SchemeDef,
    /// Seeds the random scheme and the bootstrap.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_skip")]
    pub skip: usize,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub failure_policy: FailurePolicyDef,
    #[serde(default = "default_resamples")]
    pub num_resamples: usize,
    #[serde(default = "default_conf_level")]
    pub conf_level: f64,
}

impl Config {
    /// The Blend3 case 5 parameter set.
    pub fn blend3() -> Self {
        Self {
            version: default_version(),
            info: InfoDef {
                reactor_name: "Entrained Flow Reactor (EFR)".to_string(),
                feedstock_name: "Blend3".to_string(),
                case: 5,
            },
            feedstock: FeedstockDef {
                name: "Blend3".to_string(),
                ultimate_analysis: [49.52, 5.28, 38.35, 0.15, 0.02, 0.64, 6.04],
                chemical_analysis: ChemicalAnalysisDef {
                    cellulose: 38.95,
                    hemicellulose: 23.12,
                    lignin_c: 0.0,
                    lignin_h: 14.74,
                    lignin_o: 14.74,
                    tannins: 0.0,
                    triglycerides: 7.83,
                    ash: 0.63,
                },
                biomass_characterization: CharacterizationDef {
                    yc: 0.51,
                    yh: 0.06,
                    alpha: 0.56,
                    beta: 0.6,
                    gamma: 0.6,
                    delta: 0.78,
                    epsilon: 0.88,
                },
            },
            reactor: ReactorDef {
                mechanism: None,
                composition: CompositionDef::Chem,
                energy: EnergyDef::Off,
                mass_flowrate_biomass_kg_per_h: 15.0,
                mass_flowrate_n2_kg_per_h: 15.0,
                n_cstrs: 20,
                pipe_inner_diameter_m: 0.041,
                pipe_length_m: 28.7,
                pressure_gauge_pa: 60_100.0,
                pressure_atm_pa: 80_900.0,
                pressure_pa: 101_325.0,
                temperature_k: 773.15,
                time_duration_s: 10.0,
                batch_kind: BatchKindDef::ConstantVolume,
                integration: None,
            },
            sensitivity_analysis: Some(SensitivityDef {
                n_samples: 1000,
                names: ["CELL", "GMSW", "LIGC", "LIGH", "LIGO", "TANN", "TGL"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                bounds: vec![[0.01, 1.0]; 7],
                scheme: SchemeDef::Sobol,
                seed: 0,
                skip: default_skip(),
                parallel: false,
                failure_policy: FailurePolicyDef::FailFast,
                num_resamples: default_resamples(),
                conf_level: default_conf_level(),
            }),
        }
    }
}
