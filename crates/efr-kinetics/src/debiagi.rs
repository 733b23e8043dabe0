//! Built-in reduced softwood pyrolysis scheme.
//!
//! A lumped, first-order version of the Ranzi/Debiagi biomass scheme: the
//! seven biomass components decompose through intermediate solids into char,
//! tars, permanent gases and trapped gases ("metaplastics", the `G*` species)
//! which are released slowly. Product distributions are given as mass yields.
//! The carrier gas `N2` is inert.
//!
//! No reaction turns a gas, liquid or metaplastic back into a solid.

use crate::error::KineticsResult;
use crate::mechanism::{Mechanism, MechanismDef, ReactionDef, SpeciesDef};
use std::collections::BTreeMap;

const KCAL: f64 = 4184.0;

const CP_GAS: f64 = 1200.0;
const CP_LIQUID: f64 = 1800.0;
const CP_SOLID: f64 = 1500.0;

/// Light species whose heat capacity differs strongly from their group.
const CP_OVERRIDES: [(&str, f64); 4] = [
    ("H2", 14300.0),
    ("GH2", 14300.0),
    ("CH4", 2230.0),
    ("GCH4", 2230.0),
];

/// Permanent gases, including the inert carrier.
const GASES: [(&str, f64); 8] = [
    ("C2H4", 28.054),
    ("C2H6", 30.070),
    ("CH2O", 30.026),
    ("CH4", 16.043),
    ("CO", 28.010),
    ("CO2", 44.010),
    ("H2", 2.016),
    ("N2", 28.014),
];

/// Condensable species (tars and water).
const LIQUIDS: [(&str, f64); 23] = [
    ("C2H3CHO", 56.064),
    ("C2H5CHO", 58.080),
    ("C2H5OH", 46.069),
    ("C5H8O4", 132.116),
    ("C6H10O5", 162.141),
    ("C6H5OCH3", 108.140),
    ("C6H5OH", 94.113),
    ("C6H6O3", 126.110),
    ("C24H28O4", 380.480),
    ("CH2OHCH2CHO", 74.079),
    ("CH2OHCHO", 60.052),
    ("CH3CHO", 44.053),
    ("CH3CO2H", 60.052),
    ("CH3OH", 32.042),
    ("CHOCHO", 58.036),
    ("CRESOL", 108.140),
    ("FURFURAL", 96.085),
    ("H2O", 18.015),
    ("HCOOH", 46.025),
    ("MLINO", 294.470),
    ("U2ME12", 210.310),
    ("VANILLIN", 152.150),
    ("ACQUA", 18.015),
];

/// Biomass components, intermediate solids and char.
const SOLIDS: [(&str, f64); 15] = [
    ("CELL", 162.141),
    ("CELLA", 162.141),
    ("GMSW", 132.116),
    ("HCE1", 132.116),
    ("HCE2", 132.116),
    ("ITANN", 164.116),
    ("LIG", 208.210),
    ("LIGC", 258.270),
    ("LIGCC", 258.270),
    ("LIGH", 436.450),
    ("LIGO", 422.380),
    ("LIGOH", 378.370),
    ("TANN", 304.250),
    ("TGL", 873.400),
    ("CHAR", 12.011),
];

/// Trapped gases in the solid matrix.
const METAPLASTICS: [(&str, f64); 10] = [
    ("GCH2O", 30.026),
    ("GCO2", 44.010),
    ("GCO", 28.010),
    ("GCH3OH", 32.042),
    ("GCH4", 16.043),
    ("GC2H4", 28.054),
    ("GC6H5OH", 94.113),
    ("GCOH2", 30.026),
    ("GH2", 2.016),
    ("GC2H6", 30.070),
];

fn rxn(reactant: &str, products: &[(&str, f64)], a: f64, b: f64, ea_kcal: f64, dh: f64) -> ReactionDef {
    ReactionDef {
        reactant: reactant.to_string(),
        products: products
            .iter()
            .map(|(name, y)| (name.to_string(), *y))
            .collect::<BTreeMap<_, _>>(),
        a,
        b,
        ea: ea_kcal * KCAL,
        dh,
    }
}

/// Mechanism definition of the built-in scheme.
pub fn debiagi_softwood_def() -> MechanismDef {
    let mut species = Vec::new();
    for (group, cp) in [
        (&GASES[..], CP_GAS),
        (&LIQUIDS[..], CP_LIQUID),
        (&SOLIDS[..], CP_SOLID),
        (&METAPLASTICS[..], CP_SOLID),
    ] {
        species.extend(group.iter().map(|(name, mw)| SpeciesDef {
            name: name.to_string(),
            molar_mass: *mw,
            cp: CP_OVERRIDES
                .iter()
                .find(|(n, _)| n == name)
                .map_or(cp, |(_, c)| *c),
        }));
    }

    // Primary decomposition steps absorb heat [J/kg].
    let primary = 2.0e5;

    let reactions = vec![
        // cellulose
        rxn("CELL", &[("CELLA", 1.0)], 1.5e14, 0.0, 47.0, primary),
        rxn(
            "CELLA",
            &[
                ("CH2OHCHO", 0.20),
                ("CHOCHO", 0.02),
                ("CH3CHO", 0.06),
                ("C6H6O3", 0.20),
                ("C2H5CHO", 0.05),
                ("CH2OHCH2CHO", 0.02),
                ("CH3OH", 0.03),
                ("CH2O", 0.04),
                ("CO", 0.06),
                ("GCO", 0.01),
                ("CO2", 0.07),
                ("H2", 0.002),
                ("H2O", 0.10),
                ("GCOH2", 0.01),
                ("CHAR", 0.118),
            ],
            2.5e6,
            0.0,
            19.1,
            0.0,
        ),
        rxn("CELLA", &[("C6H10O5", 1.0)], 3.3, 1.0, 10.0, 0.0),
        rxn("CELL", &[("H2O", 0.555), ("CHAR", 0.445)], 6.0e7, 0.0, 31.0, -primary),
        // hemicellulose
        rxn("GMSW", &[("HCE1", 0.70), ("HCE2", 0.30)], 1.0e10, 0.0, 31.0, primary),
        rxn(
            "HCE1",
            &[
                ("H2O", 0.10),
                ("CO2", 0.15),
                ("CO", 0.05),
                ("CH2O", 0.05),
                ("GCO2", 0.05),
                ("GCOH2", 0.05),
                ("C5H8O4", 0.20),
                ("CH3CO2H", 0.08),
                ("HCOOH", 0.05),
                ("GH2", 0.02),
                ("CHAR", 0.20),
            ],
            1.2e9,
            0.0,
            30.0,
            0.0,
        ),
        rxn("HCE1", &[("C5H8O4", 1.0)], 0.15, 1.0, 8.0, 0.0),
        rxn(
            "HCE2",
            &[
                ("CO2", 0.20),
                ("GCOH2", 0.10),
                ("GCO", 0.08),
                ("CH2O", 0.06),
                ("CH3CO2H", 0.10),
                ("GCH4", 0.03),
                ("C2H5OH", 0.06),
                ("FURFURAL", 0.04),
                ("H2O", 0.10),
                ("CHAR", 0.23),
            ],
            5.0e9,
            0.0,
            33.0,
            0.0,
        ),
        // lignins
        rxn(
            "LIGC",
            &[
                ("LIGCC", 0.45),
                ("C6H5OH", 0.08),
                ("C2H4", 0.03),
                ("GCO", 0.06),
                ("GCOH2", 0.10),
                ("GCH4", 0.04),
                ("H2O", 0.04),
                ("CHAR", 0.20),
            ],
            1.33e15,
            0.0,
            48.5,
            primary,
        ),
        rxn(
            "LIGH",
            &[
                ("LIGOH", 0.55),
                ("C2H5CHO", 0.08),
                ("GCO", 0.04),
                ("GCOH2", 0.08),
                ("GCH4", 0.03),
                ("GC2H6", 0.02),
                ("H2O", 0.04),
                ("CHAR", 0.16),
            ],
            6.7e12,
            0.0,
            37.5,
            primary,
        ),
        rxn(
            "LIGO",
            &[
                ("LIGOH", 0.60),
                ("CO2", 0.10),
                ("GCO", 0.05),
                ("GCOH2", 0.05),
                ("H2O", 0.04),
                ("CHAR", 0.16),
            ],
            3.3e8,
            0.0,
            25.5,
            primary,
        ),
        rxn(
            "LIGCC",
            &[
                ("CRESOL", 0.10),
                ("C6H5OH", 0.08),
                ("GCH4", 0.05),
                ("GC2H4", 0.05),
                ("GCOH2", 0.12),
                ("GCO", 0.06),
                ("H2O", 0.04),
                ("CHAR", 0.50),
            ],
            1.67e6,
            0.0,
            31.5,
            0.0,
        ),
        rxn(
            "LIGOH",
            &[
                ("LIG", 0.45),
                ("H2O", 0.05),
                ("CH3OH", 0.06),
                ("GCH3OH", 0.02),
                ("GCO", 0.08),
                ("GCOH2", 0.08),
                ("GCH4", 0.05),
                ("CO2", 0.04),
                ("CHAR", 0.17),
            ],
            1.0e8,
            0.0,
            30.0,
            0.0,
        ),
        rxn(
            "LIG",
            &[
                ("VANILLIN", 0.25),
                ("C24H28O4", 0.15),
                ("C6H5OCH3", 0.05),
                ("CH3CHO", 0.05),
                ("GC6H5OH", 0.02),
                ("GCO", 0.08),
                ("GCOH2", 0.06),
                ("GCH4", 0.04),
                ("CHAR", 0.30),
            ],
            4.0e8,
            0.0,
            30.0,
            0.0,
        ),
        // extractives
        rxn(
            "TANN",
            &[("C6H5OH", 0.30), ("ITANN", 0.55), ("GCO", 0.05), ("H2O", 0.10)],
            20.0,
            0.0,
            10.0,
            primary,
        ),
        rxn(
            "ITANN",
            &[
                ("CHAR", 0.55),
                ("GCO", 0.15),
                ("GCH2O", 0.05),
                ("GCOH2", 0.05),
                ("H2O", 0.15),
                ("CO", 0.05),
            ],
            1.0e3,
            0.0,
            25.0,
            0.0,
        ),
        rxn(
            "TGL",
            &[("C2H3CHO", 0.065), ("MLINO", 0.82), ("U2ME12", 0.115)],
            7.0e12,
            0.0,
            45.7,
            primary,
        ),
        // moisture
        rxn("ACQUA", &[("H2O", 1.0)], 1.0, 1.0, 8.0, 0.0),
        // metaplastic release
        rxn("GCO2", &[("CO2", 1.0)], 1.0e6, 0.0, 24.5, 0.0),
        rxn("GCO", &[("CO", 1.0)], 5.0e12, 0.0, 52.5, 0.0),
        rxn("GCOH2", &[("CO", 0.933), ("H2", 0.067)], 5.0e11, 0.0, 71.0, 0.0),
        rxn("GCH4", &[("CH4", 1.0)], 5.0e12, 0.0, 71.7, 0.0),
        rxn("GCH3OH", &[("CH3OH", 1.0)], 2.0e12, 0.0, 50.0, 0.0),
        rxn("GC2H4", &[("C2H4", 1.0)], 5.0e12, 0.0, 71.7, 0.0),
        rxn("GC2H6", &[("C2H6", 1.0)], 5.0e12, 0.0, 71.7, 0.0),
        rxn("GC6H5OH", &[("C6H5OH", 1.0)], 1.5e12, 0.0, 48.5, 0.0),
        rxn("GH2", &[("H2", 1.0)], 5.0e11, 0.0, 75.0, 0.0),
        rxn("GCH2O", &[("CH2O", 1.0)], 5.0e11, 0.0, 71.0, 0.0),
    ];

    MechanismDef {
        name: "debiagi-softwood-reduced".to_string(),
        species,
        reactions,
    }
}

impl Mechanism {
    /// The built-in reduced softwood scheme.
    pub fn debiagi_softwood() -> KineticsResult<Self> {
        Mechanism::from_def(debiagi_softwood_def())
    }
}

/// Species names of each phase in the built-in scheme.
pub mod phases {
    use super::{GASES, LIQUIDS, METAPLASTICS, SOLIDS};

    /// Permanent gases without the carrier gas.
    pub fn gases() -> Vec<&'static str> {
        GASES
            .iter()
            .map(|(n, _)| *n)
            .filter(|n| *n != CARRIER)
            .collect()
    }

    pub fn liquids() -> Vec<&'static str> {
        LIQUIDS.iter().map(|(n, _)| *n).collect()
    }

    pub fn solids() -> Vec<&'static str> {
        SOLIDS.iter().map(|(n, _)| *n).collect()
    }

    pub fn metaplastics() -> Vec<&'static str> {
        METAPLASTICS.iter().map(|(n, _)| *n).collect()
    }

    /// Inert carrier gas of entrained-flow runs.
    pub const CARRIER: &str = "N2";
}
