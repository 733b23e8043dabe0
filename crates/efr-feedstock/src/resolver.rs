//! Composition resolution strategies.

use crate::basis::{UltimateAnalysis, UltimateAnalysisBases};
use crate::characterization::{Characterization, ShapeParameters, characterize};
use crate::chemical::{ChemicalAnalysis, ChemicalAnalysisDaf};
use crate::composition::BiomassComposition;
use crate::error::FeedstockResult;

/// How the biomass composition is derived.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositionMethod {
    /// Renormalize a measured chemical analysis to a dry ash-free basis.
    Chemical(ChemicalAnalysis),
    /// Characterize from C and H of the ultimate analysis with default shape parameters.
    Ultimate,
    /// Characterize from user-supplied C, H and shape parameters.
    UltimateModified {
        yc: f64,
        yh: f64,
        shape: ShapeParameters,
    },
}

impl CompositionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            CompositionMethod::Chemical(_) => "chem",
            CompositionMethod::Ultimate => "ult",
            CompositionMethod::UltimateModified { .. } => "ultmod",
        }
    }
}

/// A resolved composition plus the intermediate data behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComposition {
    pub composition: BiomassComposition,
    pub bases: UltimateAnalysisBases,
    pub detail: ResolutionDetail,
}

/// Strategy-specific intermediate results.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionDetail {
    Chemical(ChemicalAnalysisDaf),
    Characterization(Characterization),
}

/// Resolve the composition of a feedstock with the selected strategy.
///
/// The ultimate analysis bases are always computed so a degenerate analysis
/// is reported regardless of the strategy.
pub fn resolve_composition(
    method: &CompositionMethod,
    ultimate: &UltimateAnalysis,
) -> FeedstockResult<ResolvedComposition> {
    let bases = ultimate.bases()?;

    let (composition, detail) = match method {
        CompositionMethod::Chemical(chemical) => {
            let daf = chemical.dry_ash_free()?;
            let composition = BiomassComposition::from_percentages(daf.percent)?;
            (composition, ResolutionDetail::Chemical(daf))
        }
        CompositionMethod::Ultimate => {
            let ch = characterize(bases.yc(), bases.yh(), &ShapeParameters::default())?;
            (ch.composition, ResolutionDetail::Characterization(ch))
        }
        CompositionMethod::UltimateModified { yc, yh, shape } => {
            let ch = characterize(*yc, *yh, shape)?;
            (ch.composition, ResolutionDetail::Characterization(ch))
        }
    };

    tracing::info!(
        method = method.label(),
        sum = composition.sum(),
        "biomass composition resolved"
    );

    Ok(ResolvedComposition {
        composition,
        bases,
        detail,
    })
}
