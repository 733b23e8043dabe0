//! Human-readable run summaries.
//!
//! Every builder returns the text; the caller decides where it goes.

use std::fmt::{self, Write};

use efr_core::timing::Elapsed;
use efr_core::units::constants::CELSIUS_OFFSET;
use efr_feedstock::{
    BiomassComponent, Characterization, ChemicalAnalysisDaf, ResolutionDetail, ResolvedComposition,
    UltimateAnalysisBases,
};
use efr_project::schema::Config;
use efr_reactor::{BatchParams, BatchRun, EfrParams, EfrRun, PhasePoint};
use efr_sensitivity::{SensitivityRun, SobolIndices, rows_per_sample};

const WIDTH: usize = 80;

pub type ReportResult = Result<String, fmt::Error>;

/// `title` centered in a rule of dashes.
pub fn banner(title: &str) -> String {
    let title = format!(" {title} ");
    format!("{title:-^WIDTH$}")
}

/// Integer part grouped by thousands, e.g. `101,325`.
fn grouped(value: f64) -> String {
    if !value.is_finite() || value.fract() != 0.0 {
        return value.to_string();
    }
    let digits = format!("{}", value.abs() as u64);
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

fn grouped_count(n: usize) -> String {
    grouped(n as f64)
}

pub fn general_info(config: &Config) -> String {
    format!(
        "\n{}\n\nreactor   = {}\nfeedstock = {}\ncase      = {}\n",
        banner("General information"),
        config.info.reactor_name,
        config.info.feedstock_name,
        config.info.case
    )
}

pub fn ultimate_table(bases: &UltimateAnalysisBases) -> ReportResult {
    let (ar, dry, daf, cho) = (bases.ar(), bases.dry(), bases.daf(), bases.dafcho());
    let (s_ar, s_dry, s_daf, s_cho) = bases.sums();

    let mut out = format!("{}\n\n", banner("Ultimate analysis"));
    out.push_str("             % ar    % dry    % daf    % daf\n");
    for (i, label) in ["C", "H", "O"].iter().enumerate() {
        writeln!(
            out,
            "{label:<8} {:8} {:8.2} {:8.2} {:8.2}",
            ar[i], dry[i], daf[i], cho[i]
        )?;
    }
    for (i, label) in [(3, "N"), (4, "S")] {
        writeln!(out, "{label:<8} {:8} {:8.2} {:8.2}", ar[i], dry[i], daf[i])?;
    }
    writeln!(out, "{:<8} {:8} {:8.2}", "ash", ar[5], dry[5])?;
    writeln!(out, "{:<8} {:8}", "moisture", ar[6])?;
    writeln!(
        out,
        "{:<8} {s_ar:8.1} {s_dry:8.1} {s_daf:8.1} {s_cho:8.1}",
        "sum"
    )?;
    Ok(out)
}

fn chemical_block(daf: &ChemicalAnalysisDaf) -> ReportResult {
    let dry = daf.dry.values();
    let mut out = String::from("Using chemical analysis data. Values reported as mass %.\n\n");
    out.push_str("                     % dry    % daf\n");
    for c in BiomassComponent::ALL {
        let i = c.index();
        writeln!(out, "{:<17} {:8.2} {:8.2}", c.key(), dry[i], daf.percent[i])?;
    }
    let dry_sum: f64 = dry[..7].iter().sum();
    writeln!(out, "{:<17} {dry_sum:8.2} {:8.2}", "sum", daf.sum())?;
    Ok(out)
}

fn characterization_block(ch: &Characterization, modified: bool) -> ReportResult {
    let mut out = String::from("Using the reference-mixture characterization method.\n");
    if modified {
        out.push_str("Using yc, yh and shape parameters from the parameter file. Results in mass %.\n");
    } else {
        out.push_str("Using yc, yh as determined from ultimate analysis. Results in mass %.\n");
    }
    writeln!(out, "yc      = {:.4}", ch.yc)?;
    writeln!(out, "yh      = {:.4}", ch.yh)?;
    let s = &ch.shape;
    for (label, v) in [
        ("alpha", s.alpha),
        ("beta", s.beta),
        ("gamma", s.gamma),
        ("delta", s.delta),
        ("epsilon", s.epsilon),
    ] {
        writeln!(out, "{label:<7} = {v:.2}")?;
    }
    for (i, y) in ch.y_rm.iter().enumerate() {
        writeln!(out, "y_rm{}   = {y:.4}", i + 1)?;
    }
    out.push_str("\n                     % daf\n");
    for (c, y) in ch.composition.iter() {
        writeln!(out, "{:<17} {:8.2}", c.key(), y * 100.0)?;
    }
    writeln!(out, "{:<17} {:8.2}", "sum", ch.composition.sum() * 100.0)?;
    Ok(out)
}

pub fn composition_report(resolved: &ResolvedComposition, method_label: &str) -> ReportResult {
    let body = match &resolved.detail {
        ResolutionDetail::Chemical(daf) => chemical_block(daf)?,
        ResolutionDetail::Characterization(ch) => {
            characterization_block(ch, method_label == "ultmod")?
        }
    };
    Ok(format!("\n{}\n\n{body}", banner("Biomass composition")))
}

fn phase_lines(out: &mut String, point: &PhasePoint, precision: usize) -> fmt::Result {
    let rows = [
        ("gas", point.gas),
        ("liquid", point.liquid),
        ("solid", point.solid),
        ("meta", point.metaplastic),
        ("sum", point.total()),
    ];
    for (label, v) in rows {
        writeln!(out, "{label:<9} = {v:.precision$}")?;
    }
    Ok(())
}

pub fn batch_report(params: &BatchParams, run: &BatchRun) -> ReportResult {
    let t = params.temperature_k();
    let y = &run.final_yields;
    let mut out = format!("\n{}\n\n", banner("Batch reactor"));
    writeln!(out, "pressure      = {} Pa", grouped(params.pressure_pa()))?;
    writeln!(out, "temperature   = {t} K ({:.2}°C)", t - CELSIUS_OFFSET)?;
    writeln!(out, "time duration = {} s", params.duration_s())?;
    writeln!(out, "energy        = {}", params.energy)?;
    out.push_str("\n              % mass\n");
    for (label, v) in [
        ("gases", y.gas),
        ("liquids", y.liquid),
        ("solids", y.solid),
        ("metaplastics", y.metaplastic),
    ] {
        writeln!(out, "{label:<13} {:.2}", v * 100.0)?;
    }
    Ok(out)
}

pub fn efr_report(params: &EfrParams, run: &EfrRun) -> ReportResult {
    let mut out = format!("\n{}\n\n", banner("Entrained flow reactor"));
    writeln!(out, "mf_biomass    = {} kg/s", params.biomass_flow_kgps())?;
    writeln!(out, "mf_n2         = {} kg/s", params.carrier_flow_kgps())?;
    writeln!(out, "energy        = {}", params.energy)?;
    writeln!(out, "n_cstrs       = {}", params.n_stages)?;

    if let Some(inlet) = run.yields.point(0) {
        out.push_str("\nInitial mass fractions\n");
        phase_lines(&mut out, &inlet, 3)?;
    }
    if let Some(outlet) = run.yields.last() {
        out.push_str("\nFinal mass fractions\n");
        phase_lines(&mut out, &outlet, 3)?;
    }
    if let Some(outlet) = run.yields_carrier_free.last() {
        out.push_str("\nFinal mass fractions without N2\n");
        phase_lines(&mut out, &outlet, 3)?;
    }

    let c = &run.comparison;
    out.push_str("\nYields (wt. %)   Exp.    Model\n");
    writeln!(out, "{:<15} {:5.1}    {:.1}", "total liquid", c.reference.liquid, c.liquid)?;
    writeln!(out, "{:<15} {:5.1}    {:.1}", "char", c.reference.char, c.char)?;
    writeln!(out, "{:<15} {:5.1}    {:.1}", "gas", c.reference.gas, c.gas)?;
    writeln!(out, "{:<15} {:5.1}    {:.1}", "sum", c.reference.sum(), c.sum)?;
    Ok(out)
}

fn sobol_table(out: &mut String, output: &str, indices: &SobolIndices) -> fmt::Result {
    writeln!(out, "\nSobol analysis for {output}:\n")?;
    writeln!(
        out,
        "{:10} {:>10} {:>10} {:>10} {:>10}",
        "Parameter", "S1", "S1_conf", "ST", "ST_conf"
    )?;
    for (i, name) in indices.names.iter().enumerate() {
        writeln!(
            out,
            "{name:10} {:10.4} {:10.4} {:10.4} {:10.4}",
            indices.s1[i], indices.s1_conf[i], indices.st[i], indices.st_conf[i]
        )?;
    }
    Ok(())
}

pub fn sensitivity_report(run: &SensitivityRun) -> ReportResult {
    let (rows, cols) = run.shape();
    let n = rows / rows_per_sample(cols).max(1);
    let mut out = format!("\n{}\n\n", banner("Sensitivity analysis"));
    out.push_str("Using Sobol analysis for the batch reactor.\n");
    writeln!(out, "n         = {}", grouped_count(n))?;
    writeln!(out, "shape     = ({rows}, {cols})")?;
    writeln!(out, "samples   = {}", grouped_count(rows))?;
    if !run.skipped_rows.is_empty() {
        writeln!(out, "skipped   = {}", grouped_count(run.skipped_rows.len()))?;
    }
    for (output, indices) in run.indices() {
        sobol_table(&mut out, output, indices)?;
    }
    Ok(out)
}

pub fn done_report(elapsed: &Elapsed) -> String {
    let (min, sec) = elapsed.minutes_seconds();
    format!(
        "\n{}\n\nelapsed time = {:.2} seconds (≈ {min} min {sec:.0} sec)\n",
        banner("Done"),
        elapsed.seconds
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn grouping_preserves_digits(n in 0u64..10_000_000_000) {
            let text = grouped(n as f64);
            prop_assert_eq!(text.replace(',', ""), n.to_string());
            for group in text.split(',').skip(1) {
                prop_assert_eq!(group.len(), 3);
            }
        }
    }
}
