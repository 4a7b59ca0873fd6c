//! Plain-text analysis report.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use nrlstat_analysis::{
    config::AnalysisConfig,
    group::GroupStatistics,
    hypothesis::{HypothesisTestError, HypothesisTestResult},
    interpretation::format_ratio,
    pipeline::AnalysisOutcome,
    practical::PracticalSignificance,
    record::Metric,
    reference::ReferenceComparison,
};
use nrlstat_stats::interval::NORMAL_FALLBACK_CRITICAL;

const RULE: &str =
    "======================================================================";

pub(crate) fn render(
    outcome: &AnalysisOutcome,
    config: &AnalysisConfig,
    generated_at: DateTime<Utc>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{RULE}")?;
    writeln!(out, "ROUTING OVERHEAD ANALYSIS: {}", Metric::Overhead.description())?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(
        out,
        "Input:     {} ({})",
        config.input_directory.display(),
        config.filename_pattern
    )?;
    writeln!(out)?;

    write_dataset(&mut out, outcome)?;
    write_section(&mut out, "DESCRIPTIVE STATISTICS (95% confidence intervals)")?;
    write_group_table(&mut out, &outcome.overhead)?;
    write_fallback_notes(&mut out, &outcome.overhead)?;
    write_ranking(&mut out, &outcome.ranking())?;
    write_test(&mut out, &outcome.test)?;
    write_practical(&mut out, outcome.practical.as_ref())?;
    write_secondary(&mut out, outcome)?;
    if let Some(reference) = &outcome.reference {
        write_reference(&mut out, reference, config.significance_alpha())?;
    }

    write_section(&mut out, "INTERPRETATION")?;
    writeln!(out, "  Verdict: {}", outcome.verdict)?;
    for line in outcome.verdict.explanation() {
        writeln!(out, "  {line}")?;
    }
    writeln!(out, "{RULE}")?;
    Ok(out)
}

fn write_section(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn write_dataset(out: &mut String, outcome: &AnalysisOutcome) -> fmt::Result {
    let dataset = &outcome.dataset;
    if !dataset.is_complete() {
        writeln!(
            out,
            "*** INCOMPLETE DATA: {} file(s) could not be loaded and were skipped ***",
            dataset.skipped().len()
        )?;
        for skipped in dataset.skipped() {
            writeln!(out, "  - {}: {}", skipped.path.display(), skipped.reason)?;
        }
        writeln!(out)?;
    }

    write_section(out, "DATASET")?;
    let protocols = dataset.protocols();
    writeln!(out, "  Runs loaded:        {}", dataset.len())?;
    writeln!(
        out,
        "  Protocols:          {} ({})",
        protocols.len(),
        protocols.join(", ")
    )?;
    match dataset.seed_range_per_protocol() {
        Some((lo, hi)) if lo == hi => writeln!(out, "  Runs per protocol:  {lo}")?,
        Some((lo, hi)) => writeln!(out, "  Runs per protocol:  {lo}-{hi}")?,
        None => {}
    }
    writeln!(out, "  Files skipped:      {}", dataset.skipped().len())
}

/// Writes one row per group with the summary statistics and interval.
pub(crate) fn write_group_table(out: &mut String, groups: &[GroupStatistics]) -> fmt::Result {
    writeln!(
        out,
        "  {:<10} {:>3} {:>9} {:>9} {:>9} {:>9} {:>9} {:>7} {:>9} {:>9}",
        "Protocol", "n", "Mean", "Std", "SEM", "CI lower", "CI upper", "CV%", "Min", "Max"
    )?;
    for g in groups {
        writeln!(
            out,
            "  {:<10} {:>3} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>7.1} {:>9.4} {:>9.4}",
            g.protocol,
            g.count,
            g.mean,
            g.std_dev,
            g.std_error,
            g.ci_lower(),
            g.ci_upper(),
            g.cv_percent,
            g.min,
            g.max,
        )?;
    }
    Ok(())
}

fn write_fallback_notes(out: &mut String, groups: &[GroupStatistics]) -> fmt::Result {
    for g in groups.iter().filter(|g| g.uses_fallback_interval()) {
        writeln!(
            out,
            "  Note: {} has a single run; its interval uses z = {NORMAL_FALLBACK_CRITICAL} \
             and is an approximation.",
            g.protocol
        )?;
    }
    Ok(())
}

fn write_ranking(out: &mut String, ranking: &[GroupStatistics]) -> fmt::Result {
    write_section(out, "RANKING (lowest overhead first)")?;
    for (rank, g) in (1..).zip(ranking) {
        writeln!(out, "  {rank}. {:<10} {:.4}", g.protocol, g.mean)?;
    }
    Ok(())
}

fn write_test(
    out: &mut String,
    test: &Result<HypothesisTestResult, HypothesisTestError>,
) -> fmt::Result {
    write_section(out, "HYPOTHESIS TEST (one-way ANOVA)")?;
    match test {
        Ok(test) => {
            writeln!(out, "  H0: all protocol means are equal")?;
            writeln!(
                out,
                "  F({}, {}) = {}",
                test.df_between,
                test.df_within,
                format_statistic(test.f_statistic)
            )?;
            writeln!(out, "  p-value  = {}", format_p_value(test.p_value))?;
            writeln!(out, "  alpha    = {}", test.alpha)?;
            let result = if test.significant {
                "reject H0 (means differ)"
            } else {
                "fail to reject H0"
            };
            writeln!(out, "  Result:   {result}")
        }
        Err(err) => writeln!(out, "  Insufficient data: {err}"),
    }
}

fn write_practical(out: &mut String, practical: Option<&PracticalSignificance>) -> fmt::Result {
    write_section(out, "PRACTICAL SIGNIFICANCE")?;
    let Some(p) = practical else {
        return writeln!(out, "  Not evaluated: no protocol groups.");
    };
    writeln!(out, "  Highest mean: {} ({:.4})", p.highest_protocol, p.highest_mean)?;
    writeln!(out, "  Lowest mean:  {} ({:.4})", p.lowest_protocol, p.lowest_mean)?;
    writeln!(out, "  Difference:   {:.4}", p.difference)?;
    writeln!(out, "  Ratio:        {}", format_ratio(p.ratio))?;
    writeln!(out, "  Threshold:    {}", p.threshold)?;
    let verdict = if p.matters {
        "difference exceeds the threshold"
    } else {
        "difference is within the threshold"
    };
    writeln!(out, "  Assessment:   {verdict}")
}

fn write_secondary(out: &mut String, outcome: &AnalysisOutcome) -> fmt::Result {
    write_section(out, "SECONDARY METRICS (mean ± std)")?;
    writeln!(
        out,
        "  {:<10} {:>20} {:>20}",
        "Protocol",
        Metric::DeliveryRatio.label(),
        Metric::MeanDelay.label()
    )?;
    for pdr in &outcome.delivery_ratio {
        let delay = outcome
            .mean_delay
            .iter()
            .find(|d| d.protocol == pdr.protocol);
        let delay = delay.map_or_else(
            || "n/a".to_owned(),
            |d| format!("{:.2} ± {:.2}", d.mean, d.std_dev),
        );
        writeln!(
            out,
            "  {:<10} {:>20} {:>20}",
            pdr.protocol,
            format!("{:.2} ± {:.2}", pdr.mean, pdr.std_dev),
            delay
        )?;
    }
    Ok(())
}

fn write_reference(out: &mut String, reference: &ReferenceComparison, alpha: f64) -> fmt::Result {
    write_section(out, &format!("COMPARISON WITH {}", reference.label.to_uppercase()))?;
    writeln!(
        out,
        "  {:<10} {:>10} {:>10} {:>10}",
        "Protocol", "Observed", "Reference", "Delta"
    )?;
    for row in &reference.rows {
        writeln!(
            out,
            "  {:<10} {:>10.4} {:>10} {:>10}",
            row.protocol,
            row.observed_mean,
            format_optional(row.reference_mean),
            format_optional(row.delta)
        )?;
    }
    if let Some(p) = reference.observed_p_value {
        writeln!(
            out,
            "  Observed:  p = {} ({})",
            format_p_value(p),
            ReferenceComparison::conclusion(p, alpha)
        )?;
    }
    if let Some(p) = reference.reference_p_value {
        writeln!(
            out,
            "  {}: p = {} ({})",
            reference.label,
            format_p_value(p),
            ReferenceComparison::conclusion(p, alpha)
        )?;
    }
    match reference.verdicts_agree {
        Some(true) => writeln!(out, "  Both experiments reach the same conclusion."),
        Some(false) => writeln!(out, "  The experiments reach different conclusions."),
        None => Ok(()),
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.4}"))
}

fn format_statistic(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_owned()
    } else {
        format!("{value:.4}")
    }
}

fn format_p_value(p: f64) -> String {
    if p < 1e-4 {
        "< 0.0001".to_owned()
    } else {
        format!("{p:.4}")
    }
}
