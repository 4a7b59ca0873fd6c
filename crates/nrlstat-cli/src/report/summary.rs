//! Machine-readable summaries: one CSV row per group and the full outcome as JSON.

use std::io;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use nrlstat_analysis::{config::AnalysisConfig, group::GroupStatistics, pipeline::AnalysisOutcome};
use nrlstat_stats::interval::IntervalMethod;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    protocol: &'a str,
    n: usize,
    mean: f64,
    std: f64,
    sem: f64,
    ci_lower: f64,
    ci_upper: f64,
    cv_percent: f64,
    min: f64,
    max: f64,
    interval_method: String,
}

impl<'a> From<&'a GroupStatistics> for SummaryRow<'a> {
    fn from(group: &'a GroupStatistics) -> Self {
        Self {
            protocol: &group.protocol,
            n: group.count,
            mean: group.mean,
            std: group.std_dev,
            sem: group.std_error,
            ci_lower: group.ci_lower(),
            ci_upper: group.ci_upper(),
            cv_percent: group.cv_percent,
            min: group.min,
            max: group.max,
            interval_method: interval_method_label(group.interval_method()),
        }
    }
}

fn interval_method_label(method: IntervalMethod) -> String {
    match method {
        IntervalMethod::StudentT { df } => format!("t(df={df})"),
        IntervalMethod::NormalFallback => "z=1.96".to_owned(),
    }
}

/// Writes the per-group table as CSV with a header row.
pub(crate) fn write_csv<W>(writer: W, groups: &[GroupStatistics]) -> anyhow::Result<()>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for group in groups {
        writer
            .serialize(SummaryRow::from(group))
            .with_context(|| format!("Failed to write summary row for {}", group.protocol))?;
    }
    writer.flush().context("Failed to flush summary CSV")?;
    Ok(())
}

/// Everything needed to reproduce a report, as written to the JSON summary.
#[derive(Debug, Serialize)]
pub(crate) struct SummaryDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub version: &'static str,
    pub config: &'a AnalysisConfig,
    pub outcome: &'a AnalysisOutcome,
}

impl<'a> SummaryDocument<'a> {
    pub fn new(
        outcome: &'a AnalysisOutcome,
        config: &'a AnalysisConfig,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_at,
            version: env!("CARGO_PKG_VERSION"),
            config,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use nrlstat_analysis::record::Metric;

    use super::*;
    use crate::testing::sample_outcome;

    #[test]
    fn test_csv_header_and_rows() {
        let outcome = sample_outcome(AnalysisConfig::default());
        let mut buf = vec![];
        write_csv(&mut buf, &outcome.overhead).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "protocol,n,mean,std,sem,ci_lower,ci_upper,cv_percent,min,max,interval_method"
        );
        let rows = lines.collect::<Vec<_>>();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("AODV,3,"));
        assert!(rows[0].ends_with(",t(df=2)"));
    }

    #[test]
    fn test_single_run_row_is_marked() {
        let group = GroupStatistics::from_values("AODV", Metric::Overhead, vec![0.2]).unwrap();
        let mut buf = vec![];
        write_csv(&mut buf, &[group]).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",z=1.96"));
    }

    #[test]
    fn test_json_document() {
        let config = AnalysisConfig::default();
        let outcome = sample_outcome(config.clone());
        let generated_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let json = serde_json::to_value(SummaryDocument::new(&outcome, &config, generated_at))
            .unwrap();

        assert_eq!(json["generated_at"], "2026-01-02T03:04:05Z");
        assert_eq!(json["config"]["output_prefix"], "nrl");
        assert_eq!(json["outcome"]["verdict"]["kind"], "differ_and_matters");
        assert_eq!(json["outcome"]["overhead"].as_array().unwrap().len(), 3);
    }
}
