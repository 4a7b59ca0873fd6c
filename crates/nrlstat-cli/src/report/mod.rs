//! Text, CSV and JSON reports of the analysis outcome.

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use nrlstat_analysis::{config::AnalysisConfig, pipeline::AnalysisOutcome};

use crate::util::Artifact;

use self::summary::SummaryDocument;

mod summary;
pub(crate) mod text;

/// Rendered report set for one run.
#[derive(Debug)]
pub(crate) struct Reports {
    pub text: String,
    /// The text report, the CSV summary and the JSON summary, in that order.
    pub artifacts: Vec<Artifact>,
}

impl Reports {
    pub fn render(
        outcome: &AnalysisOutcome,
        config: &AnalysisConfig,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<Self> {
        let prefix = &config.output_prefix;
        let text = text::render(outcome, config, generated_at).context("Failed to render report")?;

        let mut csv = vec![];
        summary::write_csv(&mut csv, &outcome.overhead)?;

        let document = SummaryDocument::new(outcome, config, generated_at);
        let mut json =
            serde_json::to_vec_pretty(&document).context("Failed to serialize JSON summary")?;
        json.push(b'\n');

        let artifacts = vec![
            Artifact::new(format!("{prefix}_report.txt"), text.clone()),
            Artifact::new(format!("{prefix}_summary.csv"), csv),
            Artifact::new(format!("{prefix}_summary.json"), json),
        ];
        Ok(Self { text, artifacts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_outcome;

    #[test]
    fn test_render_reports() {
        let config = AnalysisConfig {
            output_prefix: "run1".to_owned(),
            ..AnalysisConfig::default()
        };
        let outcome = sample_outcome(config.clone());
        let reports = Reports::render(&outcome, &config, Utc::now()).unwrap();

        let names = reports
            .artifacts
            .iter()
            .map(|a| a.file_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            ["run1_report.txt", "run1_summary.csv", "run1_summary.json"]
        );
        assert_eq!(reports.artifacts[0].contents, reports.text.as_bytes());
        let csv = String::from_utf8(reports.artifacts[1].contents.clone()).unwrap();
        assert_eq!(csv.lines().count(), 4);
        let json: serde_json::Value =
            serde_json::from_slice(&reports.artifacts[2].contents).unwrap();
        assert_eq!(json["config"]["output_prefix"], "run1");
    }
}
