use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use nrlstat_analysis::{
    config::AnalysisConfig,
    pipeline::{AnalysisOutcome, AnalysisPipeline, PipelineError},
};

use crate::{
    command::InputArg,
    plot,
    report::Reports,
    util::{self, TracingReporter},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    #[clap(flatten)]
    input: InputArg,
    /// Directory the reports and plots are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Smallest max-min difference of mean overhead that matters in practice
    #[arg(long)]
    threshold: Option<f64>,
    /// Prefix of every output file name
    #[arg(long)]
    prefix: Option<String>,
    /// Skip the SVG/PNG charts
    #[arg(long)]
    no_plots: bool,
}

impl AnalyzeArg {
    fn config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = self.input.load_config()?;
        if let Some(dir) = &self.output_dir {
            config.output_directory.clone_from(dir);
        }
        if let Some(threshold) = self.threshold {
            config.practical_threshold = threshold;
        }
        if let Some(prefix) = &self.prefix {
            config.output_prefix.clone_from(prefix);
        }
        Ok(config)
    }
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = arg.config()?;
    let (outcome, written) = analyze(config, !arg.no_plots)?;
    for path in &written {
        tracing::info!("Wrote {}", path.display());
    }
    if !outcome.dataset.is_complete() {
        tracing::warn!(
            "{} file(s) were skipped; the report is marked INCOMPLETE DATA",
            outcome.dataset.skipped().len()
        );
    }
    Ok(())
}

fn analyze(
    config: AnalysisConfig,
    with_plots: bool,
) -> anyhow::Result<(AnalysisOutcome, Vec<PathBuf>)> {
    tracing::info!(
        "Loading results from {} ({})",
        config.input_directory.display(),
        config.filename_pattern
    );
    let pipeline = AnalysisPipeline::new(config);
    let outcome = pipeline
        .run(&mut TracingReporter)
        .inspect_err(|err| {
            if let PipelineError::Dataset(err) = err {
                tracing::error!("Hint: {}", err.remedy());
            }
        })
        .context("Analysis failed")?;
    let config = pipeline.config();

    let Reports {
        text,
        mut artifacts,
    } = Reports::render(&outcome, config, Utc::now())?;
    if with_plots {
        artifacts.extend(plot::render_plots(&outcome, &config.output_prefix)?);
    }
    print!("{text}");

    util::ensure_directory(&config.output_directory)?;
    let written = util::write_artifacts(&config.output_directory, &artifacts)?;
    Ok((outcome, written))
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;

    fn write_run(dir: &Path, protocol: &str, seed: u32, nrl: &str) {
        let body = format!(
            "metric,value\nground_routing,{protocol}\nseed,{seed}\npdr,97.5\navg_delay_ms,40.1\nnrl,{nrl}\n"
        );
        fs::write(dir.join(format!("{protocol}_seed{seed}.csv")), body).unwrap();
    }

    fn config_for(input: &Path, output: &Path) -> AnalysisConfig {
        AnalysisConfig {
            input_directory: input.to_owned(),
            output_directory: output.join("analysis"),
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_analyze_writes_every_artifact() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for (protocol, values) in [
            ("aodv", ["0.09", "0.10", "0.11"]),
            ("olsr", ["0.49", "0.50", "0.51"]),
        ] {
            for (seed, nrl) in (1..).zip(values) {
                write_run(input.path(), protocol, seed, nrl);
            }
        }
        write_run(input.path(), "dsdv", 1, "not-a-number");

        let (outcome, written) =
            analyze(config_for(input.path(), output.path()), true).unwrap();

        assert_eq!(outcome.dataset.len(), 6);
        assert_eq!(outcome.dataset.skipped().len(), 1);
        assert_eq!(written.len(), 6);
        assert!(written.iter().all(|path| path.exists()));
        let report = fs::read_to_string(output.path().join("analysis/nrl_report.txt")).unwrap();
        assert!(report.contains("INCOMPLETE DATA"));
        assert!(report.contains("dsdv_seed1.csv"));
    }

    #[test]
    fn test_analyze_without_plots() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for seed in 1..=2 {
            write_run(input.path(), "aodv", seed, "0.2");
            write_run(input.path(), "olsr", seed, "0.3");
        }

        let (_, written) = analyze(config_for(input.path(), output.path()), false).unwrap();
        assert_eq!(written.len(), 3);
        assert!(!output.path().join("analysis/nrl_comparison.svg").exists());
    }

    #[test]
    fn test_failed_write_reports_files_from_this_run() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for seed in 1..=2 {
            write_run(input.path(), "aodv", seed, "0.2");
            write_run(input.path(), "olsr", seed, "0.3");
        }
        let config = config_for(input.path(), output.path());
        let blocked = config.output_directory.join("nrl_comparison.png");
        fs::create_dir_all(blocked.join("occupied")).unwrap();

        let err = analyze(config, true).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Output is incomplete"), "{message}");
        assert!(message.contains("nrl_comparison.svg"), "{message}");
        assert!(message.contains("nrl_comparison.png"), "{message}");
        assert!(!output.path().join("analysis/nrl_overhead_vs_pdr.svg").exists());
    }

    #[test]
    fn test_empty_directory_fails() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let err = analyze(config_for(input.path(), output.path()), true).unwrap_err();
        assert!(format!("{err:#}").contains("no files matching '*.csv'"));
        assert!(!output.path().join("analysis").exists());
    }

    #[test]
    fn test_flags_override_config() {
        let arg = AnalyzeArg {
            threshold: Some(0.1),
            prefix: Some("exp2".to_owned()),
            ..AnalyzeArg::default()
        };
        let config = arg.config().unwrap();
        assert_eq!(config.practical_threshold, 0.1);
        assert_eq!(config.output_prefix, "exp2");
        assert_eq!(config.filename_pattern, "*.csv");
    }
}
