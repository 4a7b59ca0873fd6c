use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use nrlstat_analysis::config::AnalysisConfig;

use crate::util::{self, read_json_file};

use self::{analyze::AnalyzeArg, describe::DescribeArg};

mod analyze;
mod describe;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the full analysis and write reports and plots (default)
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Print per-protocol descriptive statistics without testing
    Describe(#[clap(flatten)] DescribeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_logging(args.verbose);
    match args.mode.unwrap_or(Mode::Analyze(AnalyzeArg::default())) {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
    }
    Ok(())
}

/// Where to find the result files; shared by every mode.
#[derive(Default, Debug, Clone, Args)]
pub(crate) struct InputArg {
    /// JSON configuration file; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the per-run result files
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Wildcard selecting result files by name (e.g. "*_seed*.csv")
    #[arg(long)]
    pattern: Option<String>,
}

impl InputArg {
    /// Loads the configuration file, if any, and applies the flags on top.
    pub(crate) fn load_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => read_json_file::<AnalysisConfig, _>("configuration", path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(dir) = &self.input_dir {
            config.input_directory.clone_from(dir);
        }
        if let Some(pattern) = &self.pattern {
            config.filename_pattern.clone_from(pattern);
        }
        Ok(config)
    }
}
