//! Analysis configuration.
//!
//! Every field has a default, so a configuration file only needs to name what
//! it changes:
//!
//! ```json
//! {
//!   "input_directory": "results/ground_only",
//!   "filename_pattern": "ground_only_*.csv",
//!   "reference": { "label": "dual-layer", "p_value": 0.837, "means": { "AODV": 0.22 } }
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    hypothesis::SIGNIFICANCE_ALPHA,
    pattern::{FilenamePattern, PatternError},
    practical::DEFAULT_PRACTICAL_THRESHOLD,
    reference::ReferenceValues,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("practical threshold must be a finite, non-negative number, got {value}")]
    InvalidThreshold { value: f64 },
    #[display("output prefix must not be empty")]
    EmptyPrefix,
    #[display("{_0}")]
    Pattern(PatternError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding the per-run result files.
    pub input_directory: PathBuf,
    /// Directory the reports and plots are written to.
    pub output_directory: PathBuf,
    /// Wildcard selecting result files by name.
    pub filename_pattern: String,
    pub practical_threshold: f64,
    pub reference: Option<ReferenceValues>,
    /// Prefix of every output file name.
    pub output_prefix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::from("results"),
            output_directory: PathBuf::from("results/analysis"),
            filename_pattern: "*.csv".to_owned(),
            practical_threshold: DEFAULT_PRACTICAL_THRESHOLD,
            reference: None,
            output_prefix: "nrl".to_owned(),
        }
    }
}

impl AnalysisConfig {
    /// Significance level of the hypothesis test. Not configurable.
    #[must_use]
    pub fn significance_alpha(&self) -> f64 {
        SIGNIFICANCE_ALPHA
    }

    /// Checks the fields and compiles the filename pattern.
    pub fn validate(&self) -> Result<FilenamePattern, ConfigError> {
        if !self.practical_threshold.is_finite() || self.practical_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                value: self.practical_threshold,
            });
        }
        if self.output_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        FilenamePattern::new(&self.filename_pattern).map_err(ConfigError::Pattern)
    }
}
