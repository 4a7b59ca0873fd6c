//! Rule-based reading of the statistical and practical significance results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    hypothesis::{HypothesisTestError, HypothesisTestResult},
    practical::PracticalSignificance,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Significant and larger than the practical threshold.
    DifferAndMatters {
        lowest_protocol: String,
        lowest_mean: f64,
        highest_protocol: String,
        highest_mean: f64,
        ratio: f64,
        /// `(1 - lowest / highest) * 100`
        relative_reduction_percent: f64,
    },
    /// Significant, but the spread is within the practical threshold.
    SignificantButNegligible { difference: f64, threshold: f64 },
    /// The spread exceeds the threshold, but the test cannot tell it from noise.
    LargeButNotSignificant { difference: f64, threshold: f64 },
    /// Neither significant nor large.
    Equivalent,
    /// The hypothesis test could not be run.
    TestUnavailable { reason: String },
}

impl Verdict {
    #[must_use]
    pub fn decide(
        test: Result<&HypothesisTestResult, &HypothesisTestError>,
        practical: Option<&PracticalSignificance>,
    ) -> Self {
        let test = match test {
            Ok(test) => test,
            Err(err) => {
                return Verdict::TestUnavailable {
                    reason: err.to_string(),
                };
            }
        };
        let Some(practical) = practical else {
            return Verdict::TestUnavailable {
                reason: "no group statistics".to_owned(),
            };
        };

        match (test.significant, practical.matters) {
            (true, true) => Verdict::DifferAndMatters {
                lowest_protocol: practical.lowest_protocol.clone(),
                lowest_mean: practical.lowest_mean,
                highest_protocol: practical.highest_protocol.clone(),
                highest_mean: practical.highest_mean,
                ratio: practical.ratio,
                relative_reduction_percent: practical.relative_reduction_percent(),
            },
            (true, false) => Verdict::SignificantButNegligible {
                difference: practical.difference,
                threshold: practical.threshold,
            },
            (false, true) => Verdict::LargeButNotSignificant {
                difference: practical.difference,
                threshold: practical.threshold,
            },
            (false, false) => Verdict::Equivalent,
        }
    }

    /// `Some(true)` when the protocols differ significantly, `None` when untested.
    #[must_use]
    pub fn protocols_differ(&self) -> Option<bool> {
        match self {
            Verdict::DifferAndMatters { .. } | Verdict::SignificantButNegligible { .. } => {
                Some(true)
            }
            Verdict::LargeButNotSignificant { .. } | Verdict::Equivalent => Some(false),
            Verdict::TestUnavailable { .. } => None,
        }
    }

    /// Headline followed by explanatory lines.
    #[must_use]
    pub fn explanation(&self) -> Vec<String> {
        match self {
            Verdict::DifferAndMatters {
                lowest_protocol,
                lowest_mean,
                highest_protocol,
                highest_mean,
                ratio,
                relative_reduction_percent,
            } => vec![
                "Protocols differ significantly in routing overhead.".to_owned(),
                format!("{lowest_protocol} has the lowest overhead ({lowest_mean:.4})."),
                format!("{highest_protocol} has the highest overhead ({highest_mean:.4})."),
                format!("Overhead ratio: {}.", format_ratio(*ratio)),
                format!(
                    "{lowest_protocol} achieves {relative_reduction_percent:.0}% lower overhead \
                     than {highest_protocol}."
                ),
            ],
            Verdict::SignificantButNegligible {
                difference,
                threshold,
            } => vec![
                "Statistically significant but not practically meaningful.".to_owned(),
                format!("Difference ({difference:.4}) is within the threshold ({threshold:.4})."),
                "All protocols are effectively equivalent for overhead.".to_owned(),
            ],
            Verdict::LargeButNotSignificant {
                difference,
                threshold,
            } => vec![
                "No significant difference in routing overhead.".to_owned(),
                format!(
                    "The observed difference ({difference:.4}) exceeds the threshold \
                     ({threshold:.4}) but is not distinguishable from run-to-run variation."
                ),
                "More runs per protocol are needed before drawing a conclusion.".to_owned(),
            ],
            Verdict::Equivalent => vec![
                "No significant difference in routing overhead.".to_owned(),
                "All protocols perform similarly (overhead invariant).".to_owned(),
            ],
            Verdict::TestUnavailable { reason } => vec![
                "No conclusion: the hypothesis test could not be run.".to_owned(),
                format!("Insufficient data: {reason}."),
            ],
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::DifferAndMatters { .. } => "differ (practically significant)",
            Verdict::SignificantButNegligible { .. } => "differ (negligible)",
            Verdict::LargeButNotSignificant { .. } => "inconclusive",
            Verdict::Equivalent => "invariant",
            Verdict::TestUnavailable { .. } => "insufficient data",
        };
        fmt::Display::fmt(s, f)
    }
}

/// Formats a max/min ratio, spelling out the unbounded case.
#[must_use]
pub fn format_ratio(ratio: f64) -> String {
    if ratio.is_infinite() {
        "undefined (lowest mean is 0)".to_owned()
    } else {
        format!("{ratio:.2}x")
    }
}
