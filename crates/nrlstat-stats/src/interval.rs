use serde::{Deserialize, Serialize};

use crate::{descriptive::DescriptiveStats, distribution::StudentT};

/// Confidence level of every interval computed by this module.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Critical value used when a sample has a single observation and no
/// t-distribution is available (`df = 0`).
pub const NORMAL_FALLBACK_CRITICAL: f64 = 1.96;

/// How the critical value of a [`ConfidenceInterval`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntervalMethod {
    /// Two-tailed Student-t quantile with `df = n - 1`.
    StudentT { df: usize },
    /// Fixed normal critical value for `n = 1`.
    ///
    /// Not a valid frequentist interval: with one observation the standard
    /// error is zero and the interval collapses onto the mean.
    NormalFallback,
}

impl IntervalMethod {
    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::NormalFallback)
    }
}

/// A 95% confidence interval for a sample mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// The critical value multiplied with the standard error.
    pub critical_value: f64,
    pub method: IntervalMethod,
}

impl ConfidenceInterval {
    /// Computes the interval `mean ± t * std_error` for a summarized sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use nrlstat_stats::{descriptive::DescriptiveStats, interval::ConfidenceInterval};
    ///
    /// let stats = DescriptiveStats::new([0.20, 0.22, 0.24]).unwrap();
    /// let ci = ConfidenceInterval::for_mean(&stats);
    /// assert!(ci.lower < stats.mean && stats.mean < ci.upper);
    /// assert!((ci.critical_value - 4.302_653).abs() < 1e-5);
    /// ```
    #[must_use]
    pub fn for_mean(stats: &DescriptiveStats) -> Self {
        Self::from_parts(stats.mean, stats.std_dev, stats.count)
    }

    /// Computes the interval from a mean, a sample standard deviation and a sample size.
    ///
    /// `count` must be at least 1.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_parts(mean: f64, std_dev: f64, count: usize) -> Self {
        assert!(count > 0, "confidence interval requires at least one observation");

        let df = count - 1;
        let (critical_value, method) = match StudentT::new(df as f64) {
            Some(dist) => (
                dist.two_tailed_critical(CONFIDENCE_LEVEL),
                IntervalMethod::StudentT { df },
            ),
            None => (NORMAL_FALLBACK_CRITICAL, IntervalMethod::NormalFallback),
        };
        let margin = critical_value * std_dev / (count as f64).sqrt();

        Self {
            lower: mean - margin,
            upper: mean + margin,
            critical_value,
            method,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}
