//! Interpolated percentiles and box-plot summaries.

use serde::{Deserialize, Serialize};

/// Computes a single percentile from sorted data.
///
/// Uses linear interpolation between closest ranks: the `k`-th percentile
/// sits at fractional index `(n - 1) * k / 100`.
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use nrlstat_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(compute_percentile(&values, 50.0), 2.5);
/// assert_eq!(compute_percentile(&values, 0.0), 1.0);
/// assert_eq!(compute_percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    let Some(&last) = sorted_values.last() else {
        return f64::NAN;
    };
    let rank = (sorted_values.len() - 1) as f64 * (percentile.clamp(0.0, 100.0) / 100.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if upper >= sorted_values.len() {
        return last;
    }
    let fraction = rank - rank.floor();
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction
}

/// Box-and-whisker summary of a sample (Tukey's 1.5 × IQR rule).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Observations outside the whiskers.
    pub outliers: Vec<f64>,
}

impl BoxPlotSummary {
    /// Summarizes unsorted values, or `None` if there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use nrlstat_stats::percentiles::BoxPlotSummary;
    ///
    /// let summary = BoxPlotSummary::new(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
    /// assert_eq!(summary.median, 3.0);
    /// assert_eq!(summary.upper_whisker, 4.0);
    /// assert_eq!(summary.outliers, vec![100.0]);
    /// ```
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = compute_percentile(&sorted, 25.0);
        let median = compute_percentile(&sorted, 50.0);
        let q3 = compute_percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside = || sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}
