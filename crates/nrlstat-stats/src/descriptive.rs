use serde::{Deserialize, Serialize};

/// Descriptive statistics summarizing a sample.
///
/// Dispersion measures use the sample (Bessel-corrected, `n - 1`) estimators,
/// which is what confidence intervals and ANOVA expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Number of observations.
    pub count: usize,
    /// The minimum value in the sample.
    pub min: f64,
    /// The maximum value in the sample.
    pub max: f64,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The median of the sample (average of the two middle values for even counts).
    pub median: f64,
    /// The sample variance (`n - 1` denominator, `0` for a single observation).
    pub variance: f64,
    /// The sample standard deviation.
    pub std_dev: f64,
    /// The standard error of the mean (`std_dev / sqrt(n)`).
    pub std_error: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use nrlstat_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, 2.5);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nrlstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::from_sorted(&[0.2, 0.4]).unwrap();
    /// assert!((stats.median - 0.3).abs() < 1e-12);
    /// assert!(DescriptiveStats::from_sorted(&[]).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;

        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted_values[mid - 1] + sorted_values[mid]) / 2.0
        } else {
            sorted_values[mid]
        };

        let variance = if count > 1 {
            sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0)
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let std_error = std_dev / n.sqrt();

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
            std_error,
        })
    }

    /// Coefficient of variation in percent (`std_dev / mean * 100`).
    ///
    /// Defined as `0` when the mean is exactly zero. That is a convention, not a
    /// measurement: a zero-mean sample may still vary.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nrlstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([-1.0, 1.0]).unwrap();
    /// assert_eq!(stats.coefficient_of_variation(), 0.0);
    /// ```
    #[must_use]
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_has_zero_dispersion() {
        let stats = DescriptiveStats::new([0.42]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 0.42);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.std_error, 0.0);
    }

    #[test]
    fn test_sample_std_uses_bessel_correction() {
        let stats = DescriptiveStats::new([0.20, 0.22, 0.24]).unwrap();
        assert!((stats.mean - 0.22).abs() < 1e-12);
        assert!((stats.std_dev - 0.02).abs() < 1e-12);
        assert!((stats.std_error - 0.02 / 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_coefficient_of_variation_matches_definition() {
        let stats = DescriptiveStats::new([2.0, 4.0, 6.0]).unwrap();
        assert_eq!(
            stats.coefficient_of_variation(),
            stats.std_dev / stats.mean * 100.0
        );
    }

    #[test]
    fn test_empty_is_none() {
        assert!(DescriptiveStats::new(std::iter::empty()).is_none());
    }

    #[test]
    #[should_panic(expected = "values must be sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[3.0, 1.0]);
    }
}
