//! Per-protocol descriptive statistics.

use std::str::FromStr;

use nrlstat_stats::{
    descriptive::DescriptiveStats,
    interval::{ConfidenceInterval, IntervalMethod},
    percentiles::BoxPlotSummary,
};
use serde::{Deserialize, Serialize};

use crate::{dataset::Dataset, record::Metric, reporter::Reporter};

/// Summary of one metric over all runs of one protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub protocol: String,
    pub metric: Metric,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator; 0 for a single run).
    pub std_dev: f64,
    pub std_error: f64,
    /// 95% confidence interval for the mean.
    pub interval: ConfidenceInterval,
    /// Coefficient of variation in percent, 0 when the mean is 0.
    pub cv_percent: f64,
    pub min: f64,
    pub max: f64,
    pub box_plot: BoxPlotSummary,
    /// Observations in record order.
    pub values: Vec<f64>,
}

impl GroupStatistics {
    /// Summarizes a single group of observations, or `None` if it is empty.
    #[must_use]
    pub fn from_values(protocol: &str, metric: Metric, values: Vec<f64>) -> Option<Self> {
        let stats = DescriptiveStats::new(values.iter().copied())?;
        let box_plot = BoxPlotSummary::new(&values)?;
        let interval = ConfidenceInterval::for_mean(&stats);
        Some(Self {
            protocol: protocol.to_owned(),
            metric,
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            std_error: stats.std_error,
            interval,
            cv_percent: stats.coefficient_of_variation(),
            min: stats.min,
            max: stats.max,
            box_plot,
            values,
        })
    }

    /// Computes one summary per protocol, ordered by protocol name.
    ///
    /// Groups with a single run get the fixed normal critical value instead
    /// of a t quantile; each such group is reported as a warning.
    pub fn compute(
        dataset: &Dataset,
        metric: Metric,
        reporter: &mut dyn Reporter,
    ) -> Vec<GroupStatistics> {
        let groups = dataset
            .values_by_protocol(metric)
            .into_iter()
            .filter_map(|(protocol, values)| Self::from_values(protocol, metric, values))
            .collect::<Vec<_>>();

        for group in groups.iter().filter(|g| g.uses_fallback_interval()) {
            reporter.warning(&format!(
                "{}: only one run; the {} confidence interval uses z = {} and is an approximation",
                group.protocol, metric, group.interval.critical_value,
            ));
        }
        groups
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.box_plot.median
    }

    #[must_use]
    pub fn ci_lower(&self) -> f64 {
        self.interval.lower
    }

    #[must_use]
    pub fn ci_upper(&self) -> f64 {
        self.interval.upper
    }

    #[must_use]
    pub fn interval_method(&self) -> IntervalMethod {
        self.interval.method
    }

    #[must_use]
    pub fn uses_fallback_interval(&self) -> bool {
        self.interval.method.is_fallback()
    }
}

/// Presentation order of a list of [`GroupStatistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrder {
    #[default]
    Protocol,
    MeanAscending,
    MeanDescending,
}

impl GroupOrder {
    /// Sorts `groups` in place. Ties on the mean fall back to the protocol name.
    pub fn sort(self, groups: &mut [GroupStatistics]) {
        let by_name = |a: &GroupStatistics, b: &GroupStatistics| a.protocol.cmp(&b.protocol);
        match self {
            GroupOrder::Protocol => groups.sort_by(by_name),
            GroupOrder::MeanAscending => {
                groups.sort_by(|a, b| a.mean.total_cmp(&b.mean).then_with(|| by_name(a, b)));
            }
            GroupOrder::MeanDescending => {
                groups.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| by_name(a, b)));
            }
        }
    }

    /// Returns a sorted copy.
    #[must_use]
    pub fn sorted(self, groups: &[GroupStatistics]) -> Vec<GroupStatistics> {
        let mut groups = groups.to_vec();
        self.sort(&mut groups);
        groups
    }
}

#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("unknown sort order '{name}' (expected protocol, mean or mean-desc)")]
pub struct UnknownGroupOrderError {
    pub name: String,
}

impl FromStr for GroupOrder {
    type Err = UnknownGroupOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "protocol" | "name" => Ok(GroupOrder::Protocol),
            "mean" | "mean-asc" | "ascending" => Ok(GroupOrder::MeanAscending),
            "mean-desc" | "descending" => Ok(GroupOrder::MeanDescending),
            _ => Err(UnknownGroupOrderError { name: s.to_owned() }),
        }
    }
}
