//! Statistical significance of the differences between protocol means.
//!
//! The observations of one metric are grouped by protocol and compared with
//! a one-way ANOVA. The significance level is fixed at
//! [`SIGNIFICANCE_ALPHA`].

use nrlstat_stats::anova::{AnovaError, OneWayAnova};
use serde::{Deserialize, Serialize};

use crate::{dataset::Dataset, record::Metric};

pub const SIGNIFICANCE_ALPHA: f64 = 0.05;

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display, derive_more::Error,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HypothesisTestError {
    #[display("at least 2 protocols are required for a comparison, found {found}")]
    InsufficientGroups { found: usize },
    #[display("protocol {protocol} has {observations} run(s), at least 2 are required")]
    DegenerateGroup {
        protocol: String,
        observations: usize,
    },
    #[display("every run has the same value; the F statistic is undefined")]
    ZeroVariance,
}

/// Outcome of a one-way ANOVA across protocols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisTestResult {
    pub metric: Metric,
    /// Protocols compared, sorted by name.
    pub protocols: Vec<String>,
    pub f_statistic: f64,
    pub p_value: f64,
    /// `p_value < alpha`
    pub significant: bool,
    pub alpha: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
}

impl HypothesisTestResult {
    /// Tests whether the protocol means of `metric` differ.
    pub fn one_way_anova(dataset: &Dataset, metric: Metric) -> Result<Self, HypothesisTestError> {
        let groups = dataset.values_by_protocol(metric);
        if groups.len() < 2 {
            return Err(HypothesisTestError::InsufficientGroups {
                found: groups.len(),
            });
        }
        if let Some((protocol, values)) = groups.iter().find(|(_, values)| values.len() < 2) {
            return Err(HypothesisTestError::DegenerateGroup {
                protocol: (*protocol).to_owned(),
                observations: values.len(),
            });
        }

        let protocols = groups.keys().map(|p| (*p).to_owned()).collect::<Vec<_>>();
        let values = groups.into_values().collect::<Vec<_>>();
        let anova = OneWayAnova::from_groups(&values).map_err(|err| match err {
            AnovaError::TooFewGroups { found } => HypothesisTestError::InsufficientGroups { found },
            AnovaError::GroupTooSmall { index, len } => HypothesisTestError::DegenerateGroup {
                protocol: protocols[index].clone(),
                observations: len,
            },
            AnovaError::ZeroVariance => HypothesisTestError::ZeroVariance,
        })?;

        Ok(Self {
            metric,
            protocols,
            f_statistic: anova.f_statistic,
            p_value: anova.p_value,
            significant: anova.is_significant(SIGNIFICANCE_ALPHA),
            alpha: SIGNIFICANCE_ALPHA,
            df_between: anova.df_between,
            df_within: anova.df_within,
            ss_between: anova.ss_between,
            ss_within: anova.ss_within,
        })
    }
}
