//! Comparison of the current experiment against the results of a prior one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{group::GroupStatistics, hypothesis::HypothesisTestResult};

/// Per-protocol mean overhead (and optionally the ANOVA p-value) observed
/// in an earlier experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceValues {
    #[serde(default = "ReferenceValues::default_label")]
    pub label: String,
    #[serde(default)]
    pub p_value: Option<f64>,
    /// Keyed by protocol label; matched case-insensitively.
    pub means: BTreeMap<String, f64>,
}

impl ReferenceValues {
    fn default_label() -> String {
        "reference".to_owned()
    }

    fn mean_of(&self, protocol: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(protocol))
            .map(|(_, mean)| *mean)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub protocol: String,
    pub observed_mean: f64,
    /// `None` when the reference has no value for this protocol.
    pub reference_mean: Option<f64>,
    /// `observed_mean - reference_mean`
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceComparison {
    pub label: String,
    pub rows: Vec<ReferenceRow>,
    pub observed_p_value: Option<f64>,
    pub reference_p_value: Option<f64>,
    /// Whether the current experiment and the reference reach the same
    /// differ/invariant conclusion at `alpha`. `None` if either p-value is unknown.
    pub verdicts_agree: Option<bool>,
}

impl ReferenceComparison {
    #[must_use]
    pub fn compare(
        reference: &ReferenceValues,
        groups: &[GroupStatistics],
        test: Option<&HypothesisTestResult>,
    ) -> Self {
        let rows = groups
            .iter()
            .map(|group| {
                let reference_mean = reference.mean_of(&group.protocol);
                ReferenceRow {
                    protocol: group.protocol.clone(),
                    observed_mean: group.mean,
                    reference_mean,
                    delta: reference_mean.map(|r| group.mean - r),
                }
            })
            .collect();

        let verdicts_agree = test.zip(reference.p_value).map(|(test, reference_p)| {
            test.significant == (reference_p < test.alpha)
        });

        Self {
            label: reference.label.clone(),
            rows,
            observed_p_value: test.map(|t| t.p_value),
            reference_p_value: reference.p_value,
            verdicts_agree,
        }
    }

    /// "DIFFER" or "INVARIANT" for a p-value at `alpha`.
    #[must_use]
    pub fn conclusion(p_value: f64, alpha: f64) -> &'static str {
        if p_value < alpha { "DIFFER" } else { "INVARIANT" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metric;

    fn reference() -> ReferenceValues {
        serde_json::from_str(
            r#"{
                "label": "dual-layer",
                "p_value": 0.837,
                "means": { "aodv": 0.220, "DSDV": 0.205 }
            }"#,
        )
        .unwrap()
    }

    fn group(protocol: &str, values: &[f64]) -> GroupStatistics {
        GroupStatistics::from_values(protocol, Metric::Overhead, values.to_vec()).unwrap()
    }

    fn significant_test() -> HypothesisTestResult {
        HypothesisTestResult {
            metric: Metric::Overhead,
            protocols: vec![],
            f_statistic: 1200.0,
            p_value: 1e-8,
            significant: true,
            alpha: 0.05,
            df_between: 2,
            df_within: 6,
            ss_between: 0.24,
            ss_within: 6e-4,
        }
    }

    #[test]
    fn test_rows_and_missing_protocols() {
        let groups = [
            group("AODV", &[0.09, 0.10, 0.11]),
            group("DSDV", &[0.29, 0.30, 0.31]),
            group("OLSR", &[0.49, 0.50, 0.51]),
        ];
        let comparison = ReferenceComparison::compare(&reference(), &groups, None);

        assert_eq!(comparison.label, "dual-layer");
        assert_eq!(comparison.rows.len(), 3);
        assert_eq!(comparison.rows[0].reference_mean, Some(0.220));
        assert!((comparison.rows[0].delta.unwrap() - (0.10 - 0.220)).abs() < 1e-12);
        assert_eq!(comparison.rows[2].reference_mean, None);
        assert_eq!(comparison.rows[2].delta, None);
        assert_eq!(comparison.verdicts_agree, None);
    }

    #[test]
    fn test_verdict_agreement() {
        let groups = [group("AODV", &[0.1, 0.2])];
        let test = significant_test();
        let comparison = ReferenceComparison::compare(&reference(), &groups, Some(&test));
        assert_eq!(comparison.observed_p_value, Some(1e-8));
        assert_eq!(comparison.reference_p_value, Some(0.837));
        assert_eq!(comparison.verdicts_agree, Some(false));

        let mut same = reference();
        same.p_value = Some(0.01);
        let comparison = ReferenceComparison::compare(&same, &groups, Some(&test));
        assert_eq!(comparison.verdicts_agree, Some(true));
    }

    #[test]
    fn test_label_defaults() {
        let reference: ReferenceValues = serde_json::from_str(r#"{ "means": {} }"#).unwrap();
        assert_eq!(reference.label, "reference");
        assert_eq!(reference.p_value, None);
        assert_eq!(ReferenceComparison::conclusion(0.837, 0.05), "INVARIANT");
        assert_eq!(ReferenceComparison::conclusion(0.01, 0.05), "DIFFER");
    }
}
