//! One-way analysis of variance.
//!
//! Tests whether two or more independent groups share the same population
//! mean by comparing between-group to within-group variability:
//!
//! ```text
//! F = (SS_between / (k - 1)) / (SS_within / (N - k))
//! ```
//!
//! The p-value is the upper tail of the F-distribution with `(k - 1, N - k)`
//! degrees of freedom.

use serde::{Deserialize, Serialize};

use crate::distribution::FisherF;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnovaError {
    #[display("ANOVA requires at least 2 groups, got {found}")]
    TooFewGroups { found: usize },
    #[display("group #{index} has {len} observation(s); ANOVA requires at least 2 per group")]
    GroupTooSmall { index: usize, len: usize },
    #[display("all observations are identical; the F statistic is undefined")]
    ZeroVariance,
}

/// Result of a one-way ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneWayAnova {
    pub f_statistic: f64,
    pub p_value: f64,
    /// `k - 1`
    pub df_between: usize,
    /// `N - k`
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
    pub grand_mean: f64,
}

impl OneWayAnova {
    /// Runs the test over the given groups of observations.
    ///
    /// Every group needs at least two observations. When the within-group sum
    /// of squares is exactly zero but the group means differ, the result is
    /// the limiting case `F = ∞`, `p = 0`; when the group means are equal as
    /// well, [`AnovaError::ZeroVariance`] is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use nrlstat_stats::anova::OneWayAnova;
    ///
    /// let groups = [vec![0.09, 0.10, 0.11], vec![0.29, 0.30, 0.31], vec![0.49, 0.50, 0.51]];
    /// let anova = OneWayAnova::from_groups(&groups).unwrap();
    /// assert_eq!(anova.df_between, 2);
    /// assert_eq!(anova.df_within, 6);
    /// assert!(anova.p_value < 0.001);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn from_groups<G>(groups: &[G]) -> Result<Self, AnovaError>
    where
        G: AsRef<[f64]>,
    {
        if groups.len() < 2 {
            return Err(AnovaError::TooFewGroups {
                found: groups.len(),
            });
        }
        if let Some((index, group)) = groups
            .iter()
            .enumerate()
            .find(|(_, g)| g.as_ref().len() < 2)
        {
            return Err(AnovaError::GroupTooSmall {
                index,
                len: group.as_ref().len(),
            });
        }

        let total_count = groups.iter().map(|g| g.as_ref().len()).sum::<usize>();
        // Constancy is decided on the raw values; `sum / n` of a repeated value
        // is not exact in general.
        let first = groups[0].as_ref()[0];
        let grand_mean = if groups.iter().all(|g| is_constant(g.as_ref(), first)) {
            first
        } else {
            groups
                .iter()
                .flat_map(|g| g.as_ref().iter())
                .sum::<f64>()
                / total_count as f64
        };

        let mut ss_between = 0.0;
        let mut ss_within = 0.0;
        for group in groups {
            let group = group.as_ref();
            let n = group.len() as f64;
            if is_constant(group, group[0]) {
                ss_between += n * (group[0] - grand_mean).powi(2);
                continue;
            }
            let mean = group.iter().sum::<f64>() / n;
            ss_between += n * (mean - grand_mean).powi(2);
            ss_within += group.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        }

        let df_between = groups.len() - 1;
        let df_within = total_count - groups.len();

        let f_statistic = if ss_within > 0.0 {
            (ss_between / df_between as f64) / (ss_within / df_within as f64)
        } else if ss_between > 0.0 {
            f64::INFINITY
        } else {
            return Err(AnovaError::ZeroVariance);
        };

        // Both degrees of freedom are >= 1 here: k >= 2 and every group has n >= 2.
        let p_value = FisherF::new(df_between as f64, df_within as f64)
            .map_or(f64::NAN, |dist| dist.sf(f_statistic));

        Ok(Self {
            f_statistic,
            p_value,
            df_between,
            df_within,
            ss_between,
            ss_within,
            grand_mean,
        })
    }

    /// Whether the null hypothesis of equal means is rejected at `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[expect(clippy::float_cmp)]
fn is_constant(values: &[f64], value: f64) -> bool {
    values.iter().all(|v| *v == value)
}
