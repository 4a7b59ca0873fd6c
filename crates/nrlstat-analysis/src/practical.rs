//! Practical significance: is the spread of protocol means large enough to matter?

use serde::{Deserialize, Serialize};

use crate::group::GroupStatistics;

/// Absolute difference between the highest and lowest mean overhead below
/// which a difference is considered negligible.
pub const DEFAULT_PRACTICAL_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticalSignificance {
    pub highest_protocol: String,
    pub highest_mean: f64,
    pub lowest_protocol: String,
    pub lowest_mean: f64,
    /// `highest_mean - lowest_mean`
    pub difference: f64,
    /// `highest_mean / lowest_mean`, infinite when the lowest mean is not positive.
    pub ratio: f64,
    pub threshold: f64,
    /// `difference > threshold`
    pub matters: bool,
}

impl PracticalSignificance {
    /// Compares the extreme group means against `threshold`.
    ///
    /// Returns `None` when there are no groups. On ties the protocol that
    /// comes first in `groups` wins.
    #[must_use]
    pub fn evaluate(groups: &[GroupStatistics], threshold: f64) -> Option<Self> {
        let (first, rest) = groups.split_first()?;
        let mut highest = first;
        let mut lowest = first;
        for group in rest {
            if group.mean > highest.mean {
                highest = group;
            }
            if group.mean < lowest.mean {
                lowest = group;
            }
        }

        let difference = highest.mean - lowest.mean;
        let ratio = if lowest.mean > 0.0 {
            highest.mean / lowest.mean
        } else {
            f64::INFINITY
        };
        Some(Self {
            highest_protocol: highest.protocol.clone(),
            highest_mean: highest.mean,
            lowest_protocol: lowest.protocol.clone(),
            lowest_mean: lowest.mean,
            difference,
            ratio,
            threshold,
            matters: difference > threshold,
        })
    }

    /// How much lower the lowest mean is than the highest, in percent.
    #[must_use]
    pub fn relative_reduction_percent(&self) -> f64 {
        if self.highest_mean > 0.0 {
            (1.0 - self.lowest_mean / self.highest_mean) * 100.0
        } else {
            0.0
        }
    }
}
