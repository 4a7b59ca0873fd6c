//! Statistical primitives for the nrlstat analysis pipeline.
//!
//! This crate provides the numeric building blocks the analysis crate
//! composes into per-protocol summaries and hypothesis tests:
//!
//! - **Descriptive statistics**: mean, median, sample variance, standard deviation, standard error
//! - **Percentiles**: interpolated percentiles and box-plot summaries
//! - **Distributions**: Student-t and Fisher-F distributions
//! - **Confidence intervals**: t-based 95% intervals for a sample mean
//! - **ANOVA**: one-way analysis of variance across independent groups
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing samples
//! - [`percentiles`]: Percentile computation and box-plot summaries
//! - [`distribution`]: Probability distributions and special functions
//! - [`interval`]: Confidence intervals for a sample mean
//! - [`anova`]: One-way ANOVA
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use nrlstat_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Computing a confidence interval
//!
//! ```
//! use nrlstat_stats::{descriptive::DescriptiveStats, interval::ConfidenceInterval};
//!
//! let stats = DescriptiveStats::new([0.20, 0.22, 0.24]).unwrap();
//! let ci = ConfidenceInterval::for_mean(&stats);
//! assert!(ci.lower <= stats.mean && stats.mean <= ci.upper);
//! ```
//!
//! ## Running a one-way ANOVA
//!
//! ```
//! use nrlstat_stats::anova::OneWayAnova;
//!
//! let groups = [vec![0.20, 0.22, 0.24], vec![0.19, 0.205, 0.22], vec![0.18, 0.20, 0.22]];
//! let anova = OneWayAnova::from_groups(&groups).unwrap();
//! assert!(anova.p_value > 0.05);
//! ```

pub mod anova;
pub mod descriptive;
pub mod distribution;
pub mod interval;
pub mod percentiles;
