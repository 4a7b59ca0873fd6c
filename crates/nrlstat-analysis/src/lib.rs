//! Routing-overhead analysis of network simulation results
//!
//! This crate turns a directory of per-run simulation outputs into
//! per-protocol statistics, a hypothesis test, and a rule-based verdict on
//! whether the protocols differ in routing overhead.
//!
//! # Overview
//!
//! 1. **Load Records** ([`record::RunRecord`]): Parse one `metric,value` file per run
//! 2. **Assemble Dataset** ([`dataset::Dataset`]): Collect every matching file, skipping
//!    malformed ones
//! 3. **Summarize Groups** ([`group::GroupStatistics`]): Mean, spread and 95% confidence
//!    interval per protocol
//! 4. **Test Means** ([`hypothesis::HypothesisTestResult`]): One-way ANOVA across protocols
//! 5. **Gate Effect Size** ([`practical::PracticalSignificance`]): Is the spread large enough
//!    to matter?
//! 6. **Interpret** ([`interpretation::Verdict`]): Combine both answers
//!
//! [`pipeline::AnalysisPipeline`] runs all stages from an
//! [`config::AnalysisConfig`]. Diagnostics go through a [`reporter::Reporter`];
//! this crate never prints.
//!
//! # Examples
//!
//! ```
//! use nrlstat_analysis::{
//!     config::AnalysisConfig, dataset::Dataset, pipeline::AnalysisPipeline,
//!     record::RunRecord, reporter::NullReporter,
//! };
//!
//! let mut records = vec![];
//! for (protocol, values) in [("aodv", [0.09, 0.10, 0.11]), ("olsr", [0.49, 0.50, 0.51])] {
//!     for (seed, nrl) in (1..).zip(values) {
//!         records.push(RunRecord::new(protocol, seed, nrl, 95.0, 40.0));
//!     }
//! }
//!
//! let pipeline = AnalysisPipeline::new(AnalysisConfig::default());
//! let outcome = pipeline.analyze(Dataset::from_records(records), &mut NullReporter);
//! assert!(outcome.test.unwrap().significant);
//! assert!(outcome.verdict.is_differ_and_matters());
//! ```

pub mod config;
pub mod dataset;
pub mod group;
pub mod hypothesis;
pub mod interpretation;
pub mod pattern;
pub mod pipeline;
pub mod practical;
pub mod record;
pub mod reference;
pub mod reporter;
