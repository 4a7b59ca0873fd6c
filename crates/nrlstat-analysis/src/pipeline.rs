//! The complete analysis: assemble, summarize, test, gate, interpret.

use serde::Serialize;

use crate::{
    config::{AnalysisConfig, ConfigError},
    dataset::{Dataset, EmptyDatasetError},
    group::{GroupOrder, GroupStatistics},
    hypothesis::{HypothesisTestError, HypothesisTestResult},
    interpretation::Verdict,
    practical::PracticalSignificance,
    record::Metric,
    reference::ReferenceComparison,
    reporter::{NullReporter, Reporter},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PipelineError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("{_0}")]
    Dataset(EmptyDatasetError),
}

/// Everything computed from one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub dataset: Dataset,
    /// Overhead statistics per protocol, ordered by protocol name.
    pub overhead: Vec<GroupStatistics>,
    pub delivery_ratio: Vec<GroupStatistics>,
    pub mean_delay: Vec<GroupStatistics>,
    /// ANOVA over the overhead metric. A failure here does not fail the analysis.
    pub test: Result<HypothesisTestResult, HypothesisTestError>,
    pub practical: Option<PracticalSignificance>,
    pub reference: Option<ReferenceComparison>,
    pub verdict: Verdict,
}

impl AnalysisOutcome {
    #[must_use]
    pub fn groups(&self, metric: Metric) -> &[GroupStatistics] {
        match metric {
            Metric::Overhead => &self.overhead,
            Metric::DeliveryRatio => &self.delivery_ratio,
            Metric::MeanDelay => &self.mean_delay,
        }
    }

    /// Overhead statistics from lowest to highest mean.
    #[must_use]
    pub fn ranking(&self) -> Vec<GroupStatistics> {
        GroupOrder::MeanAscending.sorted(&self.overhead)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Loads the configured input directory and analyzes it.
    ///
    /// Only configuration and dataset assembly errors are fatal.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<AnalysisOutcome, PipelineError> {
        let pattern = self.config.validate().map_err(PipelineError::Config)?;
        let dataset = Dataset::assemble(&self.config.input_directory, &pattern, reporter)
            .map_err(PipelineError::Dataset)?;
        Ok(self.analyze(dataset, reporter))
    }

    /// Analyzes an already assembled dataset.
    pub fn analyze(&self, dataset: Dataset, reporter: &mut dyn Reporter) -> AnalysisOutcome {
        let overhead = GroupStatistics::compute(&dataset, Metric::Overhead, reporter);
        // Single-run groups were already reported for the primary metric.
        let delivery_ratio =
            GroupStatistics::compute(&dataset, Metric::DeliveryRatio, &mut NullReporter);
        let mean_delay = GroupStatistics::compute(&dataset, Metric::MeanDelay, &mut NullReporter);

        let test = HypothesisTestResult::one_way_anova(&dataset, Metric::Overhead);
        match &test {
            Ok(result) => reporter.debug(&format!(
                "ANOVA over {} protocol(s): F({}, {}) = {:.4}, p = {:.6}",
                result.protocols.len(),
                result.df_between,
                result.df_within,
                result.f_statistic,
                result.p_value,
            )),
            Err(err) => reporter.warning(&format!("hypothesis test skipped: {err}")),
        }

        let practical = PracticalSignificance::evaluate(&overhead, self.config.practical_threshold);
        let reference = self.config.reference.as_ref().map(|reference| {
            ReferenceComparison::compare(reference, &overhead, test.as_ref().ok())
        });
        let verdict = Verdict::decide(test.as_ref(), practical.as_ref());
        reporter.info(&format!("verdict: {verdict}"));

        AnalysisOutcome {
            dataset,
            overhead,
            delivery_ratio,
            mean_delay,
            test,
            practical,
            reference,
            verdict,
        }
    }
}
