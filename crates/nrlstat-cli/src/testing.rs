//! Fixtures shared by the unit tests of this binary.

use nrlstat_analysis::{
    config::AnalysisConfig,
    dataset::Dataset,
    pipeline::{AnalysisOutcome, AnalysisPipeline},
    record::RunRecord,
    reporter::NullReporter,
};

/// Three protocols, three seeds each, with clearly separated overhead means.
pub(crate) fn sample_records() -> Vec<RunRecord> {
    let mut records = vec![];
    for (protocol, values) in [
        ("aodv", [0.09, 0.10, 0.11]),
        ("dsdv", [0.29, 0.30, 0.31]),
        ("olsr", [0.49, 0.50, 0.51]),
    ] {
        for (seed, nrl) in (1..).zip(values) {
            records.push(RunRecord::new(protocol, seed, nrl, 90.0 + nrl, 40.0));
        }
    }
    records
}

pub(crate) fn sample_outcome(config: AnalysisConfig) -> AnalysisOutcome {
    let dataset = Dataset::from_records(sample_records());
    AnalysisPipeline::new(config).analyze(dataset, &mut NullReporter)
}
