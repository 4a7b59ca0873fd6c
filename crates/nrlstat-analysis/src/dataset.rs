//! Dataset assembly from a directory of per-run result files.
//!
//! ```text
//! results/
//! ├─ ground_only_aodv_1.csv   ─┐
//! ├─ ground_only_aodv_2.csv    │ matched by the filename pattern,
//! ├─ ground_only_dsdv_1.csv    │ loaded in lexicographic order
//! ├─ ...                      ─┘
//! └─ notes.txt                   ignored
//! ```
//!
//! A file that cannot be loaded is reported as a warning and skipped; the
//! batch only fails when nothing usable remains, and then with a cause that
//! tells the operator what to fix.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    pattern::FilenamePattern,
    record::{Metric, RecordError, RunRecord},
    reporter::Reporter,
};

/// Relative disagreement between `nrl` and `control / data` above which a
/// record is flagged in the diagnostics.
const DERIVED_OVERHEAD_TOLERANCE: f64 = 1e-6;

/// A result file that was excluded from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl From<&RecordError> for SkippedFile {
    fn from(err: &RecordError) -> Self {
        Self {
            path: err.path().to_owned(),
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum EmptyDatasetError {
    #[display("results directory not found: {}", dir.display())]
    DirectoryMissing { dir: PathBuf },
    #[display("failed to list results directory {}: {source}", dir.display())]
    DirectoryUnreadable { dir: PathBuf, source: io::Error },
    #[display("no files matching '{pattern}' in {}", dir.display())]
    NoMatchingFiles { dir: PathBuf, pattern: String },
    #[display(
        "none of the {} file(s) matching '{pattern}' in {} could be loaded",
        failures.len(),
        dir.display()
    )]
    AllMalformed {
        dir: PathBuf,
        pattern: String,
        failures: Vec<SkippedFile>,
    },
}

impl EmptyDatasetError {
    /// What the operator should check to resolve the error.
    #[must_use]
    pub fn remedy(&self) -> &'static str {
        match self {
            EmptyDatasetError::DirectoryMissing { .. } => {
                "check the input directory, or run the simulations that produce it"
            }
            EmptyDatasetError::DirectoryUnreadable { .. } => {
                "check the permissions of the input directory"
            }
            EmptyDatasetError::NoMatchingFiles { .. } => {
                "check the filename pattern against the files in the input directory"
            }
            EmptyDatasetError::AllMalformed { .. } => {
                "inspect the per-file warnings; the result files are not in metric,value format"
            }
        }
    }
}

/// All successfully loaded run records of one experiment.
///
/// Built once and never mutated afterwards; every statistic is a pure
/// function of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<RunRecord>,
    skipped: Vec<SkippedFile>,
}

impl Dataset {
    #[must_use]
    pub fn from_records(records: Vec<RunRecord>) -> Self {
        Self {
            records,
            skipped: vec![],
        }
    }

    /// Loads every file in `dir` whose name matches `pattern`.
    pub fn assemble(
        dir: &Path,
        pattern: &FilenamePattern,
        reporter: &mut dyn Reporter,
    ) -> Result<Self, EmptyDatasetError> {
        if !dir.is_dir() {
            return Err(EmptyDatasetError::DirectoryMissing {
                dir: dir.to_owned(),
            });
        }

        let files = list_matching_files(dir, pattern).map_err(|source| {
            EmptyDatasetError::DirectoryUnreadable {
                dir: dir.to_owned(),
                source,
            }
        })?;
        if files.is_empty() {
            return Err(EmptyDatasetError::NoMatchingFiles {
                dir: dir.to_owned(),
                pattern: pattern.to_string(),
            });
        }
        reporter.debug(&format!(
            "found {} file(s) matching '{pattern}' in {}",
            files.len(),
            dir.display()
        ));

        let mut records = vec![];
        let mut skipped = vec![];
        for path in &files {
            match RunRecord::load(path) {
                Ok(record) => records.push(record),
                Err(err) => {
                    reporter.warning(&format!("skipping {}: {err}", display_name(path)));
                    skipped.push(SkippedFile::from(&err));
                }
            }
        }

        if records.is_empty() {
            return Err(EmptyDatasetError::AllMalformed {
                dir: dir.to_owned(),
                pattern: pattern.to_string(),
                failures: skipped,
            });
        }

        let dataset = Self { records, skipped };
        dataset.check_consistency(reporter);
        reporter.info(&format!(
            "loaded {} of {} file(s) from {}",
            dataset.records.len(),
            files.len(),
            dir.display()
        ));
        Ok(dataset)
    }

    /// Reports duplicated runs and overhead values that disagree with their byte counters.
    fn check_consistency(&self, reporter: &mut dyn Reporter) {
        let mut seen = HashMap::<(&str, u64), &RunRecord>::new();
        for record in &self.records {
            if let Some(first) = seen.insert((record.protocol.as_str(), record.seed), record) {
                reporter.warning(&format!(
                    "duplicate run {} seed {} ({} and {}); both are included in the statistics",
                    record.protocol,
                    record.seed,
                    source_name(first),
                    source_name(record),
                ));
            }

            if let Some(derived) = record.derived_overhead() {
                let scale = record.overhead.abs().max(derived.abs()).max(f64::MIN_POSITIVE);
                if (record.overhead - derived).abs() / scale > DERIVED_OVERHEAD_TOLERANCE {
                    reporter.debug(&format!(
                        "{} seed {}: nrl={} differs from control/data={derived:.6} ({})",
                        record.protocol,
                        record.seed,
                        record.overhead,
                        source_name(record),
                    ));
                }
            }
        }
    }

    #[must_use]
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Files that matched the pattern but could not be loaded.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// `true` when every matching file was loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct protocol labels, sorted.
    #[must_use]
    pub fn protocols(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.protocol.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Values of `metric` grouped by protocol, protocols sorted by name and
    /// values in record order.
    #[must_use]
    pub fn values_by_protocol(&self, metric: Metric) -> BTreeMap<&str, Vec<f64>> {
        let mut map = BTreeMap::<&str, Vec<f64>>::new();
        for record in &self.records {
            map.entry(record.protocol.as_str())
                .or_default()
                .push(record.metric(metric));
        }
        map
    }

    /// Smallest and largest number of seeds (runs) per protocol.
    #[must_use]
    pub fn seed_range_per_protocol(&self) -> Option<(usize, usize)> {
        let counts = self
            .values_by_protocol(Metric::Overhead)
            .into_values()
            .map(|values| values.len());
        counts.fold(None, |acc, n| match acc {
            None => Some((n, n)),
            Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
        })
    }
}

fn list_matching_files(dir: &Path, pattern: &FilenamePattern) -> io::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if pattern.matches(name) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn source_name(record: &RunRecord) -> String {
    record
        .source
        .as_deref()
        .map_or_else(|| "in-memory".to_owned(), display_name)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::reporter::{CollectingReporter, NullReporter, Severity};

    fn write_run(dir: &Path, name: &str, protocol: &str, seed: u64, nrl: &str) {
        let content = format!(
            "metric,value\nground_routing,{protocol}\nseed,{seed}\n\
             pdr,95.0\navg_delay_ms,40.0\nnrl,{nrl}\n"
        );
        fs::write(dir.join(name), content).unwrap();
    }

    fn pattern(glob: &str) -> FilenamePattern {
        FilenamePattern::new(glob).unwrap()
    }

    #[test]
    fn test_one_malformed_file_among_valid_ones() {
        let dir = TempDir::new().unwrap();
        let mut index = 0;
        for protocol in ["aodv", "dsdv", "olsr"] {
            for seed in 1..=3 {
                index += 1;
                write_run(dir.path(), &format!("run_{index:02}.csv"), protocol, seed, "0.2");
            }
        }
        write_run(dir.path(), "run_10.csv", "aodv", 4, "not-a-number");

        let mut reporter = CollectingReporter::new();
        let dataset = Dataset::assemble(dir.path(), &pattern("run_*.csv"), &mut reporter).unwrap();

        assert_eq!(dataset.len(), 9);
        assert_eq!(reporter.count(Severity::Warning), 1);
        assert!(
            reporter
                .with_severity(Severity::Warning)
                .all(|m| m.contains("run_10.csv") && m.contains("nrl"))
        );
        assert!(!dataset.is_complete());
        assert_eq!(dataset.skipped().len(), 1);
        assert!(dataset.skipped()[0].path.ends_with("run_10.csv"));
    }

    #[test]
    fn test_files_are_loaded_in_lexicographic_order() {
        let dir = TempDir::new().unwrap();
        write_run(dir.path(), "b.csv", "dsdv", 1, "0.2");
        write_run(dir.path(), "c.csv", "olsr", 1, "0.2");
        write_run(dir.path(), "a.csv", "aodv", 1, "0.2");

        let dataset = Dataset::assemble(dir.path(), &pattern("*.csv"), &mut NullReporter).unwrap();
        let protocols = dataset
            .records()
            .iter()
            .map(|r| r.protocol.as_str())
            .collect::<Vec<_>>();
        assert_eq!(protocols, ["AODV", "DSDV", "OLSR"]);
        assert!(dataset.is_complete());
    }

    #[test]
    fn test_non_matching_files_and_directories_are_ignored() {
        let dir = TempDir::new().unwrap();
        write_run(dir.path(), "ground_only_1.csv", "aodv", 1, "0.2");
        write_run(dir.path(), "dual_layer_1.csv", "aodv", 1, "0.9");
        fs::write(dir.path().join("notes.txt"), "not a result").unwrap();
        fs::create_dir(dir.path().join("ground_only_dir.csv")).unwrap();

        let dataset =
            Dataset::assemble(dir.path(), &pattern("ground_only_*.csv"), &mut NullReporter)
                .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].overhead, 0.2);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = Dataset::assemble(&missing, &pattern("*.csv"), &mut NullReporter).unwrap_err();
        assert!(err.is_directory_missing(), "unexpected error: {err}");
    }

    #[test]
    fn test_no_matching_files() {
        let dir = TempDir::new().unwrap();
        write_run(dir.path(), "other.csv", "aodv", 1, "0.2");
        let err = Dataset::assemble(dir.path(), &pattern("ground_*.csv"), &mut NullReporter)
            .unwrap_err();
        assert!(err.is_no_matching_files(), "unexpected error: {err}");
        assert!(err.to_string().contains("ground_*.csv"));
    }

    #[test]
    fn test_all_files_malformed() {
        let dir = TempDir::new().unwrap();
        write_run(dir.path(), "a.csv", "aodv", 1, "x");
        fs::write(dir.path().join("b.csv"), "garbage").unwrap();

        let mut reporter = CollectingReporter::new();
        let err = Dataset::assemble(dir.path(), &pattern("*.csv"), &mut reporter).unwrap_err();
        match &err {
            EmptyDatasetError::AllMalformed { failures, .. } => assert_eq!(failures.len(), 2),
            _ => panic!("unexpected error: {err}"),
        }
        assert_eq!(reporter.count(Severity::Warning), 2);
        assert!(err.remedy().contains("warnings"));
    }

    #[test]
    fn test_duplicate_runs_are_reported() {
        let dir = TempDir::new().unwrap();
        write_run(dir.path(), "a.csv", "aodv", 1, "0.2");
        write_run(dir.path(), "b.csv", "AODV", 1, "0.3");

        let mut reporter = CollectingReporter::new();
        let dataset = Dataset::assemble(dir.path(), &pattern("*.csv"), &mut reporter).unwrap();
        assert_eq!(dataset.len(), 2);
        let warnings = reporter.with_severity(Severity::Warning).collect::<Vec<_>>();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("duplicate run AODV seed 1"));
    }

    #[test]
    fn test_grouping_accessors() {
        let dataset = Dataset::from_records(vec![
            RunRecord::new("olsr", 1, 0.18, 90.0, 30.0),
            RunRecord::new("aodv", 1, 0.20, 91.0, 31.0),
            RunRecord::new("aodv", 2, 0.22, 92.0, 32.0),
        ]);
        assert_eq!(dataset.protocols(), ["AODV", "OLSR"]);

        let values = dataset.values_by_protocol(Metric::Overhead);
        assert_eq!(values["AODV"], [0.20, 0.22]);
        assert_eq!(values["OLSR"], [0.18]);

        let delays = dataset.values_by_protocol(Metric::MeanDelay);
        assert_eq!(delays["AODV"], [31.0, 32.0]);

        assert_eq!(dataset.seed_range_per_protocol(), Some((1, 2)));
        assert_eq!(Dataset::default().seed_range_per_protocol(), None);
    }
}
