//! Per-run result records and their loader.
//!
//! Every simulation run writes one CSV file with a `metric,value` header and
//! one row per metric:
//!
//! ```text
//! metric,value
//! ground_routing,aodv
//! seed,3
//! pdr,97.4
//! avg_delay_ms,41.2
//! nrl,0.2213
//! data_bytes_tx,1843200
//! control_bytes_tx,407900
//! ```
//!
//! [`MetricTable`] reads that file into a key/value map and
//! [`RunRecord::from_table`] projects the map into typed fields.

use std::{
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Keys accepted for the protocol label, in lookup order.
pub const PROTOCOL_KEYS: [&str; 2] = ["ground_routing", "protocol"];
pub const SEED_KEY: &str = "seed";
pub const OVERHEAD_KEY: &str = "nrl";
pub const DELIVERY_RATIO_KEY: &str = "pdr";
pub const MEAN_DELAY_KEY: &str = "avg_delay_ms";
pub const DATA_BYTES_KEY: &str = "data_bytes_tx";
pub const CONTROL_BYTES_KEY: &str = "control_bytes_tx";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse {} as a metric table: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[display("{}: missing required field '{key}'", path.display())]
    MissingField { path: PathBuf, key: String },
    #[display("{}: malformed field '{field}' (value {value:?}): {reason}", path.display())]
    MalformedRecord {
        path: PathBuf,
        field: String,
        value: String,
        reason: String,
    },
}

impl RecordError {
    /// The file the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            RecordError::Io { path, .. }
            | RecordError::Csv { path, .. }
            | RecordError::MissingField { path, .. }
            | RecordError::MalformedRecord { path, .. } => path,
        }
    }
}

/// Numeric fields of a [`RunRecord`] that can be summarized per protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Normalized routing load (control traffic relative to data traffic).
    Overhead,
    /// Packet delivery ratio.
    DeliveryRatio,
    /// Average end-to-end delay in milliseconds.
    MeanDelay,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Overhead, Metric::DeliveryRatio, Metric::MeanDelay];

    /// The key of this metric in a result file.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Metric::Overhead => OVERHEAD_KEY,
            Metric::DeliveryRatio => DELIVERY_RATIO_KEY,
            Metric::MeanDelay => MEAN_DELAY_KEY,
        }
    }

    /// Short display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Overhead => "NRL",
            Metric::DeliveryRatio => "PDR",
            Metric::MeanDelay => "Delay (ms)",
        }
    }

    /// Long, human-readable name.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Metric::Overhead => "NRL (Normalized Routing Load)",
            Metric::DeliveryRatio => "PDR (Packet Delivery Ratio)",
            Metric::MeanDelay => "Average delay (ms)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.label(), f)
    }
}

#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("unknown metric '{name}' (expected one of: nrl, pdr, delay)")]
pub struct UnknownMetricError {
    pub name: String,
}

impl FromStr for Metric {
    type Err = UnknownMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nrl" | "overhead" => Ok(Metric::Overhead),
            "pdr" | "delivery" | "delivery_ratio" => Ok(Metric::DeliveryRatio),
            "delay" | "avg_delay_ms" | "mean_delay" => Ok(Metric::MeanDelay),
            _ => Err(UnknownMetricError { name: s.to_owned() }),
        }
    }
}

/// The raw `metric -> value` contents of one result file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricTable {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl MetricTable {
    /// Reads a `metric,value` table.
    ///
    /// `path` is only used for error messages. Fields are trimmed; when a
    /// metric appears twice the later row wins.
    pub fn from_reader<R>(path: &Path, reader: R) -> Result<Self, RecordError>
    where
        R: Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let csv_error = |source| RecordError::Csv {
            path: path.to_owned(),
            source,
        };

        let headers = reader.headers().map_err(csv_error)?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let (Some(metric_col), Some(value_col)) = (column("metric"), column("value")) else {
            return Err(RecordError::MalformedRecord {
                path: path.to_owned(),
                field: "header".to_owned(),
                value: headers.iter().collect::<Vec<_>>().join(","),
                reason: "expected columns 'metric' and 'value'".to_owned(),
            });
        };

        let mut entries = BTreeMap::new();
        for row in reader.records() {
            let row = row.map_err(csv_error)?;
            if let (Some(metric), Some(value)) = (row.get(metric_col), row.get(value_col)) {
                entries.insert(metric.to_owned(), value.to_owned());
            }
        }

        Ok(Self {
            path: path.to_owned(),
            entries,
        })
    }

    /// Opens and reads a result file.
    pub fn open(path: &Path) -> Result<Self, RecordError> {
        let file = File::open(path).map_err(|source| RecordError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(path, BufReader::new(file))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require(&self, key: &str) -> Result<&str, RecordError> {
        self.get(key).ok_or_else(|| RecordError::MissingField {
            path: self.path.clone(),
            key: key.to_owned(),
        })
    }

    fn parse_as<T>(&self, key: &str, raw: &str) -> Result<T, RecordError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        raw.parse::<T>()
            .map_err(|e| self.malformed(key, raw, e.to_string()))
    }

    fn malformed(&self, key: &str, raw: &str, reason: String) -> RecordError {
        RecordError::MalformedRecord {
            path: self.path.clone(),
            field: key.to_owned(),
            value: raw.to_owned(),
            reason,
        }
    }

    fn required<T>(&self, key: &str) -> Result<T, RecordError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.require(key)?;
        self.parse_as(key, raw)
    }

    fn optional<T>(&self, key: &str) -> Result<Option<T>, RecordError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key).map(|raw| self.parse_as(key, raw)).transpose()
    }

    fn non_negative(&self, key: &str) -> Result<f64, RecordError> {
        let value = self.required::<f64>(key)?;
        if !value.is_finite() || value < 0.0 {
            let raw = self.get(key).unwrap_or_default();
            return Err(self.malformed(
                key,
                raw,
                "expected a finite, non-negative number".to_owned(),
            ));
        }
        Ok(value)
    }
}

/// One simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Routing protocol label, upper-cased.
    pub protocol: String,
    /// Random seed of the run; unique per protocol within a dataset.
    pub seed: u64,
    /// Normalized routing load.
    pub overhead: f64,
    /// Packet delivery ratio.
    pub delivery_ratio: f64,
    /// Average end-to-end delay in milliseconds.
    pub mean_delay_ms: f64,
    /// Data bytes transmitted, when recorded.
    pub data_bytes: Option<u64>,
    /// Control bytes transmitted, when recorded.
    pub control_bytes: Option<u64>,
    /// File the record was loaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl RunRecord {
    /// Builds a record in memory. The protocol label is upper-cased.
    #[must_use]
    pub fn new(
        protocol: &str,
        seed: u64,
        overhead: f64,
        delivery_ratio: f64,
        mean_delay_ms: f64,
    ) -> Self {
        Self {
            protocol: protocol.trim().to_uppercase(),
            seed,
            overhead,
            delivery_ratio,
            mean_delay_ms,
            data_bytes: None,
            control_bytes: None,
            source: None,
        }
    }

    /// Loads a single result file.
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let table = MetricTable::open(path)?;
        Self::from_table(&table)
    }

    /// Projects a metric table into a typed record.
    pub fn from_table(table: &MetricTable) -> Result<Self, RecordError> {
        let (protocol_key, protocol) = PROTOCOL_KEYS
            .iter()
            .find_map(|key| table.get(key).map(|value| (*key, value)))
            .ok_or_else(|| RecordError::MissingField {
                path: table.path().to_owned(),
                key: PROTOCOL_KEYS[0].to_owned(),
            })?;
        if protocol.is_empty() {
            return Err(table.malformed(
                protocol_key,
                protocol,
                "empty protocol label".to_owned(),
            ));
        }

        let seed = table.required::<u64>(SEED_KEY)?;
        let overhead = table.non_negative(OVERHEAD_KEY)?;
        let delivery_ratio = table.required::<f64>(DELIVERY_RATIO_KEY)?;
        if !delivery_ratio.is_finite() {
            let raw = table.get(DELIVERY_RATIO_KEY).unwrap_or_default();
            return Err(table.malformed(
                DELIVERY_RATIO_KEY,
                raw,
                "expected a finite number".to_owned(),
            ));
        }
        let mean_delay_ms = table.non_negative(MEAN_DELAY_KEY)?;
        let data_bytes = table.optional::<u64>(DATA_BYTES_KEY)?;
        let control_bytes = table.optional::<u64>(CONTROL_BYTES_KEY)?;

        Ok(Self {
            protocol: protocol.to_uppercase(),
            seed,
            overhead,
            delivery_ratio,
            mean_delay_ms,
            data_bytes,
            control_bytes,
            source: Some(table.path().to_owned()),
        })
    }

    #[must_use]
    pub fn with_byte_counters(mut self, data_bytes: u64, control_bytes: u64) -> Self {
        self.data_bytes = Some(data_bytes);
        self.control_bytes = Some(control_bytes);
        self
    }

    /// Value of the given metric.
    #[must_use]
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Overhead => self.overhead,
            Metric::DeliveryRatio => self.delivery_ratio,
            Metric::MeanDelay => self.mean_delay_ms,
        }
    }

    /// Overhead recomputed from the byte counters (`control / data`), when both
    /// are present and data bytes are non-zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn derived_overhead(&self) -> Option<f64> {
        match (self.data_bytes, self.control_bytes) {
            (Some(data), Some(control)) if data > 0 => Some(control as f64 / data as f64),
            _ => None,
        }
    }

    /// Serializes the record back into `metric,value` rows.
    #[must_use]
    pub fn to_metric_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            (PROTOCOL_KEYS[0], self.protocol.to_lowercase()),
            (SEED_KEY, self.seed.to_string()),
            (DELIVERY_RATIO_KEY, self.delivery_ratio.to_string()),
            (MEAN_DELAY_KEY, self.mean_delay_ms.to_string()),
            (OVERHEAD_KEY, self.overhead.to_string()),
        ];
        if let Some(data) = self.data_bytes {
            rows.push((DATA_BYTES_KEY, data.to_string()));
        }
        if let Some(control) = self.control_bytes {
            rows.push((CONTROL_BYTES_KEY, control.to_string()));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use super::*;

    const SAMPLE: &str = "metric,value\n\
        ground_routing,aodv\n\
        seed,3\n\
        pdr,97.4\n\
        avg_delay_ms,41.2\n\
        nrl,0.2213\n\
        data_bytes_tx,1843200\n\
        control_bytes_tx,407900\n";

    fn parse(content: &str) -> Result<RunRecord, RecordError> {
        let table = MetricTable::from_reader(Path::new("run.csv"), content.as_bytes())?;
        RunRecord::from_table(&table)
    }

    #[test]
    fn test_parse_complete_record() {
        let record = parse(SAMPLE).unwrap();
        assert_eq!(record.protocol, "AODV");
        assert_eq!(record.seed, 3);
        assert_eq!(record.overhead, 0.2213);
        assert_eq!(record.delivery_ratio, 97.4);
        assert_eq!(record.mean_delay_ms, 41.2);
        assert_eq!(record.data_bytes, Some(1_843_200));
        assert_eq!(record.control_bytes, Some(407_900));
        assert_eq!(record.source.as_deref(), Some(Path::new("run.csv")));
    }

    #[test]
    fn test_byte_counters_are_optional() {
        let content = "metric,value\nprotocol,olsr\nseed,1\npdr,0.9\navg_delay_ms,10\nnrl,0.2\n";
        let record = parse(content).unwrap();
        assert_eq!(record.protocol, "OLSR");
        assert_eq!(record.data_bytes, None);
        assert_eq!(record.derived_overhead(), None);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let content = "metric , value\n ground_routing , dsdv \n seed , 7 \n\
                       pdr,1\navg_delay_ms,2\nnrl, 0.3 \n";
        let record = parse(content).unwrap();
        assert_eq!(record.protocol, "DSDV");
        assert_eq!(record.seed, 7);
        assert_eq!(record.overhead, 0.3);
    }

    #[test]
    fn test_missing_field() {
        let content = "metric,value\nground_routing,aodv\nseed,1\npdr,0.9\navg_delay_ms,10\n";
        let err = parse(content).unwrap_err();
        assert!(
            matches!(&err, RecordError::MissingField { key, .. } if key == "nrl"),
            "unexpected error: {err}"
        );
        assert!(err.to_string().contains("'nrl'"));
    }

    #[test]
    fn test_missing_protocol() {
        let content = "metric,value\nseed,1\npdr,0.9\navg_delay_ms,10\nnrl,0.2\n";
        let err = parse(content).unwrap_err();
        assert!(matches!(&err, RecordError::MissingField { key, .. } if key == "ground_routing"));
    }

    #[test]
    fn test_empty_protocol_names_the_key_found() {
        for key in ["ground_routing", "protocol"] {
            let content =
                format!("metric,value\n{key},\nseed,1\npdr,0.9\navg_delay_ms,10\nnrl,0.2\n");
            match parse(&content).unwrap_err() {
                RecordError::MalformedRecord { field, value, .. } => {
                    assert_eq!(field, key);
                    assert_eq!(value, "");
                }
                err => panic!("unexpected error: {err}"),
            }
        }
    }

    #[test]
    fn test_non_numeric_overhead_is_malformed() {
        let content = SAMPLE.replace("nrl,0.2213", "nrl,n/a");
        let err = parse(&content).unwrap_err();
        match &err {
            RecordError::MalformedRecord { path, field, value, .. } => {
                assert_eq!(path, Path::new("run.csv"));
                assert_eq!(field, "nrl");
                assert_eq!(value, "n/a");
            }
            _ => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn test_fractional_seed_is_malformed() {
        let content = SAMPLE.replace("seed,3", "seed,3.5");
        assert!(matches!(
            parse(&content),
            Err(RecordError::MalformedRecord { field, .. }) if field == "seed"
        ));
    }

    #[test]
    fn test_negative_overhead_is_malformed() {
        let content = SAMPLE.replace("nrl,0.2213", "nrl,-0.1");
        assert!(matches!(
            parse(&content),
            Err(RecordError::MalformedRecord { field, .. }) if field == "nrl"
        ));
    }

    #[test]
    fn test_missing_header() {
        let content = "name,amount\nnrl,0.2\n";
        assert!(matches!(
            parse(content),
            Err(RecordError::MalformedRecord { field, .. }) if field == "header"
        ));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let content = "metric,value\nnrl,0.2,extra\n";
        assert!(matches!(parse(content), Err(RecordError::Csv { .. })));
    }

    #[test]
    fn test_derived_overhead() {
        let record = parse(SAMPLE).unwrap();
        let derived = record.derived_overhead().unwrap();
        assert!((derived - 407_900.0 / 1_843_200.0).abs() < 1e-15);

        let zero_data = record.clone().with_byte_counters(0, 10);
        assert_eq!(zero_data.derived_overhead(), None);
    }

    #[test]
    fn test_metric_rows_round_trip() {
        let original = parse(SAMPLE).unwrap();
        let mut content = String::from("metric,value\n");
        for (key, value) in original.to_metric_rows() {
            writeln!(content, "{key},{value}").unwrap();
        }
        let reparsed = parse(&content).unwrap();
        for metric in Metric::ALL {
            assert!((reparsed.metric(metric) - original.metric(metric)).abs() <= f64::EPSILON);
        }
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("nrl".parse::<Metric>().unwrap(), Metric::Overhead);
        assert_eq!("PDR".parse::<Metric>().unwrap(), Metric::DeliveryRatio);
        assert_eq!("delay".parse::<Metric>().unwrap(), Metric::MeanDelay);
        assert!("jitter".parse::<Metric>().is_err());
    }
}
