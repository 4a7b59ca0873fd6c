//! Diagnostic reporting interface.
//!
//! Pipeline stages never print. Anything an operator should see (skipped
//! files, approximated intervals, failed test stages) goes through a
//! [`Reporter`] as a message with a [`Severity`]; the binary decides how to
//! render it.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        fmt::Display::fmt(s, f)
    }
}

pub trait Reporter {
    fn report(&mut self, severity: Severity, message: &str);

    fn debug(&mut self, message: &str) {
        self.report(Severity::Debug, message);
    }

    fn info(&mut self, message: &str) {
        self.report(Severity::Info, message);
    }

    fn warning(&mut self, message: &str) {
        self.report(Severity::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.report(Severity::Error, message);
    }
}

impl<R> Reporter for &mut R
where
    R: Reporter + ?Sized,
{
    fn report(&mut self, severity: Severity, message: &str) {
        (**self).report(severity, message);
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _severity: Severity, _message: &str) {}
}

/// Keeps every message in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub messages: Vec<(Severity, String)>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &str> + '_ {
        self.messages
            .iter()
            .filter(move |(s, _)| *s == severity)
            .map(|(_, m)| m.as_str())
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, severity: Severity, message: &str) {
        self.messages.push((severity, message.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter_filters_by_severity() {
        let mut reporter = CollectingReporter::new();
        reporter.warning("first");
        reporter.info("second");
        reporter.warning("third");

        assert_eq!(reporter.count(Severity::Warning), 2);
        assert_eq!(
            reporter.with_severity(Severity::Warning).collect::<Vec<_>>(),
            ["first", "third"]
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
