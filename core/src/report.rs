//! User-facing build reports
//!
//! Builds report progress and failures through a `Reporter` so the host can
//! surface them however it likes. `TracingReporter` forwards to `tracing`.

use std::fmt;

/// Severity of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportLevel::Info => "INFO",
            ReportLevel::Warning => "WARNING",
            ReportLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Receives build reports
pub trait Reporter {
    fn report(&mut self, level: ReportLevel, message: &str);
}

/// Forwards reports to `tracing` at the matching level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, level: ReportLevel, message: &str) {
        match level {
            ReportLevel::Info => tracing::info!("{}", message),
            ReportLevel::Warning => tracing::warn!("{}", message),
            ReportLevel::Error => tracing::error!("{}", message),
        }
    }
}

/// Keeps every report in order
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub entries: Vec<(ReportLevel, String)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages reported at `level`
    pub fn messages(&self, level: ReportLevel) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|(l, _)| *l == ReportLevel::Error)
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, level: ReportLevel, message: &str) {
        self.entries.push((level, message.to_string()));
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, level: ReportLevel, message: &str) {
        (**self).report(level, message);
    }
}
