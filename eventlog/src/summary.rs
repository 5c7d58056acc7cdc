//! Derived per-level statistics over a sequence of log entries.

use crate::models::{LogEntry, LogLevel};
use serde::Serialize;
use std::fmt;

/// Counts of entries by severity level.
///
/// # Example
///
/// ```
/// use eventlog::{EventLog, LogSummary};
///
/// let log = EventLog::new();
/// log.record_error("boom", Default::default());
/// log.record_operation("1 + 1", 2);
///
/// let summary = LogSummary::from_entries(&log.entries());
/// assert_eq!(summary.errors, 1);
/// assert_eq!(summary.successes, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    /// Total number of entries.
    pub total: usize,
    /// Number of informational entries.
    pub info: usize,
    /// Number of warning entries.
    pub warnings: usize,
    /// Number of error entries.
    pub errors: usize,
    /// Number of success entries.
    pub successes: usize,
}

impl LogSummary {
    /// Computes the summary of the given entries.
    #[must_use]
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        entries.into_iter().fold(Self::default(), |mut summary, entry| {
            summary.total += 1;
            match entry.level() {
                LogLevel::Info => summary.info += 1,
                LogLevel::Warning => summary.warnings += 1,
                LogLevel::Error => summary.errors += 1,
                LogLevel::Success => summary.successes += 1,
            }
            summary
        })
    }

    /// Returns the number of entries at the given level.
    #[must_use]
    pub fn count(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warnings,
            LogLevel::Error => self.errors,
            LogLevel::Success => self.successes,
        }
    }
}

impl fmt::Display for LogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Logs: {} | Errors: {} | Warnings: {} | Success: {}",
            self.total, self.errors, self.warnings, self.successes
        )
    }
}
