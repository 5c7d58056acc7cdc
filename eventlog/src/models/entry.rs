//! Log entry data model.
//!
//! Defines the immutable `LogEntry` recorded by the event log and the closed
//! set of severity levels it can carry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structured payload attached to a log entry.
pub type LogData = serde_json::Map<String, serde_json::Value>;

/// Log severity level.
///
/// Governs both display styling and routing to the diagnostic mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Informational messages.
    #[default]
    Info,
    /// Warning conditions.
    Warning,
    /// Error conditions.
    Error,
    /// Successfully completed operations.
    Success,
}

impl LogLevel {
    /// All levels in display order.
    pub const ALL: [LogLevel; 4] = [Self::Info, Self::Warning, Self::Error, Self::Success];

    /// Returns the uppercase label shown next to an entry.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }

    /// Returns the style class used by display surfaces for this level.
    #[must_use]
    pub fn display_class(self) -> &'static str {
        match self {
            Self::Info => "log-entry-info",
            Self::Warning => "log-entry-warning",
            Self::Error => "log-entry-error",
            Self::Success => "log-entry-success",
        }
    }

    /// Returns the glyph shown next to an entry of this level.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ️",
            Self::Warning => "⚠️",
            Self::Error => "❌",
            Self::Success => "✅",
        }
    }

    /// Parses a level name, falling back to [`LogLevel::Info`] when the
    /// name is not recognized.
    ///
    /// # Example
    ///
    /// ```
    /// use eventlog::models::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse_lenient("warning"), LogLevel::Warning);
    /// assert_eq!(LogLevel::parse_lenient("verbose"), LogLevel::Info);
    /// ```
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// Error returned when a level name is not one of the known levels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown log level: {0}")]
pub struct LevelParseError(pub String);

impl FromStr for LogLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "success" => Ok(Self::Success),
            _ => Err(LevelParseError(s.to_string())),
        }
    }
}

/// Identifier of a log entry.
///
/// Ids come from a per-log counter, so entries recorded within the same
/// millisecond still get distinct ids and later entries compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single recorded event.
///
/// Entries are created by the event log and never mutated afterwards; the
/// fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    id: EntryId,
    level: LogLevel,
    message: String,
    #[serde(default)]
    data: LogData,
    timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Creates a new entry stamped with the current time.
    pub(crate) fn new(id: EntryId, level: LogLevel, message: String, data: LogData) -> Self {
        Self {
            id,
            level,
            message,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Unique id of the entry.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Severity level of the entry.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured payload attached to the entry.
    #[must_use]
    pub fn data(&self) -> &LogData {
        &self.data
    }

    /// Time at which the entry was recorded.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
