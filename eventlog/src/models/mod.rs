//! Data models for the Tally event log.
//!
//! This module contains the log entry structure and the classification of
//! arbitrary error values into loggable form.

pub mod entry;
pub mod error_value;

pub use entry::{EntryId, LevelParseError, LogData, LogEntry, LogLevel};
pub use error_value::{ErrorValue, UNKNOWN_ERROR_MESSAGE};
