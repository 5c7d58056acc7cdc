//! Tally Event Log
//!
//! This crate contains the bounded activity log used by the Tally calculator.
//! Front ends record events into an [`EventLog`], and display surfaces
//! subscribe to receive the live entry sequence on every change.
//!
//! # Modules
//!
//! - [`models`] - Log entries, severity levels and error classification
//! - [`event_log`] - The bounded, observable log itself
//! - [`observer`] - Observer capability trait and subscription handles
//! - [`summary`] - Derived per-level statistics
//! - [`config`] - Construction-time settings
//! - [`sink`] - Diagnostic mirror into `tracing`
//!
//! # Example
//!
//! ```
//! use eventlog::models::LogLevel;
//! use eventlog::EventLog;
//!
//! let log = EventLog::new();
//! log.record_button_click("7", true);
//! log.record_operation("6 * 7", 42);
//!
//! let entries = log.entries();
//! assert_eq!(entries[0].message(), "Operation: 6 * 7 = 42");
//! assert_eq!(entries[0].level(), LogLevel::Success);
//! assert_eq!(log.summary().total, 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod event_log;
pub mod models;
pub mod observer;
pub mod sink;
pub mod summary;

pub use config::{ConfigError, EventLogConfig};
pub use event_log::EventLog;
pub use models::{EntryId, ErrorValue, LogData, LogEntry, LogLevel};
pub use observer::{FnObserver, LogObserver, ObserverError, Subscription};
pub use summary::LogSummary;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde_json;
pub use validator;
