//! Text display surface for the event log.
//!
//! Renders the log panel (entries newest first plus a summary footer) and
//! provides a live feed observer that prints each new entry as it arrives.

use chrono::{DateTime, Local, Utc};
use eventlog::{EventLog, LogEntry, LogLevel, LogObserver, LogSummary, ObserverError};
use std::io::{self, Write};
use std::sync::Mutex;

/// Shown when the log holds no entries.
pub const EMPTY_MESSAGE: &str = "No logs yet. Start using the calculator!";

/// Formats a timestamp as local wall-clock time with milliseconds.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%H:%M:%S%.3f")
        .to_string()
}

/// Writes the full log panel.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render_panel<W: Write>(entries: &[LogEntry], out: &mut W) -> io::Result<()> {
    writeln!(out, "Activity Logs")?;
    writeln!(out, "=============")?;

    if entries.is_empty() {
        writeln!(out, "{EMPTY_MESSAGE}")?;
    }

    for entry in entries {
        render_entry(entry, out)?;
    }

    writeln!(out, "-------------")?;
    writeln!(out, "{}", LogSummary::from_entries(entries))
}

fn render_entry<W: Write>(entry: &LogEntry, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", entry_header(entry))?;
    writeln!(out, "  {}", entry.message())?;

    if !entry.data().is_empty() {
        let data = serde_json::to_string_pretty(entry.data()).map_err(io::Error::other)?;
        for line in data.lines() {
            writeln!(out, "    {line}")?;
        }
    }

    Ok(())
}

fn entry_header(entry: &LogEntry) -> String {
    format!(
        "{} {:<7} {}",
        entry.level().icon(),
        entry.level().label(),
        format_timestamp(entry.timestamp())
    )
}

/// Records the user's request to clear the log, then clears it.
pub fn clear_logs(log: &EventLog) {
    log.record_message(LogLevel::Info, "Logs cleared by user");
    log.clear();
}

/// Observer that prints the newest entry after every change.
pub struct LiveFeed<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> LiveFeed<W> {
    /// Creates a feed writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> LogObserver for LiveFeed<W> {
    fn on_logs_changed(&self, entries: &[LogEntry]) -> Result<(), ObserverError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ObserverError::Failed("live feed writer poisoned".to_string()))?;

        match entries.first() {
            Some(entry) => writeln!(out, "{} {}", entry_header(entry), entry.message())?,
            None => writeln!(out, "(log cleared)")?,
        }
        out.flush()?;
        Ok(())
    }
}
