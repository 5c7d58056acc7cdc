//! Common test utilities shared across integration tests.

use eventlog::{EventLog, EventLogConfig, LogEntry, LogObserver, ObserverError};
use std::sync::{Arc, Mutex};

/// Creates a log with the given capacity and the diagnostic mirror disabled.
pub fn test_log(max_entries: usize) -> EventLog {
    EventLog::with_config(EventLogConfig::new(max_entries).with_mirror_to_diagnostics(false))
}

/// Observer that records every sequence it is notified with.
#[derive(Default)]
pub struct RecordingObserver {
    notifications: Mutex<Vec<Vec<LogEntry>>>,
}

impl RecordingObserver {
    /// Creates a new shared recording observer.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns every sequence received so far.
    pub fn notifications(&self) -> Vec<Vec<LogEntry>> {
        self.notifications.lock().unwrap().clone()
    }

    /// Returns the number of notifications received.
    pub fn count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

impl LogObserver for RecordingObserver {
    fn on_logs_changed(&self, entries: &[LogEntry]) -> Result<(), ObserverError> {
        self.notifications.lock().unwrap().push(entries.to_vec());
        Ok(())
    }
}

/// Returns the messages of the given entries in order.
pub fn messages(entries: &[LogEntry]) -> Vec<String> {
    entries.iter().map(|e| e.message().to_string()).collect()
}
