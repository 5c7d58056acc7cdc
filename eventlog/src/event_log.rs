//! The bounded, observable event log.
//!
//! `EventLog` keeps the most recent entries newest first, evicts the oldest
//! ones beyond its capacity and synchronously notifies every registered
//! observer after each mutation. None of its operations fail: problems with
//! payloads or observers are absorbed and turned into log content or
//! diagnostics instead.

use crate::config::EventLogConfig;
use crate::models::{EntryId, ErrorValue, LogData, LogEntry, LogLevel};
use crate::observer::{FnObserver, LogObserver, ObserverMap, Subscription};
use crate::sink;
use crate::summary::LogSummary;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Stored in place of a value that could not be serialized.
pub const UNSERIALIZABLE_VALUE: &str = "[unserializable value]";

/// Bounded in-memory activity log with observer notification.
///
/// One instance is meant to live for the whole process. It is constructed
/// explicitly and shared by reference or `Arc` with whoever records into it
/// and whoever displays it.
///
/// # Example
///
/// ```
/// use eventlog::models::LogLevel;
/// use eventlog::EventLog;
///
/// let log = EventLog::with_max_entries(2);
/// log.record_message(LogLevel::Info, "first");
/// log.record_message(LogLevel::Info, "second");
/// log.record_message(LogLevel::Warning, "third");
///
/// let messages: Vec<_> = log.entries().iter().map(|e| e.message().to_string()).collect();
/// assert_eq!(messages, ["third", "second"]);
/// ```
pub struct EventLog {
    entries: RwLock<VecDeque<LogEntry>>,
    observers: Arc<RwLock<ObserverMap>>,
    next_entry_id: AtomicU64,
    next_subscription_id: AtomicU64,
    config: EventLogConfig,
}

impl EventLog {
    /// Creates an empty log with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EventLogConfig::default())
    }

    /// Creates an empty log holding at most `max_entries` entries.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self::with_config(EventLogConfig::new(max_entries))
    }

    /// Creates an empty log from the given configuration.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_config(mut config: EventLogConfig) -> Self {
        config.max_entries = config.max_entries.max(1);
        Self {
            entries: RwLock::new(VecDeque::new()),
            observers: Arc::default(),
            next_entry_id: AtomicU64::new(1),
            next_subscription_id: AtomicU64::new(1),
            config,
        }
    }

    /// Creates a new log wrapped in an Arc.
    ///
    /// This is useful when sharing the log between recorders and observers.
    #[must_use]
    pub fn new_shared(config: EventLogConfig) -> Arc<Self> {
        Arc::new(Self::with_config(config))
    }

    /// Records a new entry and notifies every observer.
    ///
    /// The entry is prepended, the log is truncated to its capacity, the
    /// entry is mirrored to the diagnostic sink, and then each observer
    /// receives the full sequence, newest first.
    pub fn record(&self, level: LogLevel, message: impl Into<String>, data: LogData) -> LogEntry {
        let entry = {
            let mut entries = self.write_entries();
            // Ids are drawn under the lock so they follow list order.
            let id = EntryId::new(self.next_entry_id.fetch_add(1, Ordering::Relaxed));
            let entry = LogEntry::new(id, level, message.into(), data);

            entries.push_front(entry.clone());
            if entries.len() > self.config.max_entries {
                let evicted = entries.len() - self.config.max_entries;
                entries.truncate(self.config.max_entries);
                tracing::debug!(evicted, "Evicted oldest log entries");
            }

            entry
        };

        if self.config.mirror_to_diagnostics {
            sink::mirror(&entry);
        }
        self.notify();

        entry
    }

    /// Records an entry without a payload.
    pub fn record_message(&self, level: LogLevel, message: impl Into<String>) -> LogEntry {
        self.record(level, message, LogData::new())
    }

    /// Records an error entry from an arbitrary error value.
    ///
    /// The message and fields extracted from `error` are merged over
    /// `context`; extracted fields win when keys collide.
    ///
    /// # Example
    ///
    /// ```
    /// use eventlog::{EventLog, LogData};
    /// use eventlog::serde_json::json;
    ///
    /// let log = EventLog::new();
    /// let mut context = LogData::new();
    /// context.insert("action".into(), json!("handleEquals"));
    ///
    /// let entry = log.record_error("boom", context);
    /// assert_eq!(entry.message(), "boom");
    /// assert_eq!(entry.data()["error"], json!("boom"));
    /// assert_eq!(entry.data()["action"], json!("handleEquals"));
    /// ```
    pub fn record_error(&self, error: impl Into<ErrorValue>, context: LogData) -> LogEntry {
        let (message, extracted) = error.into().into_parts();
        let mut data = context;
        data.extend(extracted);
        self.record(LogLevel::Error, message, data)
    }

    /// Records a button press.
    pub fn record_button_click(&self, label: impl Into<String>, functional: bool) -> LogEntry {
        let label = label.into();
        let action = if functional {
            "processed"
        } else {
            "non-functional"
        };

        let mut data = LogData::new();
        data.insert("label".to_string(), Value::String(label.clone()));
        data.insert("functional".to_string(), Value::Bool(functional));
        data.insert("action".to_string(), json!(action));

        self.record(LogLevel::Info, format!("Button clicked: {label}"), data)
    }

    /// Records a completed calculation.
    pub fn record_operation<R>(&self, description: impl Into<String>, result: R) -> LogEntry
    where
        R: fmt::Display + Serialize,
    {
        let description = description.into();
        let message = format!("Operation: {description} = {result}");
        let result = serde_json::to_value(&result)
            .unwrap_or_else(|_| Value::String(UNSERIALIZABLE_VALUE.to_string()));

        let mut data = LogData::new();
        data.insert(
            "operationDescription".to_string(),
            Value::String(description),
        );
        data.insert("result".to_string(), result);

        self.record(LogLevel::Success, message, data)
    }

    /// Removes every entry and notifies observers with an empty sequence.
    pub fn clear(&self) {
        let removed = {
            let mut entries = self.write_entries();
            let removed = entries.len();
            entries.clear();
            removed
        };
        tracing::debug!(removed, "Event log cleared");
        self.notify();
    }

    /// Registers an observer for all future mutations.
    ///
    /// The observer is not called for the current state; it first hears
    /// from the log on the next mutation.
    pub fn subscribe(&self, observer: Arc<dyn LogObserver>) -> Subscription {
        let id = self.next_subscription_id.fetch_add(1, Ordering::Relaxed);
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, observer);
        tracing::debug!(subscription = id, "Observer subscribed");
        Subscription::new(id, &self.observers)
    }

    /// Registers a closure as an observer.
    pub fn subscribe_fn<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[LogEntry]) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver::new(callback)))
    }

    /// Returns a snapshot of the entries, newest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.read_entries().iter().cloned().collect()
    }

    /// Returns the most recent entry, if any.
    #[must_use]
    pub fn latest(&self) -> Option<LogEntry> {
        self.read_entries().front().cloned()
    }

    /// Returns the number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Returns true if the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Returns the capacity of the log.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.config.max_entries
    }

    /// Returns the configuration the log was built with.
    #[must_use]
    pub fn config(&self) -> &EventLogConfig {
        &self.config
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns per-level counts of the current entries.
    #[must_use]
    pub fn summary(&self) -> LogSummary {
        LogSummary::from_entries(self.read_entries().iter())
    }

    /// Calls every observer with the current entries, containing failures
    /// per observer.
    ///
    /// Observers run without any internal lock held, so they may record
    /// into the log themselves. The entries are re-read for each observer, so
    /// one registered after a recording observer never ends on a stale view.
    fn notify(&self) {
        let observers: Vec<(u64, Arc<dyn LogObserver>)> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, observer)| (*id, Arc::clone(observer)))
            .collect();

        for (id, observer) in observers {
            let entries = self.entries();
            match panic::catch_unwind(AssertUnwindSafe(|| observer.on_logs_changed(&entries))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(subscription = id, error = %err, "Log observer failed");
                }
                Err(_) => {
                    tracing::warn!(subscription = id, "Log observer panicked");
                }
            }
        }
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, VecDeque<LogEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, VecDeque<LogEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.len())
            .field("observers", &self.observer_count())
            .field("config", &self.config)
            .finish()
    }
}
