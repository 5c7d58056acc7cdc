//! Observer capability and subscription handles.
//!
//! Display surfaces implement [`LogObserver`] (or wrap a closure in
//! [`FnObserver`]) and register it with the event log. Each registration
//! yields a [`Subscription`] that removes exactly that observer.

use crate::models::LogEntry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use thiserror::Error;

/// Errors an observer may report while handling a change notification.
///
/// Observer errors never reach the code that mutated the log; they are
/// logged and the remaining observers are still notified.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// The observer could not process the update.
    #[error("Observer failed: {0}")]
    Failed(String),

    /// The observer failed to write its output.
    #[error("Observer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A party interested in changes to the event log.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait LogObserver: Send + Sync {
    /// Called after every mutation with the full entry sequence, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the observer could not handle the update. The
    /// error is contained by the event log.
    fn on_logs_changed(&self, entries: &[LogEntry]) -> Result<(), ObserverError>;
}

/// Adapts a closure into a [`LogObserver`].
///
/// # Example
///
/// ```
/// use eventlog::{EventLog, FnObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let log = EventLog::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// let _subscription = log.subscribe(Arc::new(FnObserver::new(move |entries| {
///     counter.store(entries.len(), Ordering::SeqCst);
/// })));
///
/// log.record_button_click("C", true);
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct FnObserver<F> {
    callback: F,
}

impl<F> FnObserver<F>
where
    F: Fn(&[LogEntry]) + Send + Sync,
{
    /// Wraps the given callback.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> LogObserver for FnObserver<F>
where
    F: Fn(&[LogEntry]) + Send + Sync,
{
    fn on_logs_changed(&self, entries: &[LogEntry]) -> Result<(), ObserverError> {
        (self.callback)(entries);
        Ok(())
    }
}

impl<F> fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

/// Registered observers keyed by subscription id.
pub(crate) type ObserverMap = BTreeMap<u64, Arc<dyn LogObserver>>;

/// Handle returned by `EventLog::subscribe`.
///
/// Calling [`Subscription::unsubscribe`] removes the observer it was created
/// for. Dropping the handle without calling it leaves the observer
/// registered for the lifetime of the log.
pub struct Subscription {
    id: u64,
    observers: Weak<RwLock<ObserverMap>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, observers: &Arc<RwLock<ObserverMap>>) -> Self {
        Self {
            id,
            observers: Arc::downgrade(observers),
        }
    }

    /// Removes the observer from the log.
    ///
    /// Safe to call more than once; later calls are no-ops. Also a no-op if
    /// the log has already been dropped.
    pub fn unsubscribe(&self) {
        let Some(observers) = self.observers.upgrade() else {
            return;
        };
        let removed = observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id)
            .is_some();
        if removed {
            tracing::debug!(subscription = self.id, "Observer unsubscribed");
        }
    }

    /// Returns true while the observer is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.observers.upgrade().is_some_and(|observers| {
            observers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(&self.id)
        })
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
