//! Integration tests for observer notification.
//!
//! Tests cover:
//! - Delivery of the full sequence after each mutation
//! - Unsubscribing
//! - Isolation of failing and panicking observers
//! - Observers that record into the log themselves

use eventlog::{EventLog, LogEntry, LogLevel, LogObserver, ObserverError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use super::common::{messages, test_log, RecordingObserver};

struct Panicking;

impl LogObserver for Panicking {
    fn on_logs_changed(&self, _entries: &[LogEntry]) -> Result<(), ObserverError> {
        panic!("renderer crashed");
    }
}

struct Failing;

impl LogObserver for Failing {
    fn on_logs_changed(&self, _entries: &[LogEntry]) -> Result<(), ObserverError> {
        Err(ObserverError::Io(std::io::Error::other("broken pipe")))
    }
}

/// Records a follow-up entry the first time it sees an error.
struct Escalating {
    log: Weak<EventLog>,
    fired: AtomicBool,
}

impl LogObserver for Escalating {
    fn on_logs_changed(&self, entries: &[LogEntry]) -> Result<(), ObserverError> {
        let saw_error = entries.first().is_some_and(|e| e.level() == LogLevel::Error);
        if saw_error && !self.fired.swap(true, Ordering::SeqCst) {
            if let Some(log) = self.log.upgrade() {
                log.record_message(LogLevel::Warning, "Error observed by display");
            }
        }
        Ok(())
    }
}

#[test]
fn test_subscriber_receives_new_entry_first() {
    let log = test_log(10);
    let observer = RecordingObserver::shared();
    let _subscription = log.subscribe(observer.clone());

    let entry = log.record_button_click("5", true);

    let notifications = observer.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0][0], entry);
}

#[test]
fn test_subscriber_receives_full_sequence() {
    let log = test_log(10);
    log.record_message(LogLevel::Info, "before subscribe");
    let observer = RecordingObserver::shared();
    let _subscription = log.subscribe(observer.clone());

    log.record_message(LogLevel::Info, "after subscribe");

    let notifications = observer.notifications();
    assert_eq!(
        messages(&notifications[0]),
        ["after subscribe", "before subscribe"]
    );
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let log = test_log(10);
    let observer = RecordingObserver::shared();
    let subscription = log.subscribe(observer.clone());

    log.record_message(LogLevel::Info, "seen");
    subscription.unsubscribe();
    log.record_message(LogLevel::Info, "not seen");
    log.clear();

    assert_eq!(observer.count(), 1);
    assert_eq!(log.observer_count(), 0);
}

#[test]
fn test_unsubscribe_twice_is_harmless() {
    let log = test_log(10);
    let kept = RecordingObserver::shared();
    let removed = RecordingObserver::shared();
    let _kept_subscription = log.subscribe(kept.clone());
    let subscription = log.subscribe(removed.clone());

    subscription.unsubscribe();
    subscription.unsubscribe();
    log.record_message(LogLevel::Info, "after");

    assert!(!subscription.is_active());
    assert_eq!(kept.count(), 1);
    assert_eq!(removed.count(), 0);
}

#[test]
fn test_same_observer_registered_twice_is_removed_once() {
    let log = test_log(10);
    let observer = RecordingObserver::shared();
    let first = log.subscribe(observer.clone());
    let _second = log.subscribe(observer.clone());

    first.unsubscribe();
    log.record_message(LogLevel::Info, "once");

    assert_eq!(observer.count(), 1);
}

#[test]
fn test_closure_observer() {
    let log = test_log(10);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let subscription = log.subscribe_fn(move |entries| {
        counter.fetch_add(entries.len(), Ordering::SeqCst);
    });

    log.record_message(LogLevel::Info, "one");
    log.record_message(LogLevel::Info, "two");
    subscription.unsubscribe();
    log.record_message(LogLevel::Info, "three");

    assert_eq!(calls.load(Ordering::SeqCst), 1 + 2);
}

#[test]
fn test_panicking_observer_is_isolated() {
    let log = test_log(10);
    let _panicking = log.subscribe(Arc::new(Panicking));
    let observer = RecordingObserver::shared();
    let _subscription = log.subscribe(observer.clone());

    let entry = log.record_message(LogLevel::Info, "survives");
    log.record_message(LogLevel::Info, "again");

    assert_eq!(observer.count(), 2);
    assert_eq!(log.entries()[1], entry);
}

#[test]
fn test_failing_observer_is_isolated() {
    let log = test_log(10);
    let observer = RecordingObserver::shared();
    let _before = log.subscribe(observer.clone());
    let _failing = log.subscribe(Arc::new(Failing));

    log.record_error("boom", Default::default());
    log.clear();

    assert_eq!(observer.count(), 2);
}

#[test]
fn test_observer_may_record_during_notification() {
    let log = Arc::new(test_log(10));
    let _escalating = log.subscribe(Arc::new(Escalating {
        log: Arc::downgrade(&log),
        fired: AtomicBool::new(false),
    }));
    let observer = RecordingObserver::shared();
    let _subscription = log.subscribe(observer.clone());

    log.record_error("boom", Default::default());

    let current = log.entries();
    assert_eq!(messages(&current), ["Error observed by display", "boom"]);

    let notifications = observer.notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications.last(), Some(&current));
}

#[test]
fn test_every_observer_ends_on_current_state_after_nested_record() {
    let log = Arc::new(test_log(10));
    let before = RecordingObserver::shared();
    let _before = log.subscribe(before.clone());
    let _escalating = log.subscribe(Arc::new(Escalating {
        log: Arc::downgrade(&log),
        fired: AtomicBool::new(false),
    }));
    let after = RecordingObserver::shared();
    let _after = log.subscribe(after.clone());

    log.record_error("boom", Default::default());
    log.record_message(LogLevel::Info, "later");

    let current = log.entries();
    for observer in [&before, &after] {
        let notifications = observer.notifications();
        assert_eq!(notifications.last(), Some(&current));
        assert!(notifications.iter().all(|seen| !seen.is_empty()));
    }
    assert_eq!(
        after.notifications().iter().map(Vec::len).collect::<Vec<_>>(),
        [2, 2, 3]
    );
}
