//! Integration tests for ordering, eviction and entry identity.
//!
//! Tests cover:
//! - Newest-first ordering after every record
//! - Eviction of the oldest entries beyond capacity
//! - Distinct ids for back-to-back records
//! - Clearing the log

use eventlog::{EventLog, LogData, LogLevel};
use std::collections::HashSet;

use super::common::{messages, test_log, RecordingObserver};

#[test]
fn test_every_record_respects_capacity_and_order() {
    let log = test_log(5);

    for i in 0..12 {
        let entry = log.record_message(LogLevel::Info, format!("event {i}"));
        let entries = log.entries();

        assert!(entries.len() <= 5);
        assert_eq!(entries[0], entry);
    }
}

#[test]
fn test_overflow_keeps_last_recordings_in_reverse_order() {
    let log = test_log(4);

    for i in 0..10 {
        log.record_message(LogLevel::Info, format!("event {i}"));
    }

    assert_eq!(
        messages(&log.entries()),
        ["event 9", "event 8", "event 7", "event 6"]
    );
}

#[test]
fn test_default_capacity_is_one_hundred() {
    let log = EventLog::new();

    for i in 0..150 {
        log.record_message(LogLevel::Success, format!("event {i}"));
    }

    let entries = log.entries();
    assert_eq!(log.max_entries(), 100);
    assert_eq!(entries.len(), 100);
    assert_eq!(entries[0].message(), "event 149");
    assert_eq!(entries[99].message(), "event 50");
}

#[test]
fn test_rapid_records_have_unique_descending_ids() {
    let log = test_log(50);

    for _ in 0..50 {
        log.record_button_click("1", true);
    }

    let entries = log.entries();
    let ids: HashSet<_> = entries.iter().map(|e| e.id()).collect();
    assert_eq!(ids.len(), 50);
    assert!(entries.windows(2).all(|pair| pair[0].id() > pair[1].id()));
}

#[test]
fn test_entries_keep_their_timestamps() {
    let log = test_log(3);

    let first = log.record_message(LogLevel::Info, "first");
    log.record_message(LogLevel::Info, "second");

    let stored = log.entries().into_iter().find(|e| e.id() == first.id()).unwrap();
    assert_eq!(stored.timestamp(), first.timestamp());
    assert!(log.entries()[0].timestamp() >= first.timestamp());
}

#[test]
fn test_clear_empties_log_and_notifies() {
    let log = test_log(10);
    log.record_message(LogLevel::Info, "App initialized");
    log.record_operation("2 + 2", 4);

    let observer = RecordingObserver::shared();
    let _subscription = log.subscribe(observer.clone());

    log.clear();

    assert!(log.is_empty());
    assert_eq!(log.len(), 0);
    assert_eq!(observer.notifications(), vec![Vec::new()]);
}

#[test]
fn test_clear_on_empty_log_still_notifies() {
    let log = test_log(10);
    let observer = RecordingObserver::shared();
    let _subscription = log.subscribe(observer.clone());

    log.clear();

    assert_eq!(observer.count(), 1);
}

#[test]
fn test_record_with_payload() {
    let log = test_log(10);
    let mut data = LogData::new();
    data.insert("timestamp".to_string(), "2024-01-15T10:30:00Z".into());

    let entry = log.record(LogLevel::Info, "App initialized", data.clone());

    assert_eq!(entry.data(), &data);
}
