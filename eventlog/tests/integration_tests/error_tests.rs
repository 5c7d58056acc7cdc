//! Integration tests for error capture.
//!
//! Tests cover:
//! - Typed errors with a trace
//! - Plain strings, JSON payloads, primitives and missing values
//! - Payloads that cannot be serialized
//! - Merging with caller context

use eventlog::models::error_value::{OBJECT_ERROR_MESSAGE, UNSERIALIZABLE_PLACEHOLDER};
use eventlog::{ErrorValue, LogData, LogLevel};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{json, Value};
use thiserror::Error;

use super::common::test_log;

#[derive(Debug, Error)]
enum CalcError {
    #[error("Division by zero")]
    DivisionByZero,
}

struct Cyclic;

impl Serialize for Cyclic {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("recursion limit exceeded"))
    }
}

fn context(pairs: &[(&str, Value)]) -> LogData {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn test_structured_error_has_message_and_stack() {
    let log = test_log(10);

    let entry = log.record_error(
        ErrorValue::from_error(&CalcError::DivisionByZero),
        context(&[("action", json!("calculate"))]),
    );

    assert_eq!(entry.level(), LogLevel::Error);
    assert_eq!(entry.message(), "Division by zero");
    assert!(entry.data().contains_key("stack"));
    assert_eq!(entry.data()["error"], json!("Division by zero"));
    assert_eq!(entry.data()["action"], json!("calculate"));
}

#[test]
fn test_anyhow_error_has_message_and_stack() {
    let log = test_log(10);

    let entry = log.record_error(anyhow::anyhow!("Simulated runtime error"), LogData::new());

    assert_eq!(entry.message(), "Simulated runtime error");
    assert!(entry.data()["stack"]
        .as_str()
        .unwrap()
        .starts_with("Simulated runtime error"));
}

#[test]
fn test_string_error() {
    let log = test_log(10);

    let entry = log.record_error("boom", LogData::new());

    assert_eq!(entry.message(), "boom");
    assert_eq!(entry.data()["error"], json!("boom"));
}

#[test]
fn test_null_error() {
    let log = test_log(10);

    let entry = log.record_error(Value::Null, LogData::new());

    assert_eq!(entry.level(), LogLevel::Error);
    assert_eq!(entry.message(), "An unknown error occurred");
}

#[test]
fn test_missing_error() {
    let log = test_log(10);

    let entry = log.record_error(None::<String>, LogData::new());

    assert_eq!(entry.message(), "An unknown error occurred");
}

#[test]
fn test_api_style_object_error() {
    let log = test_log(10);

    let entry = log.record_error(
        json!({"detail": "Requested delay exceeds the maximum allowed limit of 5000ms."}),
        LogData::new(),
    );

    assert_eq!(
        entry.message(),
        "Requested delay exceeds the maximum allowed limit of 5000ms."
    );
    let error = entry.data()["error"].as_str().unwrap();
    assert!(error.contains("\"detail\""));
}

#[test]
fn test_object_error_without_message() {
    let log = test_log(10);

    let entry = log.record_error(json!({"code": 17}), LogData::new());

    assert_eq!(entry.message(), OBJECT_ERROR_MESSAGE);
}

#[test]
fn test_unserializable_error_never_fails() {
    let log = test_log(10);

    let entry = log.record_error(ErrorValue::from_serialize(&Cyclic), LogData::new());

    assert_eq!(entry.message(), OBJECT_ERROR_MESSAGE);
    assert_eq!(entry.data()["error"], json!(UNSERIALIZABLE_PLACEHOLDER));
}

#[test]
fn test_primitive_error() {
    let log = test_log(10);

    let entry = log.record_error(json!(false), LogData::new());

    assert_eq!(entry.message(), "false");
    assert_eq!(entry.data()["error"], json!(false));
}

#[test]
fn test_extracted_fields_take_precedence_over_context() {
    let log = test_log(10);

    let entry = log.record_error(
        ErrorValue::from_error(&CalcError::DivisionByZero),
        context(&[
            ("stack", json!("caller stack")),
            ("button", json!("/")),
        ]),
    );

    assert_ne!(entry.data()["stack"], json!("caller stack"));
    assert_eq!(entry.data()["button"], json!("/"));
}
