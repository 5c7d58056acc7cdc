//! Classification of arbitrary error values.
//!
//! Callers hand the event log whatever they caught: a typed error, a bare
//! string, a JSON payload from an API, or nothing at all. `ErrorValue`
//! resolves that input into one of a fixed set of shapes so the log can
//! derive a message and payload without probing types at runtime.

use super::entry::LogData;
use serde::Serialize;
use serde_json::Value;
use std::backtrace::BacktraceStatus;

/// Message used when no error value was supplied.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Message used for object payloads without a `detail` or `message` field.
pub const OBJECT_ERROR_MESSAGE: &str = "An object-based error occurred";

/// Stored in place of an object payload that could not be serialized.
pub const UNSERIALIZABLE_PLACEHOLDER: &str = "[object Object] (Could not be stringified)";

/// An error value classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorValue {
    /// A typed error with a message, a rendered cause chain and a trace.
    Structured {
        /// Top-level error message.
        message: String,
        /// The full error rendered as a single line.
        rendered: String,
        /// Multi-line trace text (cause chain, plus backtrace when captured).
        trace: String,
    },
    /// A plain string.
    Text(String),
    /// A JSON object or array; `None` when the value could not be serialized.
    Object(Option<Value>),
    /// A number or boolean.
    Primitive(Value),
    /// No value at all.
    Null,
}

impl ErrorValue {
    /// Classifies a typed error, walking its `source()` chain.
    ///
    /// # Example
    ///
    /// ```
    /// use eventlog::ErrorValue;
    ///
    /// let err = "x".parse::<i32>().unwrap_err();
    /// let value = ErrorValue::from_error(&err);
    /// assert_eq!(value.message(), "invalid digit found in string");
    /// ```
    #[must_use]
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut chain = vec![error.to_string()];
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }

        Self::Structured {
            message: error.to_string(),
            rendered: chain.join(": "),
            trace: render_trace(&chain),
        }
    }

    /// Classifies any serializable value by the JSON shape it produces.
    ///
    /// Serialization failures are absorbed: the value is treated as an
    /// object whose contents could not be captured.
    #[must_use]
    pub fn from_serialize<T>(value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(value) => Self::from(value),
            Err(err) => {
                tracing::debug!(error = %err, "Error payload could not be serialized");
                Self::Object(None)
            }
        }
    }

    /// Returns the human-readable message for this error.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Structured { message, .. } | Self::Text(message) => message.clone(),
            Self::Object(Some(value)) => {
                object_message(value).unwrap_or_else(|| OBJECT_ERROR_MESSAGE.to_string())
            }
            Self::Object(None) => OBJECT_ERROR_MESSAGE.to_string(),
            Self::Primitive(value) => value.to_string(),
            Self::Null => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }

    /// Splits the error into its message and the fields extracted from it.
    ///
    /// Structured errors yield `error` and `stack`; strings, objects and
    /// primitives yield `error`; a null value yields no fields.
    #[must_use]
    pub fn into_parts(self) -> (String, LogData) {
        let message = self.message();
        let mut data = LogData::new();

        match self {
            Self::Structured {
                rendered, trace, ..
            } => {
                data.insert("error".to_string(), Value::String(rendered));
                data.insert("stack".to_string(), Value::String(trace));
            }
            Self::Text(text) => {
                data.insert("error".to_string(), Value::String(text));
            }
            Self::Object(Some(value)) => {
                data.insert("error".to_string(), Value::String(value.to_string()));
            }
            Self::Object(None) => {
                data.insert(
                    "error".to_string(),
                    Value::String(UNSERIALIZABLE_PLACEHOLDER.to_string()),
                );
            }
            Self::Primitive(value) => {
                data.insert("error".to_string(), value);
            }
            Self::Null => {}
        }

        (message, data)
    }
}

/// Picks the first truthy `detail` or `message` field of an object payload.
fn object_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    ["detail", "message"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|field| match field {
            Value::Null | Value::Bool(false) => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        })
}

fn render_trace(chain: &[String]) -> String {
    let mut lines = chain.iter();
    let mut trace = lines.next().cloned().unwrap_or_default();
    for cause in lines {
        trace.push_str("\n    caused by: ");
        trace.push_str(cause);
    }
    trace
}

impl From<Value> for ErrorValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(text) => Self::Text(text),
            Value::Bool(_) | Value::Number(_) => Self::Primitive(value),
            Value::Object(_) | Value::Array(_) => Self::Object(Some(value)),
        }
    }
}

impl From<&str> for ErrorValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ErrorValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<anyhow::Error> for ErrorValue {
    fn from(error: anyhow::Error) -> Self {
        let chain: Vec<String> = error.chain().map(ToString::to_string).collect();
        let mut trace = render_trace(&chain);

        let backtrace = error.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            trace.push_str("\n\n");
            trace.push_str(&backtrace.to_string());
        }

        Self::Structured {
            message: error.to_string(),
            rendered: format!("{error:#}"),
            trace,
        }
    }
}

impl<T> From<Option<T>> for ErrorValue
where
    T: Into<ErrorValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
