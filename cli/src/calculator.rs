//! Key-driven calculator that reports every interaction to the event log.
//!
//! The calculator mirrors a classic four-function pocket calculator: digits
//! build up the display, an operator stores the left operand, and `=` or a
//! chained operator computes the result. Every key press, completed
//! operation and caught error is recorded into the shared [`EventLog`].

use eventlog::{ErrorValue, EventLog, LogData, LogLevel};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Keys that are drawn on the keypad but deliberately do nothing.
pub const NON_FUNCTIONAL_KEYS: [&str; 6] = ["±", "%", "√", "x²", "1/x", "M+"];

/// Errors raised while operating the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The right operand of a division was zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// A key that is shown but not implemented was pressed.
    #[error("Button \"{0}\" is intentionally non-functional")]
    NonFunctional(String),

    /// The display does not hold a number.
    #[error("Cannot read a number from display \"{0}\"")]
    InvalidNumber(String),

    /// The key is not on the keypad.
    #[error("Unknown key: {0}")]
    UnknownKey(String),
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Addition.
    Add,
    /// Subtraction.
    Subtract,
    /// Multiplication.
    Multiply,
    /// Division.
    Divide,
}

impl Operator {
    /// Returns the symbol used in logs for this operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        match self {
            Self::Add => Ok(lhs + rhs),
            Self::Subtract => Ok(lhs - rhs),
            Self::Multiply => Ok(lhs * rhs),
            Self::Divide if rhs == 0.0 => Err(CalcError::DivisionByZero),
            Self::Divide => Ok(lhs / rhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A key on the calculator keypad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A digit from 0 to 9.
    Digit(u8),
    /// The decimal point.
    Decimal,
    /// One of the four operators.
    Operator(Operator),
    /// The equals key.
    Equals,
    /// Resets the calculator.
    Clear,
    /// A key that is displayed but not implemented.
    NonFunctional(String),
    /// Raises one of several simulated runtime errors.
    SimulateError,
}

impl Key {
    /// Returns the label printed on the key.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::Equals => "=".to_string(),
            Self::Clear => "C".to_string(),
            Self::NonFunctional(label) => label.clone(),
            Self::SimulateError => "ERROR".to_string(),
        }
    }
}

impl FromStr for Key {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "." => Self::Decimal,
            "+" => Self::Operator(Operator::Add),
            "-" | "−" => Self::Operator(Operator::Subtract),
            "*" | "×" => Self::Operator(Operator::Multiply),
            "/" | "÷" => Self::Operator(Operator::Divide),
            "=" => Self::Equals,
            "C" | "c" => Self::Clear,
            "ERROR" | "error" => Self::SimulateError,
            other if NON_FUNCTIONAL_KEYS.contains(&other) => Self::NonFunctional(other.to_string()),
            other => match other.as_bytes() {
                [d @ b'0'..=b'9'] => Self::Digit(d - b'0'),
                _ => return Err(CalcError::UnknownKey(other.to_string())),
            },
        };
        Ok(key)
    }
}

/// Calculator state bound to the log it reports into.
pub struct Calculator<'a> {
    log: &'a EventLog,
    display: String,
    previous: Option<f64>,
    operation: Option<Operator>,
    waiting_for_new_value: bool,
    simulated_errors: usize,
}

impl<'a> Calculator<'a> {
    /// Creates a calculator showing `0` and records that it is ready.
    pub fn new(log: &'a EventLog) -> Self {
        log.record_message(LogLevel::Info, "Calculator component mounted");
        Self {
            log,
            display: "0".to_string(),
            previous: None,
            operation: None,
            waiting_for_new_value: false,
            simulated_errors: 0,
        }
    }

    /// Returns the current display text.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Handles a single key press.
    pub fn press(&mut self, key: &Key) {
        tracing::debug!(key = %key.label(), "Key pressed");
        match key {
            Key::Digit(digit) => self.handle_digit(*digit),
            Key::Decimal => self.handle_decimal(),
            Key::Operator(op) => self.handle_operator(*op),
            Key::Equals => self.handle_equals(),
            Key::Clear => self.handle_clear(),
            Key::NonFunctional(label) => self.handle_non_functional(label),
            Key::SimulateError => self.handle_simulated_error(),
        }
    }

    fn handle_digit(&mut self, digit: u8) {
        self.log.record_button_click(digit.to_string(), true);

        if self.waiting_for_new_value || self.display == "0" || self.display == "Error" {
            self.display = digit.to_string();
            self.waiting_for_new_value = false;
        } else {
            self.display.push(char::from(b'0' + digit));
        }
    }

    fn handle_decimal(&mut self) {
        self.log.record_button_click(".", true);

        if self.waiting_for_new_value {
            self.display = "0.".to_string();
            self.waiting_for_new_value = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    fn handle_operator(&mut self, op: Operator) {
        self.log.record_button_click(op.symbol(), true);

        if let Err(err) = self.apply_operator(op) {
            self.log.record_error(
                ErrorValue::from_error(&err),
                context(&[
                    ("action", json!("handleOperation")),
                    ("operation", json!(op.symbol())),
                ]),
            );
        }
    }

    fn apply_operator(&mut self, op: Operator) -> Result<(), CalcError> {
        let input = self.read_display()?;

        match (self.previous, self.operation) {
            (None, _) => self.previous = Some(input),
            (Some(previous), Some(pending)) => {
                let value = self.calculate(previous, input, pending)?;
                self.display = value.to_string();
                self.previous = Some(value);
                self.log
                    .record_operation(format!("{previous} {pending} {input}"), value);
            }
            (Some(_), None) => {}
        }

        self.waiting_for_new_value = true;
        self.operation = Some(op);
        tracing::debug!(operator = %op, "Operator applied");
        Ok(())
    }

    fn handle_equals(&mut self) {
        self.log.record_button_click("=", true);

        let (Some(previous), Some(pending)) = (self.previous, self.operation) else {
            return;
        };

        let result = self.read_display().and_then(|input| {
            self.calculate(previous, input, pending)
                .map(|value| (input, value))
        });

        match result {
            Ok((input, value)) => {
                self.display = value.to_string();
                self.log
                    .record_operation(format!("{previous} {pending} {input}"), value);
                self.previous = None;
                self.operation = None;
                self.waiting_for_new_value = true;
            }
            Err(err) => {
                self.log.record_error(
                    ErrorValue::from_error(&err),
                    context(&[("action", json!("handleEquals"))]),
                );
                self.display = "Error".to_string();
            }
        }
    }

    fn handle_clear(&mut self) {
        self.log.record_button_click("C", true);

        self.display = "0".to_string();
        self.previous = None;
        self.operation = None;
        self.waiting_for_new_value = false;
    }

    fn handle_non_functional(&mut self, label: &str) {
        self.log.record_button_click(label, false);

        let err = CalcError::NonFunctional(label.to_string());
        self.log.record_error(
            ErrorValue::from_error(&err),
            context(&[
                ("button", json!(label)),
                ("reason", json!("Intentionally non-functional")),
            ]),
        );
    }

    fn handle_simulated_error(&mut self) {
        self.log.record_button_click("ERROR", false);

        let error = match self.simulated_errors % 3 {
            0 => ErrorValue::from(anyhow::anyhow!("Simulated runtime error")),
            1 => match serde_json::from_str::<Value>("invalid json") {
                Ok(_) => ErrorValue::Null,
                Err(err) => ErrorValue::from_error(&err),
            },
            _ => ErrorValue::from(json!({
                "detail": "Service temporarily unavailable",
                "status": 503,
            })),
        };
        self.simulated_errors += 1;

        self.log.record_error(
            error,
            context(&[
                ("button", json!("ERROR")),
                ("type", json!("simulated_error")),
            ]),
        );
    }

    /// Computes `lhs op rhs`, recording a failure with its operands.
    fn calculate(&self, lhs: f64, rhs: f64, op: Operator) -> Result<f64, CalcError> {
        op.apply(lhs, rhs).inspect_err(|err| {
            self.log.record_error(
                ErrorValue::from_error(err),
                context(&[
                    ("action", json!("calculate")),
                    ("firstValue", json!(lhs)),
                    ("secondValue", json!(rhs)),
                    ("operation", json!(op.symbol())),
                ]),
            );
        })
    }

    fn read_display(&self) -> Result<f64, CalcError> {
        self.display
            .parse()
            .map_err(|_| CalcError::InvalidNumber(self.display.clone()))
    }
}

fn context(pairs: &[(&str, Value)]) -> LogData {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}
