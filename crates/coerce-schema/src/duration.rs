//! Duration checkers.
//!
//! Both accept a `Value::Duration` or a duration string (see
//! [`coerce_core::parse_duration`]); the empty string means zero.
//! [`time_duration`] outputs `Value::Duration`, [`time_duration_string`]
//! outputs the canonical string form so the result stays plain text.

use std::sync::Arc;
use std::time::Duration;

use coerce_core::{format_duration, parse_duration, CoerceError, Path, Value};

use crate::checker::{Checker, CheckerRef};

const EXPECTED: &str = "string or duration";

/// Accepts durations and duration strings, yielding `Value::Duration`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationChecker;

/// A checker yielding `Value::Duration`.
pub fn time_duration() -> CheckerRef {
    Arc::new(DurationChecker)
}

impl Checker for DurationChecker {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        to_duration(value, path).map(Value::Duration)
    }
}

/// Accepts durations and duration strings, yielding the canonical string.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationStringChecker;

/// A checker yielding the canonical duration string, e.g. `"18h0m0s"`.
pub fn time_duration_string() -> CheckerRef {
    Arc::new(DurationStringChecker)
}

impl Checker for DurationStringChecker {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        to_duration(value, path).map(|d| Value::String(format_duration(d)))
    }
}

fn to_duration(value: &Value, path: &Path) -> Result<Duration, CoerceError> {
    match value {
        Value::Duration(d) => Ok(*d),
        Value::String(s) if s.is_empty() => Ok(Duration::ZERO),
        Value::String(s) => parse_duration(s).map_err(|err| CoerceError::Conversion {
            reason: format!("conversion to duration: {err}"),
            path: path.clone(),
        }),
        _ => Err(CoerceError::mismatch(EXPECTED, value, path)),
    }
}
