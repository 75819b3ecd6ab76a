//! Exact-match checkers: [`constant`] and [`empty`].

use std::sync::Arc;

use coerce_core::{CoerceError, Path, Value};

use crate::checker::{Checker, CheckerRef};

/// Accepts only values deep-equal to a fixed reference value.
#[derive(Debug, Clone)]
pub struct Const {
    value: Value,
}

/// A checker that succeeds only if the input deep-equals `value`.
pub fn constant(value: impl Into<Value>) -> CheckerRef {
    Arc::new(Const {
        value: value.into(),
    })
}

impl Checker for Const {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        if *value == self.value {
            Ok(value.clone())
        } else {
            Err(CoerceError::mismatch(self.value.to_string(), value, path))
        }
    }
}

/// Accepts only `Value::Null`.
#[derive(Debug, Clone)]
pub struct Empty {
    label: String,
}

/// A checker that succeeds only if the input is `Null`.
///
/// `label` names the value in the failure message (`expected empty <label>`);
/// an empty label means `"value"`.
pub fn empty(label: &str) -> CheckerRef {
    let label = if label.is_empty() { "value" } else { label };
    Arc::new(Empty {
        label: label.to_string(),
    })
}

impl Checker for Empty {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        if value.is_null() {
            Ok(Value::Null)
        } else {
            Err(CoerceError::mismatch(format!("empty {}", self.label), value, path))
        }
    }
}
