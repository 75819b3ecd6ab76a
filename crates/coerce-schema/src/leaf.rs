//! # Leaf Checkers
//!
//! Scalar and collection checkers that sit at the edges of a schema tree.
//! Each one accepts its native [`Value`] variant, plus the string spellings
//! that configuration files commonly use where noted.

use std::sync::Arc;

use coerce_core::{CoerceError, Path, Value};

use crate::checker::{Checker, CheckerRef};

/// Accepts strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringChecker;

/// A checker accepting string values.
pub fn string() -> CheckerRef {
    Arc::new(StringChecker)
}

impl Checker for StringChecker {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(CoerceError::mismatch("string", value, path)),
        }
    }
}

/// Accepts integers and integer strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntChecker;

/// A checker accepting integers, or strings holding an integer literal
/// (optional sign; `0x`, `0o`, `0b` or leading-`0` octal prefixes).
pub fn int() -> CheckerRef {
    Arc::new(IntChecker)
}

impl Checker for IntChecker {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        match value {
            Value::Int(_) => Ok(value.clone()),
            Value::String(s) => parse_int(s)
                .map(Value::Int)
                .ok_or_else(|| CoerceError::mismatch("int", value, path)),
            _ => Err(CoerceError::mismatch("int", value, path)),
        }
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = if let Some(d) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, d)
    } else if let Some(d) = unsigned
        .strip_prefix("0o")
        .or_else(|| unsigned.strip_prefix("0O"))
    {
        (8, d)
    } else if let Some(d) = unsigned
        .strip_prefix("0b")
        .or_else(|| unsigned.strip_prefix("0B"))
    {
        (2, d)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i128::from(u64::from_str_radix(digits, radix).ok()?);
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

/// Accepts floating-point numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatChecker;

/// A checker accepting float values only; integers are not widened.
pub fn float() -> CheckerRef {
    Arc::new(FloatChecker)
}

impl Checker for FloatChecker {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        match value {
            Value::Float(_) => Ok(value.clone()),
            _ => Err(CoerceError::mismatch("float", value, path)),
        }
    }
}

/// Accepts booleans and boolean strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolChecker;

/// A checker accepting booleans, or one of the strings
/// `1 t T TRUE true True` / `0 f F FALSE false False`.
pub fn bool() -> CheckerRef {
    Arc::new(BoolChecker)
}

impl Checker for BoolChecker {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => match s.as_str() {
                "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(Value::Bool(true)),
                "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(Value::Bool(false)),
                _ => Err(CoerceError::mismatch("bool", value, path)),
            },
            _ => Err(CoerceError::mismatch("bool", value, path)),
        }
    }
}

/// Accepts lists whose elements all pass `elem`.
#[derive(Debug, Clone)]
pub struct ListChecker {
    elem: CheckerRef,
}

/// A checker accepting lists, coercing every element with `elem`.
pub fn list(elem: CheckerRef) -> CheckerRef {
    Arc::new(ListChecker { elem })
}

impl Checker for ListChecker {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        let Value::List(items) = value else {
            return Err(CoerceError::mismatch("list", value, path));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.elem.coerce(item, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}

/// Accepts mappings whose keys pass `key` and values pass `value`.
#[derive(Debug, Clone)]
pub struct MapChecker {
    key: CheckerRef,
    value: CheckerRef,
}

/// A checker accepting mappings, coercing every key with `key` and every
/// value with `value`.
///
/// The result is a `Value::Map` when every coerced key is a string, and a
/// `Value::AnyMap` otherwise.
pub fn map(key: CheckerRef, value: CheckerRef) -> CheckerRef {
    Arc::new(MapChecker { key, value })
}

/// A checker accepting string-keyed mappings whose values pass `value`.
pub fn string_map(value: CheckerRef) -> CheckerRef {
    map(string(), value)
}

impl Checker for MapChecker {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        let entries: Vec<(Value, &Value)> = match value {
            Value::Map(map) => map
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), v))
                .collect(),
            Value::AnyMap(entries) => entries.iter().map(|(k, v)| (k.clone(), v)).collect(),
            _ => return Err(CoerceError::mismatch("map", value, path)),
        };

        let mut coerced = Vec::with_capacity(entries.len());
        for (key, item) in entries {
            let field = match &key {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let new_key = self.key.coerce(&key, path)?;
            let new_item = self.value.coerce(item, &path.field(&field))?;
            coerced.push((new_key, new_item));
        }

        if coerced.iter().all(|(k, _)| matches!(k, Value::String(_))) {
            let mut out = coerce_core::Map::new();
            for (key, item) in coerced {
                if let Value::String(key) = key {
                    out.insert(key, item);
                }
            }
            Ok(Value::Map(out))
        } else {
            Ok(Value::AnyMap(coerced))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn a_path() -> Path {
        Path::from_segments(["<pa", "th>"])
    }

    #[test]
    fn string_checker() {
        let checker = string();
        assert_eq!(checker.coerce(&Value::from("x"), &a_path()).unwrap(), Value::from("x"));
        let err = checker.coerce(&Value::Int(1), &a_path()).unwrap_err();
        assert_eq!(err.to_string(), "<path>: expected string, got int(1)");
        let err = checker.coerce(&Value::Null, &a_path()).unwrap_err();
        assert_eq!(err.to_string(), "<path>: expected string, got nothing");
    }

    #[test]
    fn int_checker_parses_strings() {
        let checker = int();
        assert_eq!(checker.coerce(&Value::Int(5), &a_path()).unwrap(), Value::Int(5));
        assert_eq!(checker.coerce(&Value::from("42"), &a_path()).unwrap(), Value::Int(42));
        assert_eq!(checker.coerce(&Value::from("-42"), &a_path()).unwrap(), Value::Int(-42));
        assert_eq!(checker.coerce(&Value::from("0x1f"), &a_path()).unwrap(), Value::Int(31));
        assert_eq!(checker.coerce(&Value::from("017"), &a_path()).unwrap(), Value::Int(15));
        assert_eq!(checker.coerce(&Value::from("0b101"), &a_path()).unwrap(), Value::Int(5));
        assert_eq!(
            checker.coerce(&Value::from("-9223372036854775808"), &a_path()).unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn int_checker_rejects() {
        let checker = int();
        for bad in [
            Value::from(""),
            Value::from("x"),
            Value::from("--1"),
            Value::from("9223372036854775808"),
            Value::Float(1.5),
            Value::Null,
        ] {
            assert!(checker.coerce(&bad, &a_path()).is_err(), "accepted {bad}");
        }
        let err = checker.coerce(&Value::from("x"), &a_path()).unwrap_err();
        assert_eq!(err.to_string(), "<path>: expected int, got string(\"x\")");
    }

    #[test]
    fn float_checker_does_not_widen() {
        let checker = float();
        assert_eq!(checker.coerce(&Value::Float(0.5), &a_path()).unwrap(), Value::Float(0.5));
        assert!(checker.coerce(&Value::Int(1), &a_path()).is_err());
    }

    #[test]
    fn bool_checker_parses_strings() {
        let checker = bool();
        assert_eq!(checker.coerce(&Value::Bool(true), &a_path()).unwrap(), Value::Bool(true));
        assert_eq!(checker.coerce(&Value::from("T"), &a_path()).unwrap(), Value::Bool(true));
        assert_eq!(checker.coerce(&Value::from("false"), &a_path()).unwrap(), Value::Bool(false));
        assert!(checker.coerce(&Value::from("yes"), &a_path()).is_err());
        assert!(checker.coerce(&Value::Int(1), &a_path()).is_err());
    }

    #[test]
    fn list_checker_reports_element_path() {
        let checker = list(int());
        let out = checker
            .coerce(&Value::from(json!([1, "2"])), &a_path())
            .unwrap();
        assert_eq!(out, Value::from(json!([1, 2])));

        let err = checker
            .coerce(&Value::from(json!([1, "x"])), &a_path())
            .unwrap_err();
        assert_eq!(err.to_string(), "<path>[1]: expected int, got string(\"x\")");

        let err = checker.coerce(&Value::from("x"), &a_path()).unwrap_err();
        assert_eq!(err.to_string(), "<path>: expected list, got string(\"x\")");
    }

    #[test]
    fn map_checker_coerces_keys_and_values() {
        let checker = map(string(), int());
        let out = checker
            .coerce(&Value::from(json!({"a": "1", "b": 2})), &a_path())
            .unwrap();
        assert_eq!(out, Value::from(json!({"a": 1, "b": 2})));

        let err = checker
            .coerce(&Value::from(json!({"a": "x"})), &a_path())
            .unwrap_err();
        assert_eq!(err.to_string(), "<path>.a: expected int, got string(\"x\")");
    }

    #[test]
    fn map_checker_keeps_non_string_keys() {
        let checker = map(int(), string());
        let input = Value::AnyMap(vec![(Value::from("1"), Value::from("one"))]);
        let out = checker.coerce(&input, &a_path()).unwrap();
        assert_eq!(out, Value::AnyMap(vec![(Value::Int(1), Value::from("one"))]));
    }

    #[test]
    fn string_map_rejects_non_string_keys() {
        let checker = string_map(any_value());
        let input = Value::AnyMap(vec![(Value::Int(1), Value::from("one"))]);
        let err = checker.coerce(&input, &a_path()).unwrap_err();
        assert_eq!(err.to_string(), "<path>: expected string, got int(1)");
    }

    fn any_value() -> CheckerRef {
        crate::checker::any()
    }
}
