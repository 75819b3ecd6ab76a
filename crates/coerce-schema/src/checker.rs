//! # The Checker Contract
//!
//! A [`Checker`] coerces a dynamically-typed [`Value`] into its canonical
//! form, or rejects it with a [`CoerceError`] carrying the path at which
//! the problem was found. Checkers compose: a structured map holds one
//! checker per field, `OneOf` holds an ordered list of alternatives, and
//! so on, forming a tree that mirrors the expected shape of valid input.
//!
//! Checker trees are built once and never mutated, so they are shared
//! through [`CheckerRef`] and may be used from many threads at once.

use std::fmt;
use std::sync::Arc;

use coerce_core::{CoerceError, Path, Value};

use crate::fieldmap::Schema;

/// Shared handle to a checker.
pub type CheckerRef = Arc<dyn Checker>;

/// A composable validator that converts or rejects a value.
pub trait Checker: fmt::Debug + Send + Sync {
    /// Coerce `value`, found at `path`, into its canonical form.
    ///
    /// On success the returned value replaces `value` at the recursion
    /// point. On failure, combinators such as `OneOf` may try another
    /// alternative; everything else propagates the error unchanged.
    ///
    /// # Errors
    ///
    /// A validation [`CoerceError`] when `value` is unacceptable, or
    /// [`CoerceError::Definition`] when the checker itself is malformed.
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError>;

    /// The structured-map validator behind this checker, if it is one.
    fn as_schema(&self) -> Option<&Schema> {
        None
    }
}

/// Accepts every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyChecker;

/// A checker that succeeds with any input and returns it unprocessed.
pub fn any() -> CheckerRef {
    Arc::new(AnyChecker)
}

impl Checker for AnyChecker {
    fn coerce(&self, value: &Value, _path: &Path) -> Result<Value, CoerceError> {
        Ok(value.clone())
    }
}

/// Ordered alternation; the first alternative that accepts wins.
#[derive(Debug, Clone)]
pub struct OneOf {
    options: Vec<CheckerRef>,
}

/// A checker that tries each of `options` in order and returns the result
/// of the first one that succeeds.
///
/// If every option fails the error is deliberately generic (no single
/// expected shape applies), so options should be ordered cheapest and most
/// common first, and overlapping options rely on order: first match wins,
/// not best match.
pub fn one_of(options: impl IntoIterator<Item = CheckerRef>) -> CheckerRef {
    Arc::new(OneOf::new(options))
}

impl OneOf {
    /// Build the alternation from an ordered list of options.
    pub fn new(options: impl IntoIterator<Item = CheckerRef>) -> Self {
        Self {
            options: options.into_iter().collect(),
        }
    }

    /// The alternatives, in the order they are tried.
    pub fn options(&self) -> &[CheckerRef] {
        &self.options
    }
}

impl Checker for OneOf {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        for (index, option) in self.options.iter().enumerate() {
            match option.coerce(value, path) {
                Ok(coerced) => return Ok(coerced),
                Err(err) if err.is_definition() => return Err(err),
                Err(err) => {
                    tracing::trace!(alternative = index, path = %path, error = %err, "alternative rejected value");
                }
            }
        }
        Err(CoerceError::Unexpected {
            got: value.clone(),
            path: path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::constant;
    use crate::leaf::{int, string};
    use coerce_core::DefinitionError;
    use serde_json::json;

    fn a_path() -> Path {
        Path::from_segments(["<pa", "th>"])
    }

    #[derive(Debug)]
    struct Broken;

    impl Checker for Broken {
        fn coerce(&self, _value: &Value, _path: &Path) -> Result<Value, CoerceError> {
            Err(DefinitionError::DefaultForUnknownField { field: "x".into() }.into())
        }
    }

    #[test]
    fn any_returns_input_unchanged() {
        let checker = any();
        for value in [
            Value::Null,
            Value::Int(42),
            Value::from("x"),
            Value::from(json!({"a": [1, 2, {"b": null}]})),
        ] {
            assert_eq!(checker.coerce(&value, &a_path()).unwrap(), value);
        }
    }

    #[test]
    fn one_of_first_success_wins() {
        let checker = one_of([constant(1), constant(2)]);
        assert_eq!(checker.coerce(&Value::Int(2), &a_path()).unwrap(), Value::Int(2));
    }

    #[test]
    fn one_of_all_fail_is_generic() {
        let checker = one_of([constant(1), constant(2)]);
        let err = checker.coerce(&Value::Int(3), &a_path()).unwrap_err();
        assert_eq!(
            err,
            CoerceError::Unexpected {
                got: Value::Int(3),
                path: a_path()
            }
        );
        assert_eq!(err.to_string(), "<path>: unexpected value 3");
    }

    #[test]
    fn one_of_order_decides_overlap() {
        // Both accept "7"; the first converts it, the second keeps the string.
        let int_first = one_of([int(), string()]);
        assert_eq!(int_first.coerce(&Value::from("7"), &a_path()).unwrap(), Value::Int(7));

        let string_first = one_of([string(), int()]);
        assert_eq!(
            string_first.coerce(&Value::from("7"), &a_path()).unwrap(),
            Value::from("7")
        );
    }

    #[test]
    fn one_of_stops_at_first_match() {
        // A broken option after the matching one is never reached.
        let checker = one_of([constant(1), Arc::new(Broken) as CheckerRef]);
        assert_eq!(checker.coerce(&Value::Int(1), &a_path()).unwrap(), Value::Int(1));
    }

    #[test]
    fn one_of_does_not_swallow_definition_errors() {
        let checker = one_of([Arc::new(Broken) as CheckerRef, any()]);
        let err = checker.coerce(&Value::Int(1), &a_path()).unwrap_err();
        assert!(err.is_definition());
    }

    #[test]
    fn empty_one_of_rejects_everything() {
        let checker = one_of([]);
        assert!(checker.coerce(&Value::Null, &a_path()).is_err());
    }
}
