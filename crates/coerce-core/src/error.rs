//! # Error Types — Structured Error Hierarchy
//!
//! Every checker fails with a [`CoerceError`]. There are two classes:
//!
//! - **Validation errors** reject a particular input. They carry the path at
//!   which the problem was found and, where one applies, the expected shape
//!   and the offending value. Alternation (`OneOf`, selector dispatch)
//!   may discard them and try another branch.
//! - **Definition errors** ([`DefinitionError`]) mean the schema itself was
//!   assembled incorrectly. They are never discarded by alternation and
//!   should surface during development, not in production.

use thiserror::Error;

use crate::path::Path;
use crate::value::Value;

/// Failure to coerce a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoerceError {
    /// The value does not have the expected shape.
    #[error("{}expected {expected}, got {}", .path.prefix(), describe(.got))]
    Mismatch {
        /// Description of the accepted shape, e.g. `map` or `"A"`.
        expected: String,
        /// The offending value.
        got: Value,
        /// Where the value was found.
        path: Path,
    },

    /// No alternative accepted the value and no single expected shape applies.
    #[error("{}unexpected value {got}", .path.prefix())]
    Unexpected {
        /// The offending value.
        got: Value,
        /// Where the value was found.
        path: Path,
    },

    /// The value had an acceptable type but its content could not be converted.
    #[error("{}{reason}", .path.prefix())]
    Conversion {
        /// Human-readable reason, e.g. the underlying parse error.
        reason: String,
        /// Where the value was found.
        path: Path,
    },

    /// A strict structured map received a key it has no checker for.
    #[error("{}unknown key {key:?} (value {value})", .path.prefix())]
    UnknownKey {
        /// The unrecognized key.
        key: String,
        /// The value stored under the key.
        value: Value,
        /// Path of the map containing the key.
        path: Path,
    },

    /// A dependent field is present but the field it depends on holds a
    /// different value.
    #[error(
        "{}field {field:?} should not be specified when {depends_on:?} is {actual}. \
         {field:?} requires {depends_on:?} to have value {required}",
        .path.prefix()
    )]
    DependencyConflict {
        /// The dependent field.
        field: String,
        /// The field depended on.
        depends_on: String,
        /// The coerced value of `depends_on`.
        actual: Value,
        /// The value `depends_on` must hold for `field` to be allowed.
        required: Value,
        /// Path of the map holding both fields.
        path: Path,
    },

    /// A dependent field is present but the field it depends on is absent.
    #[error(
        "{}field {field:?} requires value {required} be specified for {depends_on:?}, \
         but it is not specified",
        .path.prefix()
    )]
    DependencyUnsatisfied {
        /// The dependent field.
        field: String,
        /// The absent field depended on.
        depends_on: String,
        /// The value `depends_on` must hold for `field` to be allowed.
        required: Value,
        /// Path of the map holding both fields.
        path: Path,
    },

    /// The depended-on field holds the required value but the dependent
    /// field, which is mandatory in that case, is absent.
    #[error(
        "{}field {depends_on:?} exists with value {actual}, but required field {field:?} is missing",
        .path.prefix()
    )]
    DependencyMissing {
        /// The missing dependent field.
        field: String,
        /// The field depended on.
        depends_on: String,
        /// The coerced value of `depends_on`.
        actual: Value,
        /// Path of the map holding both fields.
        path: Path,
    },

    /// The schema was assembled incorrectly.
    #[error("schema definition error: {0}")]
    Definition(#[from] DefinitionError),
}

impl CoerceError {
    /// Returns true if this error reports a schema bug rather than bad input.
    pub fn is_definition(&self) -> bool {
        matches!(self, CoerceError::Definition(_))
    }

    /// The path at which the error was detected, if it has one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            CoerceError::Mismatch { path, .. }
            | CoerceError::Unexpected { path, .. }
            | CoerceError::Conversion { path, .. }
            | CoerceError::UnknownKey { path, .. }
            | CoerceError::DependencyConflict { path, .. }
            | CoerceError::DependencyUnsatisfied { path, .. }
            | CoerceError::DependencyMissing { path, .. } => Some(path),
            CoerceError::Definition(_) => None,
        }
    }

    /// Shorthand for [`CoerceError::Mismatch`].
    pub fn mismatch(expected: impl Into<String>, got: &Value, path: &Path) -> Self {
        CoerceError::Mismatch {
            expected: expected.into(),
            got: got.clone(),
            path: path.clone(),
        }
    }
}

/// A schema constructed in a way that can never validate correctly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A default value names a field that has no checker.
    #[error("got default value for unknown field {field:?}")]
    DefaultForUnknownField {
        /// The field named by the default.
        field: String,
    },

    /// A dependency is declared for a field that has no checker.
    #[error("dependency declared for unknown field {field:?}")]
    DependencyForUnknownField {
        /// The dependent field.
        field: String,
    },

    /// A dependency refers to a depended-on field that has no checker.
    #[error("field {field:?} depends on unknown field {depends_on:?}")]
    DependencyOnUnknownField {
        /// The dependent field.
        field: String,
        /// The depended-on field without a checker.
        depends_on: String,
    },

    /// A field map set variant has no checker for the selector field.
    #[error("field map set variant {variant} has no checker for selector {selector:?}")]
    MissingSelector {
        /// The selector field name.
        selector: String,
        /// Zero-based index of the offending variant.
        variant: usize,
    },

    /// A field map set was given a checker that is not a structured map.
    #[error("field map set variant {variant} is not a field map")]
    NotAFieldMap {
        /// Zero-based index of the offending variant.
        variant: usize,
    },
}

/// Renders the received value for mismatch messages: `nothing` for `Null`,
/// otherwise `kind(value)`.
fn describe(value: &Value) -> String {
    if value.is_null() {
        "nothing".to_string()
    } else {
        format!("{}({value})", value.kind())
    }
}
