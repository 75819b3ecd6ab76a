//! # coerce-core — Foundational Types for the Coercion Engine
//!
//! This crate defines the data every checker in the workspace speaks:
//! the dynamically-typed [`Value`] fed into and produced by coercion, the
//! [`Path`] that locates a value inside nested input for error messages,
//! and the [`CoerceError`] hierarchy. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One tagged union for untyped data.** Decoded JSON, decoded YAML and
//!    the composites produced by nested checkers all share [`Value`]. The
//!    string-keyed mapping is its own variant (`Value::Map`), so the common
//!    case needs no runtime key inspection. Mappings whose keys are arbitrary
//!    values (legal in YAML) arrive as `Value::AnyMap` and are checked once,
//!    at the structured-map shape check.
//!
//! 2. **Deep equality is `PartialEq`.** Constants and dependency values are
//!    compared structurally through lists and maps; `AnyMap` compares as an
//!    unordered mapping.
//!
//! 3. **Two error classes.** Input rejections and schema-definition bugs are
//!    both [`CoerceError`]s, but [`CoerceError::is_definition`] tells them
//!    apart so alternation never hides a broken schema.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `coerce-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod duration;
pub mod error;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use duration::{format_duration, parse_duration, DurationParseError};
pub use error::{CoerceError, DefinitionError};
pub use path::Path;
pub use value::{Map, MapShapeError, Value};
