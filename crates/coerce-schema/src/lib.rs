//! # coerce-schema — Checker Combinators & Structured-Map Validation
//!
//! Schemas are assembled programmatically from composable [`Checker`]
//! values and then used to coerce dynamically-typed input into canonical
//! output:
//!
//! ```
//! use coerce_core::{Path, Value};
//! use coerce_schema::{int, string, time_duration_string, Checker, Schema};
//!
//! let schema = Schema::builder()
//!     .field("name", string())
//!     .field("port", int())
//!     .field("timeout", time_duration_string())
//!     .default_value("timeout", "30s")
//!     .strict(true)
//!     .build()
//!     .expect("valid schema");
//!
//! let input: Value = serde_json::json!({"name": "web", "port": "8080"}).into();
//! let out = schema.coerce(&input, &Path::root()).expect("valid input");
//! assert_eq!(out.get("port"), Some(&Value::Int(8080)));
//! assert_eq!(out.get("timeout"), Some(&Value::from("30s")));
//! ```
//!
//! ## Modules
//!
//! - [`checker`]: the [`Checker`] trait, [`any`] and [`one_of`].
//! - [`constant`](mod@constant): [`constant()`] and [`empty`].
//! - [`fieldmap`]: [`Schema`] (`field_map`, `strict_field_map`, builder),
//!   defaults and dependencies.
//! - [`mapset`]: [`FieldMapSet`], selector-based dispatch between schemas.
//! - [`leaf`]: scalar and collection checkers.
//! - [`duration`]: duration checkers.
//!
//! ## Crate Policy
//!
//! - Checker trees are immutable once built; `Checker: Send + Sync`.
//! - Schema-definition bugs surface as `DefinitionError`, never as panics,
//!   and are never swallowed by alternation.
//! - Logging goes through `tracing`; this crate installs no subscriber.

pub mod checker;
pub mod constant;
pub mod duration;
pub mod fieldmap;
pub mod leaf;
pub mod mapset;

pub use checker::{any, one_of, Checker, CheckerRef, OneOf};
pub use constant::{constant, empty};
pub use duration::{time_duration, time_duration_string};
pub use fieldmap::{
    defaults, field_map, fields, strict_field_map, DefaultValue, Defaults, Dependencies,
    Dependency, Fields, Schema, SchemaBuilder,
};
pub use leaf::{bool, float, int, list, map, string, string_map};
pub use mapset::{field_map_set, FieldMapSet};
