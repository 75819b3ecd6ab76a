//! # Dynamically-Typed Values
//!
//! [`Value`] is the untyped datum checkers consume and produce. Its shape is
//! interpreted solely by the checker applied to it.
//!
//! ## Mappings
//!
//! - `Value::Map` holds string keys in sorted order. This is what JSON
//!   objects decode to and what structured-map checkers output.
//! - `Value::AnyMap` holds arbitrary keys in input order. YAML documents may
//!   contain keys such as `1` or `true`; the decoder keeps those mappings
//!   as `AnyMap` instead of stringifying the keys, so a checker can reject
//!   them with a precise error. Use [`Value::to_string_map`] to view either
//!   form as a string-keyed map.
//!
//! ## Equality
//!
//! `PartialEq` is deep equality: lists compare element-wise, maps compare as
//! unordered key/value sets (so an `AnyMap` with only string keys equals the
//! `Map` with the same entries). Within an `AnyMap` a later duplicate key
//! replaces an earlier one, as in lookups. Numbers of different variants never
//! compare equal (`Int(1) != Float(1.0)`).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::duration::format_duration;

/// String-keyed mapping, the canonical map representation.
pub type Map = BTreeMap<String, Value>;

/// An untyped, dynamically-typed datum.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Time span, produced by duration checkers.
    Duration(Duration),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Mapping with string keys.
    Map(Map),
    /// Mapping with arbitrary keys, in input order.
    AnyMap(Vec<(Value, Value)>),
}

/// Why a value could not be viewed as a string-keyed map.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapShapeError {
    /// The value is not a mapping at all.
    #[error("value is not a map")]
    NotAMap,
    /// The value is a mapping, but at least one key is not a string.
    #[error("map has a non-string key")]
    NonStringKey,
}

impl Value {
    /// Short type name used in error messages: `got int(42)`.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Duration(_) => "duration",
            Value::List(_) => "list",
            Value::Map(_) | Value::AnyMap(_) => "map",
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for either mapping variant.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_) | Value::AnyMap(_))
    }

    /// The string payload, if this is a `Value::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if this is a `Value::Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is a `Value::Int`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string-keyed map payload, if this is a `Value::Map`.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` in either mapping variant.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            Value::AnyMap(entries) => entries
                .iter()
                .rev()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// View this value as a string-keyed map.
    ///
    /// `Value::Map` is borrowed as is. `Value::AnyMap` is converted when
    /// every key is a string; a later duplicate key replaces an earlier one.
    ///
    /// # Errors
    ///
    /// [`MapShapeError::NotAMap`] for non-mappings and
    /// [`MapShapeError::NonStringKey`] for an `AnyMap` with a non-string key.
    pub fn to_string_map(&self) -> Result<Cow<'_, Map>, MapShapeError> {
        match self {
            Value::Map(map) => Ok(Cow::Borrowed(map)),
            Value::AnyMap(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    let Value::String(key) = key else {
                        return Err(MapShapeError::NonStringKey);
                    };
                    map.insert(key.clone(), value.clone());
                }
                Ok(Cow::Owned(map))
            }
            _ => Err(MapShapeError::NotAMap),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Map(map), any @ Value::AnyMap(_)) | (any @ Value::AnyMap(_), Value::Map(map)) => {
                any.to_string_map().is_ok_and(|converted| *converted == *map)
            }
            (Value::AnyMap(a), Value::AnyMap(b)) => {
                let (a, b) = (effective_entries(a), effective_entries(b));
                a.len() == b.len()
                    && a.iter()
                        .all(|(ka, va)| b.iter().any(|(kb, vb)| ka == kb && va == vb))
            }
            _ => false,
        }
    }
}

/// Entries of an `AnyMap` with duplicate keys collapsed, the later entry
/// winning as in [`Value::get`] and [`Value::to_string_map`].
fn effective_entries(entries: &[(Value, Value)]) -> Vec<(&Value, &Value)> {
    entries
        .iter()
        .enumerate()
        .filter(|(i, (key, _))| !entries[i + 1..].iter().any(|(later, _)| later == key))
        .map(|(_, (key, value))| (key, value))
        .collect()
}

impl fmt::Display for Value {
    /// Literal-like rendering used in error messages: strings are quoted,
    /// `Null` renders as `nil`, durations in their canonical text form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Duration(d) => f.write_str(&format_duration(*d)),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                f.write_str("}")
            }
            Value::AnyMap(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Duration(d) => serializer.serialize_str(&format_duration(*d)),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Value::AnyMap(entries) => {
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    match key {
                        Value::String(s) => out.serialize_entry(s, value)?,
                        other => out.serialize_entry(&other.to_string(), value)?,
                    }
                }
                out.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Value> for Value {
    /// JSON numbers that fit in `i64` become `Int`; every other number
    /// becomes `Float`.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Value> for Value {
    /// Mappings whose keys are all strings become `Map`; any other mapping
    /// stays an `AnyMap`. Tags are dropped.
    fn from(yaml: serde_yaml::Value) -> Self {
        match yaml {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => {
                let entries: Vec<(Value, Value)> = mapping
                    .into_iter()
                    .map(|(k, v)| (Value::from(k), Value::from(v)))
                    .collect();
                if entries.iter().all(|(k, _)| matches!(k, Value::String(_))) {
                    let mut map = Map::new();
                    for (key, value) in entries {
                        if let Value::String(key) = key {
                            map.insert(key, value);
                        }
                    }
                    Value::Map(map)
                } else {
                    Value::AnyMap(entries)
                }
            }
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}
