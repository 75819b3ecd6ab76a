//! # Structured-Map Validation
//!
//! A [`Schema`] validates a string-keyed mapping: one checker per field,
//! optional per-field defaults, optional strictness (reject unknown keys),
//! and if-and-only-if dependencies between pairs of fields.
//!
//! ## Coercion Order
//!
//! 1. Shape check: the input must be a mapping (`"map"`) whose keys are all
//!    strings (`"map[string]"`).
//! 2. Strict check: with `strict` set, any key without a checker is rejected.
//! 3. Per-field coercion over the checkers. A present value is coerced; an
//!    absent field with a literal default has the default coerced in its
//!    place; an absent field with an `Omit` default, a dependency, or
//!    nothing at all is left out of the output.
//! 4. Default backfill: a literal default whose field is still missing from
//!    the output has its checker run against the whole input map. A default
//!    for a field without a checker is a [`DefinitionError`].
//! 5. Dependency resolution against the coerced output.
//!
//! The first failure aborts the call; no partial output is returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use coerce_core::{CoerceError, DefinitionError, Map, MapShapeError, Path, Value};

use crate::checker::{Checker, CheckerRef};

/// Field name to checker.
pub type Fields = BTreeMap<String, CheckerRef>;

/// Field name to default.
pub type Defaults = BTreeMap<String, DefaultValue>;

/// Field name to the dependency governing its presence.
pub type Dependencies = BTreeMap<String, Dependency>;

/// Default for a field absent from the input.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Leave the field out of the output.
    Omit,
    /// Use this value as if it had been present. It is still passed through
    /// the field's checker.
    Value(Value),
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Value(value)
    }
}

/// If-and-only-if presence constraint on a field.
///
/// The dependent field must be present exactly when `depends_on` is present
/// and its coerced value equals `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    /// The field depended on.
    pub depends_on: String,
    /// The value of `depends_on` that makes the dependent field required.
    /// Any other value forbids it.
    pub value: Value,
}

impl Dependency {
    /// A dependency on `depends_on` holding `value`.
    pub fn new(depends_on: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            depends_on: depends_on.into(),
            value: value.into(),
        }
    }
}

/// Validator for a collection of related named fields.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    checkers: Fields,
    defaults: Defaults,
    dependencies: Dependencies,
    strict: bool,
}

/// A structured-map checker. Fields without a default and without a value
/// in the input are left out of the output.
///
/// Definition problems in `defaults` are reported when coercing; use
/// [`Schema::builder`] to catch them at construction instead.
pub fn field_map(checkers: Fields, defaults: Defaults) -> Schema {
    Schema {
        checkers,
        defaults,
        ..Schema::default()
    }
}

/// Like [`field_map`], but keys without a checker are rejected.
pub fn strict_field_map(checkers: Fields, defaults: Defaults) -> Schema {
    Schema {
        strict: true,
        ..field_map(checkers, defaults)
    }
}

/// Collects `(name, checker)` pairs into [`Fields`].
pub fn fields<K: Into<String>>(entries: impl IntoIterator<Item = (K, CheckerRef)>) -> Fields {
    entries.into_iter().map(|(k, c)| (k.into(), c)).collect()
}

/// Collects `(name, default)` pairs into [`Defaults`].
pub fn defaults<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Defaults
where
    K: Into<String>,
    V: Into<DefaultValue>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

impl Schema {
    /// Start building a schema with dependencies or strictness.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// The checker for `field`, if declared.
    pub fn checker(&self, field: &str) -> Option<&CheckerRef> {
        self.checkers.get(field)
    }

    /// All declared checkers.
    pub fn checkers(&self) -> &Fields {
        &self.checkers
    }

    /// All declared defaults.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// All declared dependencies.
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// Whether unknown keys are rejected.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Wrap in a shared [`CheckerRef`].
    pub fn into_checker(self) -> CheckerRef {
        Arc::new(self)
    }

    /// Check that every default and dependency refers to a declared field.
    ///
    /// # Errors
    ///
    /// The first [`DefinitionError`] found, in field-name order.
    pub fn validate_definition(&self) -> Result<(), DefinitionError> {
        if let Some(field) = self.defaults.keys().find(|f| !self.checkers.contains_key(*f)) {
            return Err(DefinitionError::DefaultForUnknownField {
                field: field.clone(),
            });
        }
        for (field, dep) in &self.dependencies {
            if !self.checkers.contains_key(field) {
                return Err(DefinitionError::DependencyForUnknownField {
                    field: field.clone(),
                });
            }
            if !self.checkers.contains_key(&dep.depends_on) {
                return Err(DefinitionError::DependencyOnUnknownField {
                    field: field.clone(),
                    depends_on: dep.depends_on.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_dependency(
        &self,
        field: &str,
        dep: &Dependency,
        out: &Map,
        path: &Path,
    ) -> Result<(), CoerceError> {
        let actual = out.get(&dep.depends_on);
        let field_present = out.contains_key(field);
        let equal = actual.is_some_and(|a| *a == dep.value);

        let err = match (field_present, actual) {
            (true, Some(actual)) if !equal => CoerceError::DependencyConflict {
                field: field.to_string(),
                depends_on: dep.depends_on.clone(),
                actual: actual.clone(),
                required: dep.value.clone(),
                path: path.clone(),
            },
            (true, None) => CoerceError::DependencyUnsatisfied {
                field: field.to_string(),
                depends_on: dep.depends_on.clone(),
                required: dep.value.clone(),
                path: path.clone(),
            },
            (false, Some(actual)) if equal => CoerceError::DependencyMissing {
                field: field.to_string(),
                depends_on: dep.depends_on.clone(),
                actual: actual.clone(),
                path: path.clone(),
            },
            // Neither present, both present and matching, or only the
            // depended-on field present with some other value.
            _ => return Ok(()),
        };
        tracing::debug!(field, depends_on = %dep.depends_on, path = %path, "dependency not satisfied");
        Err(err)
    }
}

impl Checker for Schema {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        let input = match value.to_string_map() {
            Ok(map) => map,
            Err(MapShapeError::NotAMap) => return Err(CoerceError::mismatch("map", value, path)),
            Err(MapShapeError::NonStringKey) => {
                return Err(CoerceError::mismatch("map[string]", value, path))
            }
        };

        if self.strict {
            if let Some((key, item)) = input.iter().find(|(k, _)| !self.checkers.contains_key(*k)) {
                return Err(CoerceError::UnknownKey {
                    key: key.clone(),
                    value: item.clone(),
                    path: path.clone(),
                });
            }
        }

        let mut out = Map::new();
        for (name, checker) in &self.checkers {
            let field_value = match (input.get(name), self.defaults.get(name)) {
                (Some(present), _) => present,
                (None, Some(DefaultValue::Value(default))) => default,
                // Omit default, dependency (resolved below), or no default:
                // the field stays out of the output.
                (None, _) => continue,
            };
            let coerced = checker.coerce(field_value, &path.field(name))?;
            out.insert(name.clone(), coerced);
        }

        for (name, default) in &self.defaults {
            if matches!(default, DefaultValue::Omit) || out.contains_key(name) {
                continue;
            }
            let Some(checker) = self.checkers.get(name) else {
                tracing::warn!(field = %name, "default value declared for field without a checker");
                return Err(DefinitionError::DefaultForUnknownField {
                    field: name.clone(),
                }
                .into());
            };
            // The checker sees the whole input map here, not the default.
            tracing::debug!(field = %name, path = %path, "backfilling default from whole input map");
            let coerced = checker.coerce(value, &path.field(name))?;
            out.insert(name.clone(), coerced);
        }

        for (name, dep) in &self.dependencies {
            self.check_dependency(name, dep, &out, path)?;
        }

        Ok(Value::Map(out))
    }

    fn as_schema(&self) -> Option<&Schema> {
        Some(self)
    }
}

/// Builder for a [`Schema`] whose definition is validated up front.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declare `name` with its checker.
    pub fn field(mut self, name: impl Into<String>, checker: CheckerRef) -> Self {
        self.schema.checkers.insert(name.into(), checker);
        self
    }

    /// Default `name` to `value` when absent.
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.schema
            .defaults
            .insert(name.into(), DefaultValue::Value(value.into()));
        self
    }

    /// Leave `name` out of the output when absent.
    pub fn omit(mut self, name: impl Into<String>) -> Self {
        self.schema.defaults.insert(name.into(), DefaultValue::Omit);
        self
    }

    /// Require `name` exactly when `depends_on` is present and equals `value`.
    pub fn depends(
        mut self,
        name: impl Into<String>,
        depends_on: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.schema
            .dependencies
            .insert(name.into(), Dependency::new(depends_on, value));
        self
    }

    /// Reject keys without a checker.
    pub fn strict(mut self, strict: bool) -> Self {
        self.schema.strict = strict;
        self
    }

    /// Finish the schema.
    ///
    /// # Errors
    ///
    /// A [`DefinitionError`] if a default or dependency names an undeclared
    /// field.
    pub fn build(self) -> Result<Schema, DefinitionError> {
        self.schema.validate_definition()?;
        Ok(self.schema)
    }
}
