//! # Field Map Sets
//!
//! A [`FieldMapSet`] picks one of several [`Schema`] variants based on a
//! selector field (a `kind` or `type` discriminator). Each variant declares
//! its own checker for the selector; the raw selector value is probed
//! against those checkers in order, and the first variant whose selector
//! checker accepts it validates the entire input.

use std::sync::Arc;

use coerce_core::{CoerceError, DefinitionError, Path, Value};

use crate::checker::{Checker, CheckerRef};
use crate::fieldmap::Schema;

/// Dispatches a mapping to one of several structured-map variants.
#[derive(Debug, Clone)]
pub struct FieldMapSet {
    selector: String,
    variants: Vec<Variant>,
}

/// A variant schema with its selector checker resolved at construction.
#[derive(Debug, Clone)]
struct Variant {
    selector: CheckerRef,
    schema: Schema,
}

/// A checker choosing among `maps` by the value of the `selector` field.
///
/// # Errors
///
/// [`DefinitionError::NotAFieldMap`] if a checker in `maps` is not a
/// structured map, [`DefinitionError::MissingSelector`] if a variant has no
/// checker for `selector`.
pub fn field_map_set(
    selector: impl Into<String>,
    maps: impl IntoIterator<Item = CheckerRef>,
) -> Result<CheckerRef, DefinitionError> {
    Ok(Arc::new(FieldMapSet::from_checkers(selector, maps)?))
}

impl FieldMapSet {
    /// Build from structured-map variants, tried in order.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::MissingSelector`] if a variant has no checker for
    /// `selector`.
    pub fn new(
        selector: impl Into<String>,
        variants: impl IntoIterator<Item = Schema>,
    ) -> Result<Self, DefinitionError> {
        let selector = selector.into();
        let mut resolved = Vec::new();
        for (index, schema) in variants.into_iter().enumerate() {
            let Some(checker) = schema.checker(&selector).cloned() else {
                return Err(DefinitionError::MissingSelector { selector, variant: index });
            };
            resolved.push(Variant { selector: checker, schema });
        }
        Ok(Self { selector, variants: resolved })
    }

    /// Build from arbitrary checkers, each of which must be a structured map.
    ///
    /// # Errors
    ///
    /// As [`FieldMapSet::new`], plus [`DefinitionError::NotAFieldMap`].
    pub fn from_checkers(
        selector: impl Into<String>,
        maps: impl IntoIterator<Item = CheckerRef>,
    ) -> Result<Self, DefinitionError> {
        let variants = maps
            .into_iter()
            .enumerate()
            .map(|(variant, checker)| {
                checker
                    .as_schema()
                    .cloned()
                    .ok_or(DefinitionError::NotAFieldMap { variant })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(selector, variants)
    }

    /// The selector field name.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The variants, in probe order.
    pub fn variants(&self) -> impl ExactSizeIterator<Item = &Schema> + '_ {
        self.variants.iter().map(|variant| &variant.schema)
    }
}

impl Checker for FieldMapSet {
    fn coerce(&self, value: &Value, path: &Path) -> Result<Value, CoerceError> {
        if !value.is_map() {
            return Err(CoerceError::mismatch("map", value, path));
        }

        let selector_path = path.field(&self.selector);
        let Some(raw) = value.get(&self.selector) else {
            return Err(CoerceError::mismatch("supported selector", &Value::Null, &selector_path));
        };

        for (index, variant) in self.variants.iter().enumerate() {
            match variant.selector.coerce(raw, &selector_path) {
                Ok(_) => {
                    tracing::trace!(selector = %self.selector, variant = index, "selected field map variant");
                    return variant.schema.coerce(value, path);
                }
                Err(err) if err.is_definition() => return Err(err),
                Err(_) => continue,
            }
        }

        Err(CoerceError::mismatch("supported selector", raw, &selector_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::any;
    use crate::constant::constant;
    use crate::fieldmap::{defaults, field_map, fields, Defaults, DefaultValue};
    use crate::leaf::{int, string};
    use serde_json::json;

    fn a_path() -> Path {
        Path::from_segments(["<pa", "th>"])
    }

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn shapes() -> FieldMapSet {
        let circle = field_map(
            fields([("kind", constant("circle")), ("radius", int())]),
            Defaults::new(),
        );
        let rect = field_map(
            fields([("kind", constant("rect")), ("width", int()), ("height", int())]),
            defaults([("height", Value::Int(1))]),
        );
        FieldMapSet::new("kind", [circle, rect]).unwrap()
    }

    #[test]
    fn dispatches_on_selector() {
        let set = shapes();
        let out = set
            .coerce(&v(json!({"kind": "rect", "width": "3"})), &a_path())
            .unwrap();
        assert_eq!(out, v(json!({"kind": "rect", "width": 3, "height": 1})));

        let out = set
            .coerce(&v(json!({"kind": "circle", "radius": 2, "width": 9})), &a_path())
            .unwrap();
        assert_eq!(out, v(json!({"kind": "circle", "radius": 2})));
    }

    #[test]
    fn selected_variant_errors_propagate() {
        let err = shapes()
            .coerce(&v(json!({"kind": "rect", "width": "wide"})), &a_path())
            .unwrap_err();
        assert_eq!(err.to_string(), "<path>.width: expected int, got string(\"wide\")");
    }

    #[test]
    fn unsupported_selector() {
        let err = shapes()
            .coerce(&v(json!({"kind": "hexagon"})), &a_path())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "<path>.kind: expected supported selector, got string(\"hexagon\")"
        );
    }

    #[test]
    fn missing_selector_field() {
        let err = shapes().coerce(&v(json!({"radius": 1})), &a_path()).unwrap_err();
        assert_eq!(err.to_string(), "<path>.kind: expected supported selector, got nothing");
    }

    #[test]
    fn non_map_input() {
        let err = shapes().coerce(&Value::from("rect"), &a_path()).unwrap_err();
        assert_eq!(err.to_string(), "<path>: expected map, got string(\"rect\")");
    }

    #[test]
    fn first_accepting_variant_wins() {
        let specific = field_map(
            fields([("kind", constant("a")), ("x", int())]),
            Defaults::new(),
        );
        let catch_all = field_map(fields([("kind", string())]), Defaults::new());
        let set = FieldMapSet::new("kind", [specific, catch_all]).unwrap();
        assert_eq!(set.selector(), "kind");
        assert_eq!(set.variants().len(), 2);

        let out = set.coerce(&v(json!({"kind": "a", "x": 1})), &a_path()).unwrap();
        assert_eq!(out, v(json!({"kind": "a", "x": 1})));

        let out = set.coerce(&v(json!({"kind": "b", "x": 1})), &a_path()).unwrap();
        assert_eq!(out, v(json!({"kind": "b"})));
    }

    #[test]
    fn construction_requires_selector_checker() {
        let ok = field_map(fields([("kind", any())]), Defaults::new());
        let missing = field_map(fields([("other", any())]), Defaults::new());
        let err = FieldMapSet::new("kind", [ok, missing]).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::MissingSelector {
                selector: "kind".into(),
                variant: 1
            }
        );
    }

    #[test]
    fn construction_requires_field_maps() {
        let ok = field_map(fields([("kind", any())]), Defaults::new()).into_checker();
        let err = field_map_set("kind", [ok, int()]).unwrap_err();
        assert_eq!(err, DefinitionError::NotAFieldMap { variant: 1 });
    }

    #[test]
    fn field_map_set_from_checkers() {
        let a = field_map(
            fields([("kind", constant("x")), ("n", int())]),
            defaults([("n", DefaultValue::Omit)]),
        )
        .into_checker();
        let checker = field_map_set("kind", [a]).unwrap();
        let out = checker.coerce(&v(json!({"kind": "x"})), &a_path()).unwrap();
        assert_eq!(out, v(json!({"kind": "x"})));
    }

    #[test]
    fn broken_selected_variant_reports_definition_error() {
        let broken = field_map(
            fields([("kind", any())]),
            defaults([("ghost", Value::Int(1))]),
        );
        let set = FieldMapSet::new("kind", [broken]).unwrap();
        let err = set.coerce(&v(json!({"kind": "x"})), &a_path()).unwrap_err();
        assert!(err.is_definition());
    }
}
