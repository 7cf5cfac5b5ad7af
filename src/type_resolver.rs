//! Maps annotation type expressions onto Swagger types and schemas.
//!
//! Type names outside [`PRIMITIVE_TYPES`] are references to `#/definitions/<name>`. Only the
//! first dot-separated segment of a name counts, so `Pet.model` refers to `Pet`.

use crate::document::Schema;
use crate::tag::TypeExpression;

/// Type names emitted as plain `type` values instead of definition references
pub const PRIMITIVE_TYPES: [&str; 5] = ["string", "number", "boolean", "any", "object"];

/// Array element types emitted inline as `items: {type}`
pub const ITEM_TYPES: [&str; 4] = ["object", "string", "integer", "boolean"];

/// Outcome of resolving a type expression where either a schema or a plain type applies
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Schema(Schema),
    Type(String),
}

impl Resolved {
    /// Splits into the `(type, schema)` pair carried by parameters.
    pub fn into_parts(self) -> (Option<String>, Option<Schema>) {
        match self {
            Resolved::Schema(schema) => (None, Some(schema)),
            Resolved::Type(name) => (Some(name), None),
        }
    }
}

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

fn head(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Plain type name for an expression.
///
/// Named types yield their first segment when it is not primitive and the raw name
/// otherwise. Array applications yield `array`; anything else is a `string`.
pub fn resolve_type(expr: Option<&TypeExpression>) -> String {
    match expr {
        Some(TypeExpression::Named(name)) => {
            let segment = head(name);
            if is_primitive(segment) {
                name.clone()
            } else {
                segment.to_string()
            }
        }
        Some(TypeExpression::ArrayOf(_)) => "array".to_string(),
        Some(TypeExpression::Unresolved) | None => "string".to_string(),
    }
}

/// Reference schema for an expression, or `None` when a plain type applies.
pub fn resolve_schema(expr: Option<&TypeExpression>) -> Option<Schema> {
    match expr? {
        TypeExpression::ArrayOf(element) => Some(Schema::array_of(Schema::definition_ref(element))),
        TypeExpression::Named(name) => {
            let segment = head(name);
            (!is_primitive(segment)).then(|| Schema::definition_ref(segment))
        }
        TypeExpression::Unresolved => None,
    }
}

/// `items` schema for array expressions.
pub fn resolve_items(expr: Option<&TypeExpression>) -> Option<Schema> {
    match expr? {
        TypeExpression::ArrayOf(element) if ITEM_TYPES.contains(&element.as_str()) => {
            Some(Schema::of_type(element))
        }
        TypeExpression::ArrayOf(element) => Some(Schema::definition_ref(element)),
        _ => None,
    }
}

/// Schema when one applies, the plain type otherwise.
pub fn resolve(expr: Option<&TypeExpression>) -> Resolved {
    match resolve_schema(expr) {
        Some(schema) => Resolved::Schema(schema),
        None => Resolved::Type(resolve_type(expr)),
    }
}
