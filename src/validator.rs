//! Structural checks run on the finished document.
//!
//! Validation never blocks generation: a failing document is still returned, tagged with
//! [`ValidationStatus::Unvalidated`] so callers can tell the two outcomes apart.

use crate::document::{Schema, SchemaItems, SwaggerDocument};
use serde_json::Value;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// A structural validator for generated documents.
pub trait DocumentValidator {
    /// Returns every problem found, or `Ok(())` for a structurally sound document.
    fn validate(&self, document: &SwaggerDocument) -> Result<(), Vec<String>>;
}

/// Outcome of validating the generated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    Validated,
    /// Validation failed; the document is returned as assembled
    Unvalidated(Vec<String>),
    /// No validator was configured
    Skipped,
}

impl ValidationStatus {
    pub fn is_validated(&self) -> bool {
        matches!(self, ValidationStatus::Validated)
    }
}

/// Checks the required top-level fields and that every local `$ref` resolves.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceValidator;

impl DocumentValidator for ReferenceValidator {
    fn validate(&self, document: &SwaggerDocument) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !document.base.contains_key("swagger") {
            errors.push("missing 'swagger' version".to_string());
        }
        match document.base.get("info") {
            Some(Value::Object(info)) => {
                for field in ["title", "version"] {
                    if !info.contains_key(field) {
                        errors.push(format!("missing 'info.{}'", field));
                    }
                }
            }
            _ => errors.push("missing 'info' object".to_string()),
        }

        let mut references = Vec::new();
        for (uri, item) in &document.paths {
            for (key, value) in &item.extra {
                value_references(value, &format!("{} {}", key, uri), &mut references);
            }
            for (method, operation) in item.iter() {
                let location = format!("{} {}", method, uri);
                for value in operation.extra.values() {
                    value_references(value, &location, &mut references);
                }
                for parameter in &operation.parameters {
                    if let Some(schema) = &parameter.schema {
                        schema_references(schema, &location, &mut references);
                    }
                }
                for response in operation.responses.values() {
                    if let Some(schema) = &response.schema {
                        schema_references(schema, &location, &mut references);
                    }
                    for value in response.extra.values() {
                        value_references(value, &location, &mut references);
                    }
                }
            }
        }
        for (name, definition) in &document.definitions {
            let location = format!("definition {}", name);
            for property in definition.properties.values() {
                schema_references(property, &location, &mut references);
            }
            for base in definition.all_of.iter().flatten() {
                schema_references(base, &location, &mut references);
            }
            for value in definition.extra.values() {
                value_references(value, &location, &mut references);
            }
        }

        for (location, reference) in references {
            if let Some(name) = reference.strip_prefix(DEFINITIONS_PREFIX) {
                if !document.definitions.contains_key(name) {
                    errors.push(format!("{}: unresolved reference '{}'", location, reference));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn schema_references(schema: &Schema, location: &str, out: &mut Vec<(String, String)>) {
    if let Some(reference) = &schema.reference {
        out.push((location.to_string(), reference.clone()));
    }
    match &schema.items {
        Some(SchemaItems::Single(items)) => schema_references(items, location, out),
        Some(SchemaItems::Tuple(items)) => {
            for item in items {
                schema_references(item, location, out);
            }
        }
        None => {}
    }
    for value in schema.extra.values() {
        value_references(value, location, out);
    }
}

fn value_references(value: &Value, location: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                match (key.as_str(), inner) {
                    ("$ref", Value::String(reference)) => {
                        out.push((location.to_string(), reference.clone()))
                    }
                    _ => value_references(inner, location, out),
                }
            }
        }
        Value::Array(values) => {
            for inner in values {
                value_references(inner, location, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Definition, Fragment, Operation, PathItem, Response};
    use serde_json::json;

    fn document() -> SwaggerDocument {
        SwaggerDocument::from_base(json!({
            "info": { "title": "Pets", "version": "1.0.0" }
        }))
        .unwrap()
    }

    fn with_response(document: &mut SwaggerDocument, schema: Schema) {
        let mut responses = std::collections::BTreeMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: "ok".to_string(),
                schema: Some(schema),
                ..Default::default()
            },
        );
        let mut item = PathItem::new();
        item.insert(
            "get".to_string(),
            Operation {
                responses,
                ..Default::default()
            },
        );
        let mut fragment = Fragment::default();
        fragment.paths.insert("/pets".to_string(), item);
        document.merge(fragment);
    }

    #[test]
    fn test_valid_document() {
        let mut document = document();
        document
            .definitions
            .insert("Pet".to_string(), Definition::default());
        with_response(&mut document, Schema::array_of(Schema::definition_ref("Pet")));

        assert_eq!(ReferenceValidator.validate(&document), Ok(()));
    }

    #[test]
    fn test_unresolved_response_reference() {
        let mut document = document();
        with_response(&mut document, Schema::definition_ref("Pet"));

        let errors = ReferenceValidator.validate(&document).unwrap_err();
        assert_eq!(
            errors,
            vec!["get /pets: unresolved reference '#/definitions/Pet'".to_string()]
        );
    }

    #[test]
    fn test_unresolved_reference_inside_external_definition() {
        let mut document = document();
        let definition: Definition = serde_json::from_value(json!({
            "properties": {
                "owner": {
                    "type": "object",
                    "properties": { "address": { "$ref": "#/definitions/Address" } }
                }
            }
        }))
        .unwrap();
        document.definitions.insert("Pet".to_string(), definition);

        let errors = ReferenceValidator.validate(&document).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Address"));
    }

    #[test]
    fn test_references_in_tuple_items_and_path_members() {
        let mut document = SwaggerDocument::from_base(json!({
            "info": { "title": "Pets", "version": "1.0.0" },
            "paths": {
                "/pets": {
                    "parameters": [{ "name": "f", "in": "body", "schema": { "$ref": "#/definitions/Filter" } }]
                }
            }
        }))
        .unwrap();
        let definition: Definition = serde_json::from_value(json!({
            "properties": {
                "position": { "type": "array", "items": [{ "$ref": "#/definitions/Unit" }] }
            }
        }))
        .unwrap();
        document.definitions.insert("Pet".to_string(), definition);

        let errors = ReferenceValidator.validate(&document).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "parameters /pets: unresolved reference '#/definitions/Filter'".to_string(),
                "definition Pet: unresolved reference '#/definitions/Unit'".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_info() {
        let document = SwaggerDocument::from_base(json!({})).unwrap();
        let errors = ReferenceValidator.validate(&document).unwrap_err();
        assert_eq!(errors, vec!["missing 'info' object".to_string()]);
    }
}
