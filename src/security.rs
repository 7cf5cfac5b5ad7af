use log::debug;
use serde_json::{Map, Value};

/// Security requirement parsed from a `@security` annotation.
///
/// The description is either a JSON security requirement list, used verbatim, or the bare
/// name of a security scheme with no scopes.
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityRequirement {
    /// A JSON value, normally `[{"scheme": ["scope", ...]}]`
    Structured(Value),
    /// A single scheme name that did not parse as JSON
    SchemeName(String),
}

impl SecurityRequirement {
    pub fn parse(description: &str) -> Self {
        match serde_json::from_str::<Value>(description) {
            Ok(value) => SecurityRequirement::Structured(value),
            Err(e) => {
                debug!(
                    "Security '{}' is not JSON ({}), using it as a scheme name",
                    description, e
                );
                SecurityRequirement::SchemeName(description.to_string())
            }
        }
    }

    /// The OpenAPI requirement list for this annotation.
    pub fn into_requirements(self) -> Value {
        match self {
            SecurityRequirement::Structured(value) => value,
            SecurityRequirement::SchemeName(name) => {
                let mut scheme = Map::new();
                scheme.insert(name, Value::Array(Vec::new()));
                Value::Array(vec![Value::Object(scheme)])
            }
        }
    }
}
