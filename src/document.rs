//! Swagger 2.0 document model and the cumulative merge.
//!
//! [`SwaggerDocument`] is the accumulator for one generation run. It is seeded from a
//! caller-supplied base document (whose `info`, `host`, `schemes`, ... are carried through
//! untouched) and grows by folding one [`Fragment`] per comment block into it with
//! [`SwaggerDocument::merge`].

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Swagger version written into base documents that do not declare one
pub const SWAGGER_VERSION: &str = "2.0";

/// Keys of a path item that hold operations
pub const HTTP_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// Top-level members every generated document carries, with their empty value
const SEEDED_OBJECTS: [&str; 3] = ["securityDefinitions", "responses", "parameters"];

/// Path items keyed by URI
pub type Paths = BTreeMap<String, PathItem>;

/// Named schema definitions
pub type Definitions = BTreeMap<String, Definition>;

/// Operations of one path, keyed by lower-cased HTTP method.
///
/// Members that are not operations (a path-level `parameters` list, `$ref`, vendor
/// extensions) or operations this model cannot represent are kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct PathItem {
    #[serde(flatten)]
    pub operations: BTreeMap<String, Operation>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PathItem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<Map<String, Value>> for PathItem {
    fn from(members: Map<String, Value>) -> Self {
        let mut item = PathItem::new();
        for (key, value) in members {
            if !HTTP_METHODS.contains(&key.as_str()) {
                item.extra.insert(key, value);
                continue;
            }
            match serde_json::from_value::<Operation>(value.clone()) {
                Ok(operation) => {
                    item.operations.insert(key, operation);
                }
                Err(e) => {
                    debug!("Keeping '{}' operation as-is ({})", key, e);
                    item.extra.insert(key, value);
                }
            }
        }
        item
    }
}

impl Deref for PathItem {
    type Target = BTreeMap<String, Operation>;

    fn deref(&self) -> &Self::Target {
        &self.operations
    }
}

impl DerefMut for PathItem {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.operations
    }
}

/// `items` of an array schema: one schema for every element, or one per position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
    Single(Box<Schema>),
    Tuple(Vec<Schema>),
}

/// Schema object used for parameters, responses and definition properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// A type name, or a list of them for union types such as `["string", "null"]`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<Value>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaItems>,
    /// Keywords not modelled above (`format`, `enum`, nested `properties`, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Schema {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(Value::String(schema_type.to_string())),
            ..Default::default()
        }
    }

    /// A `$ref` to `#/definitions/<name>`.
    pub fn definition_ref(name: &str) -> Self {
        Self {
            reference: Some(format!("#/definitions/{}", name)),
            ..Default::default()
        }
    }

    pub fn array_of(items: Schema) -> Self {
        Self {
            schema_type: Some(Value::String("array".to_string())),
            items: Some(SchemaItems::Single(Box::new(items))),
            ..Default::default()
        }
    }

    /// The declared type. For a union, the first member other than `null`.
    pub fn type_name(&self) -> Option<&str> {
        match self.schema_type.as_ref()? {
            Value::String(name) => Some(name),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .find(|name| *name != "null"),
            _ => None,
        }
    }
}

/// A reusable named schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Definition {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

/// Operation parameter. Exactly one of `param_type` and `schema` is normally set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Operation object accumulated for one (uri, method) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Value>,
    /// Members of a base-document operation not modelled above
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Top-level tag entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The contribution of a single comment block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub paths: Paths,
    pub tags: Vec<Tag>,
    pub definitions: Definitions,
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.tags.is_empty() && self.definitions.is_empty()
    }
}

/// Complete Swagger document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Everything the base document declares besides paths, tags and definitions
    #[serde(flatten)]
    pub base: Map<String, Value>,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub definitions: Definitions,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl SwaggerDocument {
    /// Builds the accumulator from a caller-supplied base document.
    ///
    /// The base must be a JSON object. `swagger` defaults to `"2.0"` and
    /// `securityDefinitions`, `responses` and `parameters` to empty objects; existing
    /// `paths`, `definitions` and `tags` are kept and later merges add to them.
    pub fn from_base(base: Value) -> Result<Self> {
        if !base.is_object() {
            return Err(Error::InvalidArgument(
                "base document must be an object".to_string(),
            ));
        }

        let mut document: SwaggerDocument = serde_json::from_value(base)?;
        document
            .base
            .entry("swagger")
            .or_insert_with(|| Value::String(SWAGGER_VERSION.to_string()));
        for key in SEEDED_OBJECTS {
            document
                .base
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
        }

        debug!(
            "Base document with {} paths, {} definitions",
            document.paths.len(),
            document.definitions.len()
        );
        Ok(document)
    }

    /// Folds a fragment into the document.
    ///
    /// Paths merge key-wise down to the operation, which the incoming one replaces whole.
    /// Tags are appended as-is (duplicates preserved) and definitions are set by name,
    /// last writer wins.
    pub fn merge(&mut self, fragment: Fragment) {
        for (uri, item) in fragment.paths {
            let target = self.paths.entry(uri).or_default();
            for (method, operation) in item.operations {
                target.extra.remove(&method);
                target.operations.insert(method, operation);
            }
            target.extra.extend(item.extra);
        }

        self.tags.extend(fragment.tags);
        self.definitions.extend(fragment.definitions);
    }

    pub fn merge_definitions(&mut self, definitions: Definitions) {
        self.merge(Fragment {
            definitions,
            ..Default::default()
        });
    }

    pub fn operation(&self, uri: &str, method: &str) -> Option<&Operation> {
        self.paths.get(uri).and_then(|item| item.get(method))
    }
}
