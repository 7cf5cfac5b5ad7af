//! Serialization module for reading inputs and writing the generated document.
//!
//! The generated document is written as pretty-printed JSON or as YAML. Inputs (the base
//! document and externally extracted definitions) are read from JSON or YAML files,
//! selected by extension.

use crate::document::{Definitions, SwaggerDocument};
use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Serializes the document to YAML.
pub fn serialize_yaml(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize Swagger document to YAML")
}

/// Serializes the document to JSON with pretty printing.
///
/// # Example
///
/// ```
/// use swagger_from_comments::document::SwaggerDocument;
/// use swagger_from_comments::serializer::serialize_json;
///
/// let doc = SwaggerDocument::from_base(serde_json::json!({ "info": { "title": "Pets", "version": "1" } })).unwrap();
/// let json = serialize_json(&doc).unwrap();
/// assert!(json.contains("\"swagger\": \"2.0\""));
/// ```
pub fn serialize_json(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize Swagger document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Reads a JSON or YAML file (`.yaml`/`.yml`) into a JSON value.
pub fn read_value(path: &Path) -> Result<Value> {
    debug!("Reading {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in file: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in file: {}", path.display()))
    }
}

/// Reads externally extracted definitions.
///
/// Accepts either a bare `{name: schema}` map or a JSON schema document whose
/// `definitions` member holds that map.
pub fn read_definitions(path: &Path) -> Result<Definitions> {
    let value = match read_value(path)? {
        Value::Object(mut map) if map.get("definitions").is_some_and(Value::is_object) => {
            map.remove("definitions").unwrap_or_default()
        }
        other => other,
    };

    let definitions: Definitions = serde_json::from_value(value)
        .with_context(|| format!("Unsupported definitions in file: {}", path.display()))?;
    debug!("Read {} definitions from {}", definitions.len(), path.display());
    Ok(definitions)
}
