use crate::document::{Definition, Schema, SchemaItems};
use crate::tag::{TagKind, TagNode};
use crate::type_resolver::{resolve_items, resolve_schema, resolve_type};
use log::debug;
use serde_json::Value;

/// A named schema declared by a `@typedef` block
#[derive(Debug, Clone, PartialEq)]
pub struct TypedefOutput {
    pub type_name: String,
    pub details: Definition,
}

/// Builds a definition from a block whose first tag is `@typedef`.
///
/// A named type on the typedef becomes an `allOf` base reference. Each following
/// `@property` adds one property; a `.required` suffix on its name is stripped and the bare
/// name is listed as required. Tags other than `@property` are ignored.
///
/// Returns `None` when the first tag is not a typedef.
pub fn assemble_typedef(tags: &[TagNode]) -> Option<TypedefOutput> {
    let (first, rest) = tags.split_first()?;
    let TagKind::Typedef { name, base } = TagKind::from_node(first) else {
        return None;
    };

    let mut details = Definition {
        all_of: base.map(|base| vec![Schema::definition_ref(base)]),
        ..Default::default()
    };

    for node in rest {
        let TagKind::Property {
            name: property,
            required,
            description,
            type_expr,
        } = TagKind::from_node(node)
        else {
            continue;
        };

        if required {
            details.required.push(property.to_string());
        }

        let schema = resolve_schema(type_expr).unwrap_or_else(|| Schema {
            schema_type: Some(Value::String(resolve_type(type_expr))),
            description: Some(description.to_string()),
            items: resolve_items(type_expr).map(|items| SchemaItems::Single(Box::new(items))),
            ..Default::default()
        });
        details.properties.insert(property.to_string(), schema);
    }

    debug!(
        "Typedef {} with {} properties ({} required)",
        name,
        details.properties.len(),
        details.required.len()
    );

    Some(TypedefOutput {
        type_name: name.to_string(),
        details,
    })
}
