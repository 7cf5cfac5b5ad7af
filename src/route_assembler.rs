//! Turns one route comment block into a document fragment.
//!
//! The block's tags are processed in order against a single working operation keyed by the
//! most recent `@route`. Parameters accumulate block-wide, and after every tag the
//! accumulated parameter list and the block's response map are written onto the working
//! operation, so what the operation holds after the last tag is what the fragment carries.

use crate::document::{Definition, Definitions, Fragment, Operation, Parameter, Response, Schema, Tag};
use crate::tag::{CommentBlock, FieldDescriptor, GroupDescriptor, RouteDescriptor, TagKind, TagNode, TypeExpression};
use crate::type_resolver::{resolve, resolve_schema, Resolved};
use log::debug;
use std::collections::BTreeMap;

/// Assembles operations for route blocks, expanding parameters typed by known definitions.
pub struct RouteAssembler<'d> {
    /// Definitions registered so far in the run
    definitions: &'d Definitions,
}

impl<'d> RouteAssembler<'d> {
    pub fn new(definitions: &'d Definitions) -> Self {
        Self { definitions }
    }

    /// Builds the fragment for a block. Blocks without a `@route` yield an empty fragment.
    pub fn assemble(&self, block: &CommentBlock) -> Fragment {
        let group = GroupDescriptor::of_block(&block.tags);
        let responses = parse_responses(&block.tags);

        let mut fragment = Fragment::default();
        let mut current: Option<RouteDescriptor> = None;
        let mut parameters: Vec<Parameter> = Vec::new();

        for node in &block.tags {
            match TagKind::from_node(node) {
                TagKind::Route(route) => {
                    debug!("Route {} {}", route.method, route.uri);
                    let operation = operation_mut(&mut fragment, &route);
                    operation.parameters.clear();
                    operation.description = block.description.clone();
                    operation.tags = vec![group.name.clone()];
                    fragment.tags.push(Tag {
                        name: group.name.clone(),
                        description: group.description.clone(),
                    });
                    current = Some(route);
                }
                TagKind::Param {
                    field,
                    description,
                    type_expr,
                } => {
                    parameters.extend(self.build_parameters(field, description, type_expr));
                }
                TagKind::OperationId(id) => {
                    if let Some(route) = &current {
                        operation_mut(&mut fragment, route).operation_id = Some(id.to_string());
                    }
                }
                TagKind::Summary(summary) => {
                    if let Some(route) = &current {
                        operation_mut(&mut fragment, route).summary = Some(summary.to_string());
                    }
                }
                TagKind::Produces(media_types) => {
                    if let Some(route) = &current {
                        operation_mut(&mut fragment, route).produces = Some(media_types);
                    }
                }
                TagKind::Consumes(media_types) => {
                    if let Some(route) = &current {
                        operation_mut(&mut fragment, route).consumes = Some(media_types);
                    }
                }
                TagKind::Security(requirement) => {
                    if let Some(route) = &current {
                        operation_mut(&mut fragment, route).security =
                            Some(requirement.into_requirements());
                    }
                }
                TagKind::Returns { .. }
                | TagKind::Typedef { .. }
                | TagKind::Property { .. }
                | TagKind::Group(_) => {}
                TagKind::Unknown(title) => debug!("Ignoring unrecognised tag @{}", title),
            }

            // TODO: assign parameters and responses once at block end instead of after every tag.
            if let Some(route) = &current {
                let operation = operation_mut(&mut fragment, route);
                operation.parameters = parameters.clone();
                operation.responses = responses.clone();
            }
        }

        fragment
    }

    fn build_parameters(
        &self,
        field: FieldDescriptor,
        description: &str,
        type_expr: Option<&TypeExpression>,
    ) -> Vec<Parameter> {
        let registered = match type_expr {
            Some(TypeExpression::Named(name)) => self.definitions.get(name),
            _ => None,
        };

        match registered {
            Some(definition) if field.is_query() => expand_query(definition),
            Some(_) if field.is_body() => {
                let (param_type, schema) = resolve(type_expr).into_parts();
                vec![Parameter {
                    name: field.name,
                    location: "body".to_string(),
                    description: description.to_string(),
                    required: field.required,
                    param_type,
                    schema,
                }]
            }
            _ => {
                let (param_type, schema) = resolve(type_expr).into_parts();
                vec![Parameter {
                    name: field.name,
                    location: field.location,
                    description: description.to_string(),
                    required: field.required,
                    param_type,
                    schema,
                }]
            }
        }
    }
}

fn operation_mut<'f>(fragment: &'f mut Fragment, route: &RouteDescriptor) -> &'f mut Operation {
    fragment
        .paths
        .entry(route.uri.clone())
        .or_default()
        .entry(route.method.clone())
        .or_default()
}

/// One query parameter per property of the definition.
fn expand_query(definition: &Definition) -> Vec<Parameter> {
    definition
        .properties
        .iter()
        .map(|(name, property)| {
            let (param_type, schema) = property_type_or_schema(property).into_parts();
            Parameter {
                name: name.clone(),
                location: "query".to_string(),
                description: property.description.clone().unwrap_or_default(),
                required: definition.is_required(name),
                param_type,
                schema,
            }
        })
        .collect()
}

fn property_type_or_schema(property: &Schema) -> Resolved {
    if let Some(reference) = &property.reference {
        return Resolved::Schema(Schema {
            reference: Some(reference.clone()),
            ..Default::default()
        });
    }

    match (property.type_name(), &property.items) {
        (Some("array"), Some(items)) => Resolved::Schema(Schema {
            items: Some(items.clone()),
            ..Schema::of_type("array")
        }),
        (Some(schema_type), _) => Resolved::Type(schema_type.to_string()),
        (None, _) => Resolved::Type("string".to_string()),
    }
}

/// Response map from every `@returns`/`@return` tag of a block, keyed by status label.
pub fn parse_responses(tags: &[TagNode]) -> BTreeMap<String, Response> {
    let mut responses = BTreeMap::new();
    for node in tags {
        if let TagKind::Returns {
            response,
            type_expr,
        } = TagKind::from_node(node)
        {
            responses.insert(
                response.label,
                Response {
                    description: response.description,
                    schema: resolve_schema(type_expr),
                    ..Default::default()
                },
            );
        }
    }
    responses
}
