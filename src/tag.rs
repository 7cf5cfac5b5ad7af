//! Tag nodes and their normalisation into typed descriptors.
//!
//! A [`TagNode`] is the raw unit produced by the comment parser: a title, an optional name,
//! a free-text description and an optional type expression. [`TagKind::from_node`] turns a
//! node into one variant per recognised title, each carrying the payload shape the
//! assemblers need. Normalisation is pure: nothing here touches the document.

use crate::security::SecurityRequirement;

/// A parsed type expression taken from the `{...}` part of an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpression {
    /// A plain, possibly dotted, type name such as `string` or `Pet.model`
    Named(String),
    /// An array application such as `Array<Pet>` carrying the element type name
    ArrayOf(String),
    /// A type expression the parser could not reduce to a name
    Unresolved,
}

/// One documentation annotation, roughly one per `@tag` line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagNode {
    pub title: String,
    pub name: String,
    pub description: String,
    pub type_expr: Option<TypeExpression>,
}

impl TagNode {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_type(mut self, type_expr: TypeExpression) -> Self {
        self.type_expr = Some(type_expr);
        self
    }
}

/// An ordered sequence of tag nodes from one documentation comment, plus its free text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentBlock {
    /// Free text preceding the first tag
    pub description: String,
    pub tags: Vec<TagNode>,
}

impl CommentBlock {
    pub fn new(description: &str, tags: Vec<TagNode>) -> Self {
        Self {
            description: description.to_string(),
            tags,
        }
    }

    /// A block declares a reusable schema when its first tag is a `typedef`.
    pub fn is_typedef(&self) -> bool {
        self.tags.first().is_some_and(|t| t.title == "typedef")
    }
}

/// HTTP method and URI parsed from a `@route METHOD /uri` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDescriptor {
    /// Lower-cased HTTP verb
    pub method: String,
    pub uri: String,
}

impl RouteDescriptor {
    /// The first two whitespace-separated tokens are the verb and the URI; anything after
    /// them is ignored. A missing verb falls back to `get`, a missing URI to "".
    pub fn parse(s: &str) -> Self {
        let mut tokens = s.split_whitespace();
        let method = tokens
            .next()
            .map_or_else(|| "get".to_string(), str::to_lowercase);
        let uri = tokens.next().unwrap_or_default().to_string();

        Self { method, uri }
    }
}

/// Name, location and required flag parsed from a `name.location.required` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// `query`, `body`, `path`, `header`, `formData`, ... or `get` when no location was given
    pub location: String,
    pub required: bool,
}

/// Location recorded when a field name carries no location segment.
pub const DEFAULT_LOCATION: &str = "get";

impl FieldDescriptor {
    pub fn parse(s: &str) -> Self {
        let mut segments = s.split('.');
        let name = segments.next().unwrap_or_default().to_string();
        let location = match segments.next() {
            Some(loc) if !loc.is_empty() => loc.to_string(),
            _ => DEFAULT_LOCATION.to_string(),
        };
        let required = segments.next() == Some("required");

        Self {
            name,
            location,
            required,
        }
    }

    fn is_bare(&self, name: &str) -> bool {
        self.location == DEFAULT_LOCATION && self.name == name
    }

    /// Query-located, or a bare field literally named `query`.
    pub fn is_query(&self) -> bool {
        self.location == "query" || self.is_bare("query")
    }

    /// Body-located, or a bare field literally named `body`.
    pub fn is_body(&self) -> bool {
        self.location == "body" || self.is_bare("body")
    }
}

/// Tag name and description parsed from a `@group name - description` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDescriptor {
    pub name: String,
    pub description: String,
}

impl GroupDescriptor {
    pub fn parse(s: &str) -> Self {
        let (name, description) = s.split_once('-').unwrap_or((s, ""));
        Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        }
    }

    /// The first `group` tag of the block, or `default` with an empty description.
    pub fn of_block(tags: &[TagNode]) -> Self {
        tags.iter()
            .find(|t| t.title == "group")
            .map(|t| Self::parse(&t.description))
            .unwrap_or_else(|| Self {
                name: "default".to_string(),
                description: String::new(),
            })
    }
}

/// Response label and description parsed from a `@returns {Type} label - description` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    pub label: String,
    pub description: String,
}

impl ResponseDescriptor {
    pub fn parse(s: &str) -> Self {
        let (label, description) = s.split_once('-').unwrap_or((s, ""));
        Self {
            label: label.trim().to_string(),
            description: description.trim().to_string(),
        }
    }
}

/// A tag node classified by title, each variant carrying its own payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TagKind<'a> {
    Route(RouteDescriptor),
    Param {
        field: FieldDescriptor,
        description: &'a str,
        type_expr: Option<&'a TypeExpression>,
    },
    OperationId(&'a str),
    Summary(&'a str),
    Produces(Vec<String>),
    Consumes(Vec<String>),
    Security(SecurityRequirement),
    Returns {
        response: ResponseDescriptor,
        type_expr: Option<&'a TypeExpression>,
    },
    Typedef {
        name: &'a str,
        base: Option<&'a str>,
    },
    Property {
        name: &'a str,
        required: bool,
        description: &'a str,
        type_expr: Option<&'a TypeExpression>,
    },
    Group(GroupDescriptor),
    /// Any title outside the recognised vocabulary
    Unknown(&'a str),
}

impl<'a> TagKind<'a> {
    pub fn from_node(node: &'a TagNode) -> Self {
        let type_expr = node.type_expr.as_ref();
        match node.title.as_str() {
            "route" => TagKind::Route(RouteDescriptor::parse(&node.description)),
            "param" => TagKind::Param {
                field: FieldDescriptor::parse(&node.name),
                description: &node.description,
                type_expr,
            },
            "operationId" => TagKind::OperationId(&node.description),
            "summary" => TagKind::Summary(&node.description),
            "produces" => TagKind::Produces(split_media_types(&node.description)),
            "consumes" => TagKind::Consumes(split_media_types(&node.description)),
            "security" => TagKind::Security(SecurityRequirement::parse(&node.description)),
            "returns" | "return" => TagKind::Returns {
                response: ResponseDescriptor::parse(&node.description),
                type_expr,
            },
            "typedef" => TagKind::Typedef {
                name: &node.name,
                base: match type_expr {
                    Some(TypeExpression::Named(base)) => Some(base.as_str()),
                    _ => None,
                },
            },
            "property" => {
                let mut segments = node.name.split('.');
                let bare = segments.next().unwrap_or_default();
                let (name, required) = match segments.next() {
                    Some("required") => (bare, true),
                    _ => (node.name.as_str(), false),
                };
                TagKind::Property {
                    name,
                    required,
                    description: &node.description,
                    type_expr,
                }
            }
            "group" => TagKind::Group(GroupDescriptor::parse(&node.description)),
            other => TagKind::Unknown(other),
        }
    }
}

fn split_media_types(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}
