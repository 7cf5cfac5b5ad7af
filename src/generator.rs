//! The merge driver for one generation run.
//!
//! [`Generator`] owns the cumulative [`SwaggerDocument`]. Files are processed in the order
//! given, blocks in source order and tags in parse order; each block becomes one
//! [`Fragment`] that is merged before the next block is assembled, so later blocks see the
//! definitions declared by earlier ones.

use crate::comment_parser::CommentParser;
use crate::document::{Definitions, Fragment, SwaggerDocument};
use crate::error::{Error, Result};
use crate::route_assembler::RouteAssembler;
use crate::tag::CommentBlock;
use crate::typedef::assemble_typedef;
use crate::validator::{DocumentValidator, ReferenceValidator, ValidationStatus};
use log::{debug, info, warn};
use serde_json::Value;
use std::path::PathBuf;

/// Inputs of a generation run
pub struct GeneratorOptions {
    /// Partial Swagger document (`info`, `host`, `schemes`, ...) to build on
    pub base_document: Option<Value>,
    /// Annotated source files, in processing order
    pub files: Option<Vec<PathBuf>>,
    /// Definitions extracted ahead of time from typed sources
    pub definitions: Definitions,
    /// Validator run on the finished document; `None` skips validation
    pub validator: Option<Box<dyn DocumentValidator>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            base_document: None,
            files: None,
            definitions: Definitions::new(),
            validator: Some(Box::new(ReferenceValidator)),
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_document(mut self, base: Value) -> Self {
        self.base_document = Some(base);
        self
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn with_definitions(mut self, definitions: Definitions) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn DocumentValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn without_validation(mut self) -> Self {
        self.validator = None;
        self
    }
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub files: usize,
    pub blocks: usize,
    pub typedefs: usize,
    pub operations: usize,
}

/// The finished document with its validation outcome
#[derive(Debug)]
pub struct GenerationOutput {
    pub document: SwaggerDocument,
    pub validation: ValidationStatus,
    pub stats: GenerationStats,
}

/// Fragment for one comment block: a definition for typedef blocks, operations otherwise.
pub fn build_fragment(block: &CommentBlock, definitions: &Definitions) -> Fragment {
    if let Some(typedef) = assemble_typedef(&block.tags) {
        let mut fragment = Fragment::default();
        fragment
            .definitions
            .insert(typedef.type_name, typedef.details);
        return fragment;
    }

    RouteAssembler::new(definitions).assemble(block)
}

/// Accumulates the document across comment blocks.
pub struct Generator {
    document: SwaggerDocument,
    stats: GenerationStats,
}

impl Generator {
    /// Starts from the base document, then merges the externally supplied definitions.
    pub fn new(base: Value, definitions: Definitions) -> Result<Self> {
        let mut document = SwaggerDocument::from_base(base)?;
        debug!("Merging {} external definitions", definitions.len());
        document.merge_definitions(definitions);

        Ok(Self {
            document,
            stats: GenerationStats::default(),
        })
    }

    pub fn process_block(&mut self, block: &CommentBlock) {
        let fragment = build_fragment(block, &self.document.definitions);

        self.stats.blocks += 1;
        self.stats.typedefs += fragment.definitions.len();
        self.stats.operations += fragment.paths.values().map(|item| item.len()).sum::<usize>();

        if fragment.is_empty() {
            debug!("Block produced no fragment");
            return;
        }
        self.document.merge(fragment);
    }

    pub fn process_file(&mut self, path: &std::path::Path) -> Result<()> {
        let parsed = CommentParser::parse_file(path)?;
        for block in &parsed.blocks {
            self.process_block(block);
        }
        self.stats.files += 1;
        Ok(())
    }

    pub fn document(&self) -> &SwaggerDocument {
        &self.document
    }

    /// Runs the validator and hands back the document whatever the outcome.
    pub fn finish(self, validator: Option<&dyn DocumentValidator>) -> GenerationOutput {
        let validation = match validator {
            None => ValidationStatus::Skipped,
            Some(validator) => match validator.validate(&self.document) {
                Ok(()) => ValidationStatus::Validated,
                Err(errors) => {
                    for error in &errors {
                        warn!("Validation: {}", error);
                    }
                    warn!(
                        "Document failed validation with {} errors, keeping the unvalidated document",
                        errors.len()
                    );
                    ValidationStatus::Unvalidated(errors)
                }
            },
        };

        GenerationOutput {
            document: self.document,
            validation,
            stats: self.stats,
        }
    }
}

/// Runs a complete generation over the configured files.
///
/// # Errors
///
/// Fails before reading anything when the base document or the file list is missing, and
/// stops at the first file that cannot be read or parsed.
pub fn generate(options: GeneratorOptions) -> Result<GenerationOutput> {
    let base = options
        .base_document
        .ok_or(Error::MissingOption("base document"))?;
    let files = options.files.ok_or(Error::MissingOption("files"))?;

    info!("Generating from {} files", files.len());
    let mut generator = Generator::new(base, options.definitions)?;
    for path in &files {
        generator.process_file(path)?;
    }

    Ok(generator.finish(options.validator.as_deref()))
}

/// Runs a generation over blocks that were already parsed.
pub fn generate_from_blocks(
    base: Value,
    definitions: Definitions,
    blocks: &[CommentBlock],
    validator: Option<&dyn DocumentValidator>,
) -> Result<GenerationOutput> {
    let mut generator = Generator::new(base, definitions)?;
    for block in blocks {
        generator.process_block(block);
    }
    Ok(generator.finish(validator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Definition;
    use crate::tag::{TagNode, TypeExpression};
    use serde_json::json;

    fn base() -> Value {
        json!({ "info": { "title": "Pets", "version": "1.0.0" } })
    }

    fn route_block(route: &str, group: &str) -> CommentBlock {
        CommentBlock::new(
            "",
            vec![
                TagNode::new("route").with_description(route),
                TagNode::new("group").with_description(group),
            ],
        )
    }

    #[test]
    fn test_missing_base_document() {
        let err = generate(GeneratorOptions::new().with_files(vec![])).unwrap_err();
        assert!(matches!(err, Error::MissingOption("base document")));
    }

    #[test]
    fn test_missing_files_checked_before_parsing() {
        let err = generate(GeneratorOptions::new().with_base_document(base())).unwrap_err();
        assert!(matches!(err, Error::MissingOption("files")));
    }

    #[test]
    fn test_get_and_post_share_path() {
        let blocks = vec![route_block("GET /pets", "pets"), route_block("POST /pets", "pets")];
        let output = generate_from_blocks(base(), Definitions::new(), &blocks, None).unwrap();

        let item = &output.document.paths["/pets"];
        assert!(item.contains_key("get"));
        assert!(item.contains_key("post"));
        assert_eq!(output.document.tags.len(), 2);
        assert!(output.document.tags.iter().all(|t| t.name == "pets"));
        assert_eq!(output.validation, ValidationStatus::Skipped);
        assert_eq!(output.stats.operations, 2);
    }

    #[test]
    fn test_later_block_replaces_operation() {
        let first = CommentBlock::new(
            "",
            vec![
                TagNode::new("route").with_description("GET /pets"),
                TagNode::new("operationId").with_description("listPets"),
                TagNode::new("security").with_description("api_key"),
            ],
        );
        let second = CommentBlock::new("", vec![TagNode::new("route").with_description("GET /pets")]);

        let output = generate_from_blocks(base(), Definitions::new(), &[first, second], None).unwrap();

        let operation = output.document.operation("/pets", "get").unwrap();
        assert_eq!(operation.operation_id, None);
        assert_eq!(operation.security, None);
    }

    #[test]
    fn test_typedef_registered_for_later_blocks() {
        let typedef = CommentBlock::new(
            "",
            vec![
                TagNode::new("typedef").with_name("PetQuery"),
                TagNode::new("property")
                    .with_name("a.required")
                    .with_type(TypeExpression::Named("string".to_string())),
                TagNode::new("property")
                    .with_name("b")
                    .with_type(TypeExpression::Named("number".to_string())),
            ],
        );
        let route = CommentBlock::new(
            "",
            vec![
                TagNode::new("route").with_description("GET /pets"),
                TagNode::new("param")
                    .with_name("filter.query")
                    .with_type(TypeExpression::Named("PetQuery".to_string())),
            ],
        );

        let output = generate_from_blocks(
            base(),
            Definitions::new(),
            &[typedef, route],
            Some(&ReferenceValidator),
        )
        .unwrap();

        let parameters = &output.document.operation("/pets", "get").unwrap().parameters;
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].name, "a");
        assert!(parameters[0].required);
        assert_eq!(parameters[1].name, "b");
        assert!(!parameters[1].required);
        assert!(output.validation.is_validated());
        assert_eq!(output.stats.typedefs, 1);
    }

    #[test]
    fn test_external_definitions_seed_document() {
        let mut definitions = Definitions::new();
        definitions.insert("Pet".to_string(), Definition::default());

        let generator = Generator::new(base(), definitions).unwrap();
        assert!(generator.document().definitions.contains_key("Pet"));
    }

    #[test]
    fn test_unresolved_reference_keeps_document() {
        let block = CommentBlock::new(
            "",
            vec![
                TagNode::new("route").with_description("GET /pets"),
                TagNode::new("returns")
                    .with_type(TypeExpression::Named("Pet".to_string()))
                    .with_description("200 - ok"),
            ],
        );

        let output =
            generate_from_blocks(base(), Definitions::new(), &[block], Some(&ReferenceValidator))
                .unwrap();

        assert!(matches!(output.validation, ValidationStatus::Unvalidated(ref e) if e.len() == 1));
        assert!(output.document.operation("/pets", "get").is_some());
    }
}
