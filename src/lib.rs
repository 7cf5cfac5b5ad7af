//! Swagger From Comments - Swagger 2.0 documents from JSDoc-style route annotations.
//!
//! Route handlers documented with a fixed vocabulary of comment tags (`@route`, `@param`,
//! `@returns`, `@typedef`, `@property`, `@security`, `@produces`, `@consumes`, `@group`,
//! `@summary`, `@operationId`) are turned into one cumulative Swagger document.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Collects annotated source files in a stable order
//! 2. [`comment_parser`] - Extracts `/** ... */` blocks and their tag nodes
//! 3. [`tag`] - Normalises tag nodes into typed descriptors
//! 4. [`type_resolver`] - Maps type expressions onto types and `$ref` schemas
//! 5. [`route_assembler`] / [`typedef`] - Build one fragment per comment block
//! 6. [`document`] - The document model and the cumulative merge
//! 7. [`generator`] - Drives a run and owns the accumulated document
//! 8. [`validator`] - Structural checks on the finished document
//! 9. [`serializer`] - Reads inputs and writes YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_comments::generator::{generate, GeneratorOptions};
//! use swagger_from_comments::scanner::collect_sources;
//! use swagger_from_comments::serializer::serialize_json;
//! use std::path::PathBuf;
//!
//! let files = collect_sources(&[PathBuf::from("./routes")], &["js".to_string()]).unwrap();
//! let options = GeneratorOptions::new()
//!     .with_base_document(serde_json::json!({
//!         "info": { "title": "Pet Store", "version": "1.0.0" },
//!         "host": "localhost:3000"
//!     }))
//!     .with_files(files);
//!
//! let output = generate(options).unwrap();
//! println!("{}", serialize_json(&output.document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod comment_parser;
pub mod document;
pub mod error;
pub mod generator;
pub mod route_assembler;
pub mod scanner;
pub mod security;
pub mod serializer;
pub mod tag;
pub mod type_resolver;
pub mod typedef;
pub mod validator;
