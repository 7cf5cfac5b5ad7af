use crate::document::Definitions;
use crate::generator::{generate, GeneratorOptions};
use crate::scanner::{collect_sources, DEFAULT_EXTENSIONS};
use crate::serializer::{read_definitions, read_value, serialize_json, serialize_yaml, write_to_file};
use crate::validator::ValidationStatus;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use serde_json::json;
use std::path::PathBuf;

/// Swagger From Comments - generate a Swagger 2.0 document from JSDoc-style route annotations
#[derive(Parser, Debug)]
#[command(name = "swagger-from-comments")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Annotated source files or directories, processed in the given order
    #[arg(value_name = "SOURCES", required = true)]
    pub sources: Vec<PathBuf>,

    /// Base document (info, host, schemes, ...) as JSON or YAML
    #[arg(short = 'b', long = "base", value_name = "FILE")]
    pub base_path: Option<PathBuf>,

    /// Externally extracted schema definitions as JSON or YAML
    #[arg(short = 'd', long = "definitions", value_name = "FILE")]
    pub definitions_path: Option<PathBuf>,

    /// File extensions scanned inside directories
    #[arg(short = 'e', long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl CliArgs {
    /// Configured extensions, or the defaults when none were given.
    pub fn scan_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            self.extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect()
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    for source in &args.sources {
        if !source.exists() {
            anyhow::bail!("Source path does not exist: {}", source.display());
        }
    }
    for input in args.base_path.iter().chain(args.definitions_path.iter()) {
        if !input.is_file() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
    }

    info!("Sources: {:?}", args.sources);
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting Swagger document generation...");

    // Step 1: Collect annotated source files
    let extensions = args.scan_extensions();
    let files = collect_sources(&args.sources, &extensions)?;
    info!("Found {} source files", files.len());
    if files.is_empty() {
        warn!("No source files matched extensions {:?}", extensions);
    }

    // Step 2: Load base document and external definitions
    let base = match &args.base_path {
        Some(path) => read_value(path)?,
        None => json!({
            "info": { "title": "Generated API", "version": "1.0.0" }
        }),
    };
    let definitions = match &args.definitions_path {
        Some(path) => read_definitions(path)?,
        None => Definitions::new(),
    };

    // Step 3: Assemble the document
    let options = GeneratorOptions::new()
        .with_base_document(base)
        .with_files(files)
        .with_definitions(definitions);
    let output = generate(options)?;

    match &output.validation {
        ValidationStatus::Validated => info!("Document validated"),
        ValidationStatus::Unvalidated(errors) => {
            warn!("Writing unvalidated document ({} problems)", errors.len())
        }
        ValidationStatus::Skipped => debug!("Validation skipped"),
    }

    // Step 4: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&output.document)?,
        OutputFormat::Json => serialize_json(&output.document)?,
    };

    // Step 5: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Successfully wrote Swagger document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files processed: {}", output.stats.files);
    info!("  - Comment blocks: {}", output.stats.blocks);
    info!("  - Typedefs: {}", output.stats.typedefs);
    info!("  - Operations: {}", output.stats.operations);

    Ok(())
}
