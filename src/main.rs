//! Swagger From Comments - command-line tool for generating Swagger documentation.
//!
//! This binary reads JSDoc-style annotations (`@route`, `@param`, `@returns`, `@typedef`, ...)
//! from source comments and assembles them into a single Swagger 2.0 document.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-comments [OPTIONS] <SOURCES>...
//! ```
//!
//! # Examples
//!
//! Generate JSON documentation for a routes directory:
//! ```bash
//! swagger-from-comments ./routes -b base.yaml -o swagger.json
//! ```
//!
//! Include definitions extracted from typed sources:
//! ```bash
//! swagger-from-comments ./routes -d definitions.json -f yaml
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_comments::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger From Comments starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
