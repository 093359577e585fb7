//! OpenAPI DTO Generator - command-line tool.
//!
//! Generates an OpenAPI 3.0 document from a Rust project's data-transfer
//! types and a declarative routing table.
//!
//! # Usage
//!
//! ```bash
//! openapi-dtogen [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-dtogen ./my-api-project -o openapi.yaml
//! ```
//!
//! Generate JSON documentation with a custom routing table:
//! ```bash
//! openapi-dtogen ./my-api-project -r config/routes.yaml -f json -o openapi.json
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_dtogen::cli;

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

    info!("OpenAPI DTO Generator starting...");

    let args = cli::validate_args(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
