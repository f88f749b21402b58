//! API Swagger Generator - Command-line tool for generating Swagger 2.0 documents.
//!
//! Reads one API description file (or a directory of them) and writes the Swagger
//! document for the selected API as JSON or YAML.
//!
//! # Usage
//!
//! ```bash
//! apidoc-swagger [OPTIONS] <INPUT>
//! ```
//!
//! # Examples
//!
//! Generate JSON documentation:
//! ```bash
//! apidoc-swagger ./api-docs/shop.json -o swagger.json
//! ```
//!
//! Pick one API out of a directory and emit YAML:
//! ```bash
//! apidoc-swagger ./api-docs --api Shop --api-version 2 -f yaml
//! ```
//!
//! List the APIs found in a directory:
//! ```bash
//! apidoc-swagger ./api-docs --list
//! ```

use anyhow::Result;
use apidoc_swagger::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse first so the verbose flag can set the log level
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("API Swagger Generator starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
