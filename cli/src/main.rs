#![deny(missing_docs)]

//! # Refract CLI
//!
//! Command Line Interface for the tolerant OpenAPI 3 parser.
//!
//! Supported Commands:
//! - `parse`: Parses a document and prints the refract parse result.
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (warnings when unset).

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod parse;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Tolerant OpenAPI 3 to API Elements parser")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse an OpenAPI document into a refract parse result.
    Parse(parse::ParseArgs),
}

/// `RUST_LOG` directives, falling back to warnings only.
fn log_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

fn main() -> CliResult<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Parse(args) => {
            let result = parse::execute(args)?;
            println!("{}", parse::render(&result, args.compact)?);

            if result.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
