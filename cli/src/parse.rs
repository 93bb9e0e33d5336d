#![deny(missing_docs)]

//! # Parse Command
//!
//! Parses an OpenAPI document and prints the parse result as refract JSON.

use std::fs;
use std::path::PathBuf;

use refract_core::{parse_openapi_source, ParseOptions, ParseResult};
use tracing::info;

use crate::error::{CliError, CliResult};

/// Arguments for the parse command.
#[derive(clap::Args, Debug, Clone)]
pub struct ParseArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    pub file: PathBuf,

    /// Keep source maps on value elements.
    #[clap(long, env = "REFRACT_SOURCE_MAP")]
    pub source_map: bool,

    /// Print compact JSON instead of pretty-printed JSON.
    #[clap(long)]
    pub compact: bool,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        ParseOptions {
            generate_source_map: self.source_map,
        }
    }
}

/// Reads and parses the document named by `args`.
pub fn execute(args: &ParseArgs) -> CliResult<ParseResult> {
    let source = fs::read_to_string(&args.file)?;

    let result = parse_openapi_source(&source, args.options())?;
    info!(
        file = %args.file.display(),
        errors = result.errors().count(),
        warnings = result.warnings().count(),
        "parsed document"
    );
    Ok(result)
}

/// Renders a parse result as refract JSON.
pub fn render(result: &ParseResult, compact: bool) -> CliResult<String> {
    let json = result.to_refract();
    let rendered = if compact {
        serde_json::to_string(&json)
    } else {
        serde_json::to_string_pretty(&json)
    };
    rendered.map_err(|e| CliError::General(format!("Failed to render JSON: {}", e)))
}
