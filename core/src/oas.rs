#![deny(missing_docs)]

//! # OpenAPI 3 Grammar
//!
//! - **openapi**: root production and document entry points.
//! - **info / server / paths / path_item / operation / parameter**: one
//!   production per OpenAPI object.
//! - **components / reference**: component registration and `$ref` resolution.

pub mod components;
pub(crate) mod fields;
pub mod info;
pub mod openapi;
pub mod operation;
pub mod parameter;
pub mod path_item;
pub mod paths;
pub mod reference;
pub mod server;

use crate::context::{Context, ParseOptions};
use crate::element::Element;
use crate::error::AppResult;
use crate::loader::parse_yaml;
use crate::parse_result::ParseResult;
use tracing::debug;

/// Parses an OpenAPI 3 element tree.
///
/// Diagnostics are returned as annotations; this never fails. Without
/// `generate_source_map`, value elements carry no source maps while
/// annotations keep theirs.
pub fn parse_openapi_document(document: &Element, options: ParseOptions) -> ParseResult {
    let mut context = Context::new(options);
    let result = openapi::parse_openapi_object(&mut context, document.clone());
    debug!(
        errors = result.errors().count(),
        warnings = result.warnings().count(),
        "parsed OpenAPI document"
    );

    if options.generate_source_map {
        return result;
    }
    result
        .into_iter()
        .map(|mut element| {
            if !element.is_annotation() {
                element.strip_source_maps();
            }
            element
        })
        .collect()
}

/// Loads YAML or JSON text and parses it as an OpenAPI 3 document.
///
/// Only unparseable text is an `Err`.
pub fn parse_openapi_source(source: &str, options: ParseOptions) -> AppResult<ParseResult> {
    let document = parse_yaml(source)?;
    Ok(parse_openapi_document(&document, options))
}
