#![deny(missing_docs)]

//! # Document Loader
//!
//! Turns YAML or JSON text into an element tree.
//!
//! `serde_yaml` does not expose spans, so loaded trees carry no source maps.
//! Callers owning a span-aware lexer can build `Element` trees themselves and
//! hand them to `parse_openapi_document` directly.

use crate::element::{Element, Member};
use crate::error::{AppError, AppResult};
use serde_json::Value as JsonValue;

/// Parses YAML (or JSON, which is a YAML subset) into an element tree.
pub fn parse_yaml(source: &str) -> AppResult<Element> {
    let raw: JsonValue = serde_yaml::from_str(source)
        .map_err(|e| AppError::Load(format!("Failed to parse OpenAPI YAML: {}", e)))?;
    Ok(element_from_json(&raw))
}

/// Converts a JSON value into an element tree, keeping member order.
pub fn element_from_json(value: &JsonValue) -> Element {
    match value {
        JsonValue::Null => Element::null(),
        JsonValue::Bool(b) => Element::boolean(*b),
        JsonValue::Number(n) => Element::number(n.clone()),
        JsonValue::String(s) => Element::string(s.as_str()),
        JsonValue::Array(items) => Element::array(items.iter().map(element_from_json)),
        JsonValue::Object(entries) => Element::object(
            entries
                .iter()
                .map(|(key, value)| Member::new(Element::string(key.as_str()), element_from_json(value))),
        ),
    }
}
