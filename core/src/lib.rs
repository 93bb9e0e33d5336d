#![deny(missing_docs)]

//! # Refract Core
//!
//! Tolerant OpenAPI 3 parser producing a refract element tree.
//!
//! Malformed documents never fail: every problem becomes an `error` or
//! `warning` annotation in the returned `ParseResult`, next to whatever part
//! of the document could still be parsed.

/// Shared error types.
pub mod error;

/// Element tree and refract serialization.
pub mod element;

/// Values plus annotations.
pub mod parse_result;

/// Annotation factories.
pub mod annotations;

/// Per-document parse state.
pub mod context;

/// Pipeline, object/array traversal and key dispatch.
pub mod combinators;

/// YAML/JSON text to element tree.
pub mod loader;

/// OpenAPI 3 grammar productions.
pub mod oas;

pub use context::{Context, ParseOptions};
pub use element::{Element, Member, SourceMap};
pub use error::{AppError, AppResult};
pub use oas::{parse_openapi_document, parse_openapi_source};
pub use parse_result::{ParseResult, Severity};
