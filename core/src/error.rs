//! # Error Handling
//!
//! Provides the `AppError` enum for program-level failures.
//!
//! Problems inside a document are never reported through this type; they are
//! annotations inside a `ParseResult`. `AppError` covers what happens before a
//! document tree exists: text that cannot be loaded.

use derive_more::Display;

/// The Global Error Enum.
#[derive(Debug, Display)]
pub enum AppError {
    /// Source text could not be turned into an element tree.
    #[display("Load Error: {_0}")]
    Load(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
