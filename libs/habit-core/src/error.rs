//! Error types for habit-core.

use thiserror::Error;

/// Result type alias using KeyError.
pub type Result<T> = std::result::Result<T, KeyError>;

/// Errors that can occur when parsing a completion key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("malformed completion key: {key}")]
    Malformed { key: String },

    #[error("non-numeric segment in completion key: {value}")]
    InvalidSegment { value: String },
}
