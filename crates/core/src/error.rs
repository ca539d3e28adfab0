//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown document kind: {0}")]
    UnknownKind(String),

    #[error("unknown schema version: {0}")]
    UnknownVersion(String),

    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("field validation failed: {0}")]
    FieldValidation(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
