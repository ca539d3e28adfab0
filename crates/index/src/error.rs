//! Search index error types.

use thiserror::Error;

/// Search index operation errors.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index unavailable: {0}")]
    Unavailable(String),

    #[error("mapping mismatch: {0}")]
    MappingMismatch(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;
