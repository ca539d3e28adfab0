//! Catalog error types.

use carrel_index::IndexError;
use thiserror::Error;

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl From<carrel_core::Error> for CatalogError {
    fn from(err: carrel_core::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
