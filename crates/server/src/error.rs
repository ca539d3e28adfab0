//! API error types and the wire rejection body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use carrel_catalog::CatalogError;
use carrel_index::IndexError;
use serde::Serialize;

/// Fixed message for any request addressing an unknown resource. The same
/// message covers unmapped routes and upserts naming an unrecognized
/// enumerated identity value.
pub const NOT_FOUND_REJECTION: &str = "The requested resource could not be found.";

/// Fixed message for a request failing the authorization gate.
pub const NOT_AUTHORIZED_REJECTION: &str = "Not authorized.";

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct RejectionResponse {
    /// Short machine-checkable rejection, stable per failure cause.
    pub rejection: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", NOT_FOUND_REJECTION)]
    NotFound,

    #[error("HTTP method not allowed, supported methods: {allowed}")]
    MethodNotAllowed { allowed: &'static str },

    #[error("{}", NOT_AUTHORIZED_REJECTION)]
    NotAuthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotAuthorized => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Catalog(e) => match e {
                CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
                CatalogError::Index(e) => index_status_code(e),
            },
            Self::Index(e) => index_status_code(e),
        }
    }
}

fn index_status_code(err: &IndexError) -> StatusCode {
    match err {
        IndexError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = RejectionResponse {
            rejection: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_are_stable() {
        assert_eq!(
            ApiError::NotFound.to_string(),
            "The requested resource could not be found."
        );
        assert_eq!(
            ApiError::MethodNotAllowed { allowed: "GET" }.to_string(),
            "HTTP method not allowed, supported methods: GET"
        );
        assert_eq!(ApiError::NotAuthorized.to_string(), "Not authorized.");
    }

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MethodNotAllowed { allowed: "POST" }.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ApiError::NotAuthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Catalog(CatalogError::Validation("x".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Index(IndexError::Unavailable("down".to_string())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
