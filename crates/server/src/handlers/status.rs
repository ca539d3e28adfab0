//! Service status endpoints.

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use carrel_index::IndexStatus;
use serde::Serialize;

/// Health summary: service status plus backing index availability.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status; "Started" once the server accepts requests.
    pub carrel: &'static str,
    /// Backing index status: "OK" or "Error".
    pub search: &'static str,
}

/// GET /health
///
/// Intentionally unauthenticated so load balancers and orchestrators can
/// probe it. Degraded index availability turns the response 503; operations
/// against a degraded index fail rather than read stale data.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let search = match state.index.health().await {
        Ok(health) if health.is_ok() => IndexStatus::Ok,
        Ok(health) => {
            tracing::warn!(detail = ?health.detail, "search index degraded");
            IndexStatus::Error
        }
        Err(e) => {
            tracing::warn!(error = %e, "search index health probe failed");
            IndexStatus::Error
        }
    };

    let status = if search == IndexStatus::Ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            carrel: "Started",
            search: search.as_str(),
        }),
    )
}

/// Service version descriptor.
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

/// GET /version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}
