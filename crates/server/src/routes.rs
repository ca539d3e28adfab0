//! Route configuration.

use crate::auth::{claims_gate, trace_middleware};
use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // Open endpoints: health stays unauthenticated so load balancers can
    // probe it; version and the schema projection never reach the engines.
    let open_routes = Router::new()
        .route("/health", get(handlers::health).fallback(only_get))
        .route("/version", get(handlers::version).fallback(only_get))
        .route(
            "/{kind}/schema/{version}",
            get(handlers::get_schema).fallback(only_get),
        );

    // Everything that reaches the merge or query engines passes the gate,
    // plus the probe endpoint that reports the gate's verdict.
    let gated_routes = Router::new()
        .route(
            "/authorization",
            get(handlers::authorization).fallback(only_get),
        )
        .route(
            "/{kind}/metadata/{version}/{flowcell}/{lane}/{library}",
            post(handlers::upsert_metadata).fallback(only_post),
        )
        .route(
            "/{kind}/metadata/{version}/{flowcell}/{lane}/{library}/{location}",
            post(handlers::upsert_metadata_at_location).fallback(only_post),
        )
        .route(
            "/{kind}/query/{version}",
            post(handlers::query).fallback(only_post),
        )
        .route(
            "/{kind}/queryall/{version}",
            post(handlers::query_all).fallback(only_post),
        )
        .route_layer(middleware::from_fn(claims_gate));

    Router::new()
        .merge(open_routes)
        .merge(gated_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(trace_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Method fallback for GET-only paths.
async fn only_get() -> ApiError {
    ApiError::MethodNotAllowed { allowed: "GET" }
}

/// Method fallback for POST-only paths.
async fn only_post() -> ApiError {
    ApiError::MethodNotAllowed { allowed: "POST" }
}

/// Router fallback for paths outside the routing table.
async fn not_found() -> ApiError {
    ApiError::NotFound
}
