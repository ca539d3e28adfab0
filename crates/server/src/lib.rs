//! HTTP API server for the Carrel metadata catalog.
//!
//! This crate provides the HTTP control plane:
//! - Health and version probes
//! - JSON-Schema projection of the field registry
//! - Metadata upsert with merge semantics
//! - Visible-only and all-status queries
//! - The trusted-proxy authorization gate

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::TraceId;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
