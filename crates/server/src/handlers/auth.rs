//! Authorization probe endpoint.

use axum::Json;
use serde_json::{json, Value};

/// GET /authorization
///
/// The gate middleware has already evaluated the claim set by the time this
/// handler runs; reaching it is the success case. The body carries nothing:
/// no claim material is ever echoed back.
pub async fn authorization() -> Json<Value> {
    Json(json!({}))
}
