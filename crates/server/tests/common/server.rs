//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use carrel_core::config::AppConfig;
use carrel_index::{MemoryIndex, SearchIndex};
use carrel_server::{create_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A test server wrapper with an in-memory index.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server.
    pub async fn new() -> Self {
        let index: Arc<dyn SearchIndex> = Arc::new(MemoryIndex::new());
        let state = AppState::new(AppConfig::for_testing(), index);
        let router = create_router(state.clone());
        Self { router, state }
    }
}

/// Claim headers accepted by the authorization gate.
#[allow(dead_code)]
pub fn authorized_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("OIDC_access_token", "test-token"),
        ("OIDC_CLAIM_expires_in", "1234567890"),
        ("OIDC_CLAIM_email", "tester@example.org"),
        ("OIDC_CLAIM_user_id", "tester"),
    ]
}

/// Make a JSON request against the router.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
