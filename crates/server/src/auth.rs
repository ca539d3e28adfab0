//! Authorization gate middleware and trusted-proxy claim extraction.
//!
//! Authentication happens upstream: a trusted reverse proxy verifies the end
//! user and injects claim headers. This module reads those headers verbatim
//! into a [`ClaimSet`] and evaluates the gate policy before a request can
//! reach the merge or query engines. No token is ever parsed or verified
//! here, and claim values never appear in logs or responses.

use crate::error::ApiError;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use carrel_core::claims::ClaimSet;
use tracing::Instrument;
use uuid::Uuid;

/// Maximum length for client-provided trace IDs.
/// Longer values are truncated to prevent log bloat and log injection.
const MAX_TRACE_ID_LEN: usize = 128;

/// Header names injected by the trusted proxy.
pub const ACCESS_TOKEN_HEADER: &str = "OIDC_access_token";
pub const EXPIRES_IN_HEADER: &str = "OIDC_CLAIM_expires_in";
pub const EMAIL_HEADER: &str = "OIDC_CLAIM_email";
pub const SUB_HEADER: &str = "OIDC_CLAIM_sub";
pub const USER_ID_HEADER: &str = "OIDC_CLAIM_user_id";

/// Trace ID for request correlation.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a trace ID from a client-provided value, truncated by
    /// character count and filtered to printable ASCII.
    pub fn from_client(value: &str) -> Self {
        let sanitized: String = value
            .chars()
            .take(MAX_TRACE_ID_LEN)
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        if sanitized.is_empty() {
            Self::new()
        } else {
            Self(sanitized)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn header_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Build the per-request claim set from proxy headers.
pub fn extract_claims(req: &Request) -> ClaimSet {
    ClaimSet {
        access_token: header_value(req, ACCESS_TOKEN_HEADER),
        expires_in: header_value(req, EXPIRES_IN_HEADER),
        email: header_value(req, EMAIL_HEADER),
        sub: header_value(req, SUB_HEADER),
        user_id: header_value(req, USER_ID_HEADER),
    }
}

/// Gate middleware for routes that reach the engines. Stateless: every
/// request is evaluated on its own claim set.
pub async fn claims_gate(req: Request, next: Next) -> Result<Response, ApiError> {
    let claims = extract_claims(&req);
    let missing = claims.missing_claims();
    if !missing.is_empty() {
        // names only, never values
        tracing::debug!(missing = ?missing, "request rejected by authorization gate");
        return Err(ApiError::NotAuthorized);
    }
    Ok(next.run(req).await)
}

/// Trace middleware: establishes the request span carrying the trace ID.
pub async fn trace_middleware(mut req: Request, next: Next) -> Response {
    let trace_id = req
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(TraceId::from_client)
        .unwrap_or_default();
    let trace_id_str = trace_id.0.clone();

    req.extensions_mut().insert(trace_id);

    next.run(req)
        .instrument(tracing::info_span!("request", trace_id = %trace_id_str))
        .await
}
