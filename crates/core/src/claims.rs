//! Claim sets and the authorization policy.
//!
//! Claims are forwarded by a trusted intermediary that has already
//! authenticated the end user. The core consumes them as an injected
//! capability; it never parses headers or verifies tokens itself, which
//! keeps the policy unit-testable with synthetic claim sets.

use serde::{Deserialize, Serialize};

/// Per-request claim set injected by the trusted proxy.
///
/// Ephemeral: exists only for the duration of one request evaluation and is
/// never persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClaimSet {
    pub access_token: Option<String>,
    /// Required to be present; the value is not checked against the clock.
    pub expires_in: Option<String>,
    pub email: Option<String>,
    pub sub: Option<String>,
    pub user_id: Option<String>,
}

impl ClaimSet {
    /// Names of required claims absent from this set.
    ///
    /// The request is authorized iff the result is empty: `access_token`,
    /// `expires_in` and `email` are each mandatory, and at least one of
    /// `sub` / `user_id` must identify the caller. Only claim names surface
    /// here, never values.
    pub fn missing_claims(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.access_token.is_none() {
            missing.push("access_token");
        }
        if self.expires_in.is_none() {
            missing.push("expires_in");
        }
        if self.email.is_none() {
            missing.push("email");
        }
        if self.sub.is_none() && self.user_id.is_none() {
            missing.push("sub or user_id");
        }
        missing
    }

    /// Evaluate the gate policy.
    pub fn is_authorized(&self) -> bool {
        self.missing_claims().is_empty()
    }
}
