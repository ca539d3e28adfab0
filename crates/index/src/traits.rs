//! Search index trait definitions.

use crate::error::IndexResult;
use async_trait::async_trait;
use carrel_core::document::{Document, DocumentKey};
use serde_json::Value;
use std::collections::BTreeMap;

/// Which documents a read should see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Only documents whose status is Normal. A document without a status
    /// field counts as Normal.
    Visible,
    /// Every current document regardless of status.
    All,
}

/// Availability of the backing index. The gate is binary: anything degraded
/// below the availability threshold is `Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexStatus {
    Ok,
    Error,
}

impl IndexStatus {
    /// Wire spelling used in health summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "Error",
        }
    }
}

/// Result of a health probe.
#[derive(Clone, Debug)]
pub struct IndexHealth {
    pub status: IndexStatus,
    /// Backend-reported detail, e.g. the cluster color.
    pub detail: Option<String>,
}

impl IndexHealth {
    pub fn ok() -> Self {
        Self {
            status: IndexStatus::Ok,
            detail: None,
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: IndexStatus::Error,
            detail: Some(detail.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == IndexStatus::Ok
    }
}

/// Text-indexed document store reachable by key and by field-equality
/// search. Holds exactly one current document per identity key.
///
/// Implementations never retry internally: a transiently unavailable backend
/// fails fast and the caller decides whether to retry.
#[async_trait]
pub trait SearchIndex: Send + Sync + 'static {
    /// Verify the backend mapping matches the field registry, creating it
    /// when absent. Called at startup before the server accepts requests.
    async fn verify_mapping(&self) -> IndexResult<()>;

    /// Fetch the current document for a key, regardless of status.
    async fn get_document(&self, key: &DocumentKey) -> IndexResult<Option<Document>>;

    /// Write the current document for a key, replacing any prior version.
    async fn put_document(&self, key: &DocumentKey, document: &Document) -> IndexResult<()>;

    /// Field-equality search: every filter field must match. A filter over
    /// a field no document carries matches nothing. Results are ordered by
    /// identity tuple.
    async fn search(
        &self,
        filter: &BTreeMap<String, Value>,
        visibility: Visibility,
    ) -> IndexResult<Vec<Document>>;

    /// Probe backend availability.
    async fn health(&self) -> IndexResult<IndexHealth>;

    /// Static backend identifier for logs.
    fn backend_name(&self) -> &'static str;
}
