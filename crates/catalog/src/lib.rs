//! Composite-key document store for Carrel.
//!
//! The catalog holds the current version of each document, one per identity
//! key, and is the only writer of the backing index. It implements:
//! - Merge-upsert: create on first reference, field-level merge after
//! - Soft delete: `document_status` is an ordinary mergeable field
//! - Two retrieval modes: visible-only and all-status
//! - Per-key write linearization over the index

mod error;
mod locks;

pub use error::{CatalogError, CatalogResult};

use carrel_core::document::{
    Document, DocumentKey, DocumentStatus, PartialDocument, DOCUMENT_STATUS_FIELD,
};
use carrel_core::schema::{DocumentKind, FieldSchema, SchemaVersion};
use carrel_index::{SearchIndex, Visibility};
use locks::KeyLocks;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Query filter: field name to expected value, AND semantics. Fields not
/// supplied are unconstrained.
pub type Filter = BTreeMap<String, Value>;

/// The document store and merge engine for one document kind.
pub struct DocumentCatalog {
    kind: DocumentKind,
    index: Arc<dyn SearchIndex>,
    locks: KeyLocks,
}

impl DocumentCatalog {
    pub fn new(kind: DocumentKind, index: Arc<dyn SearchIndex>) -> Self {
        Self {
            kind,
            index,
            locks: KeyLocks::new(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Create-or-merge the document for `key`.
    ///
    /// Fields present in `partial` replace stored values, an explicit empty
    /// string included; absent fields keep their stored values. The
    /// read-merge-write runs under the key's lock: a concurrent upsert to
    /// the same key sees the fully applied result of this one, and exactly
    /// one current version exists at every point.
    ///
    /// Returns an empty acknowledgment; callers re-read state via query.
    pub async fn upsert(
        &self,
        version: SchemaVersion,
        key: &DocumentKey,
        partial: &PartialDocument,
    ) -> CatalogResult<()> {
        let schema = FieldSchema::new(self.kind, version);
        schema.validate_key(key)?;
        schema.validate(partial)?;
        schema.validate_identity(key, partial)?;

        let lock = self.locks.lock_for(key);
        let _guard = lock.lock().await;

        let mut document = match self.index.get_document(key).await? {
            Some(current) => current,
            None => Self::create(&schema, key),
        };
        document.apply(partial);
        self.index.put_document(key, &document).await?;
        tracing::debug!(key = %key, "document upserted");
        Ok(())
    }

    /// A fresh document carrying the identity fields and, where the schema
    /// version defines it, the default status.
    fn create(schema: &FieldSchema, key: &DocumentKey) -> Document {
        let mut document = Document::new();
        for (name, value) in key.identity_fields() {
            document.set(name, value);
        }
        if schema.has_field(DOCUMENT_STATUS_FIELD) {
            document.set(
                DOCUMENT_STATUS_FIELD,
                Value::from(DocumentStatus::Normal.as_str()),
            );
        }
        document
    }

    /// Current documents matching `filter` with status Normal.
    pub async fn query(&self, filter: &Filter) -> CatalogResult<Vec<Document>> {
        Ok(self.index.search(filter, Visibility::Visible).await?)
    }

    /// Current documents matching `filter` regardless of status. Still one
    /// record per key: the current version, never historical ones.
    pub async fn query_all(&self, filter: &Filter) -> CatalogResult<Vec<Document>> {
        Ok(self.index.search(filter, Visibility::All).await?)
    }
}
