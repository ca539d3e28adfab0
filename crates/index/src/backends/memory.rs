//! In-memory index backend.

use crate::error::IndexResult;
use crate::traits::{IndexHealth, SearchIndex, Visibility};
use async_trait::async_trait;
use carrel_core::document::{Document, DocumentKey, DocumentStatus};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-process index holding current documents in a key-ordered map.
///
/// The map is keyed by the identity tuple, so search results come back in
/// identity order without an explicit sort. Reads clone whole documents
/// under the read lock; a query can never observe a half-applied write.
pub struct MemoryIndex {
    documents: RwLock<BTreeMap<DocumentKey, Document>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn verify_mapping(&self) -> IndexResult<()> {
        Ok(())
    }

    async fn get_document(&self, key: &DocumentKey) -> IndexResult<Option<Document>> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn put_document(&self, key: &DocumentKey, document: &Document) -> IndexResult<()> {
        self.documents
            .write()
            .await
            .insert(key.clone(), document.clone());
        Ok(())
    }

    async fn search(
        &self,
        filter: &BTreeMap<String, Value>,
        visibility: Visibility,
    ) -> IndexResult<Vec<Document>> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|document| document.matches(filter))
            .filter(|document| match visibility {
                Visibility::All => true,
                Visibility::Visible => document.status() != DocumentStatus::Deleted,
            })
            .cloned()
            .collect())
    }

    async fn health(&self) -> IndexResult<IndexHealth> {
        Ok(IndexHealth::ok())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
