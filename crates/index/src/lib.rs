//! Search index abstraction and backends for Carrel.
//!
//! This crate specifies the backing index at its boundary:
//! - Mapping introspection and creation
//! - Upsert-by-key document writes
//! - Field-equality search distinguishing visible vs. all documents
//! - A binary cluster availability probe
//!
//! Backends: in-memory (tests, single node) and Elasticsearch-compatible
//! HTTP.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::{elasticsearch::ElasticsearchIndex, memory::MemoryIndex};
pub use error::{IndexError, IndexResult};
pub use traits::{IndexHealth, IndexStatus, SearchIndex, Visibility};

use carrel_core::config::IndexConfig;
use carrel_core::schema::{DocumentKind, FieldSchema, SchemaVersion};
use std::sync::Arc;
use std::time::Duration;

/// Create a search index from configuration.
pub fn from_config(config: &IndexConfig, kind: DocumentKind) -> IndexResult<Arc<dyn SearchIndex>> {
    match config {
        IndexConfig::Memory => Ok(Arc::new(MemoryIndex::new())),
        IndexConfig::Elasticsearch {
            url,
            request_timeout_secs,
        } => {
            let schema = FieldSchema::new(kind, SchemaVersion::latest());
            let index = ElasticsearchIndex::new(
                url,
                Duration::from_secs(*request_timeout_secs),
                schema,
            )?;
            Ok(Arc::new(index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_config_memory_ok() {
        let index = from_config(&IndexConfig::Memory, DocumentKind::ReadGroup).unwrap();
        assert_eq!(index.backend_name(), "memory");
        assert!(index.health().await.unwrap().is_ok());
    }

    #[test]
    fn from_config_elasticsearch_ok() {
        let config = IndexConfig::Elasticsearch {
            url: "http://localhost:9200".to_string(),
            request_timeout_secs: 5,
        };
        let index = from_config(&config, DocumentKind::ReadGroup).unwrap();
        assert_eq!(index.backend_name(), "elasticsearch");
    }

    #[test]
    fn from_config_rejects_invalid_url() {
        let config = IndexConfig::Elasticsearch {
            url: "not a url".to_string(),
            request_timeout_secs: 5,
        };
        assert!(from_config(&config, DocumentKind::ReadGroup).is_err());
    }
}
