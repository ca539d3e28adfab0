//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Backing search index configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IndexConfig {
    /// In-process index. For tests and single-node deployments; documents
    /// do not survive a restart.
    Memory,
    /// Elasticsearch-compatible HTTP index.
    Elasticsearch {
        /// Base URL, e.g. "http://localhost:9200".
        url: String,
        /// Per-request timeout in seconds.
        #[serde(default = "default_request_timeout_secs")]
        request_timeout_secs: u64,
    },
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::Memory
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

impl AppConfig {
    /// Test configuration: loopback bind, in-memory index.
    pub fn for_testing() -> Self {
        Self::default()
    }
}
