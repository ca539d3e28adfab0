//! Application state shared across handlers.

use carrel_catalog::DocumentCatalog;
use carrel_core::config::AppConfig;
use carrel_core::schema::DocumentKind;
use carrel_index::SearchIndex;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The document catalog.
    pub catalog: Arc<DocumentCatalog>,
    /// Backing search index, kept for health probes.
    pub index: Arc<dyn SearchIndex>,
}

impl AppState {
    /// Create a new application state over a search index.
    pub fn new(config: AppConfig, index: Arc<dyn SearchIndex>) -> Self {
        let catalog = Arc::new(DocumentCatalog::new(DocumentKind::ReadGroup, index.clone()));
        Self {
            config: Arc::new(config),
            catalog,
            index,
        }
    }
}
