//! Elasticsearch-compatible HTTP index backend.

use crate::error::{IndexError, IndexResult};
use crate::traits::{IndexHealth, SearchIndex, Visibility};
use async_trait::async_trait;
use carrel_core::document::{Document, DocumentKey, DocumentStatus, DOCUMENT_STATUS_FIELD};
use carrel_core::schema::FieldSchema;
use reqwest::{StatusCode, Url};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// Upper bound on search hits returned per query.
const MAX_RESULTS: usize = 10_000;

/// Index backend speaking the Elasticsearch HTTP API.
///
/// Writes use `refresh=true` so a query issued after an upsert acknowledges
/// sees the new version; the catalog's contract is read-your-writes, not
/// eventual convergence.
pub struct ElasticsearchIndex {
    http: reqwest::Client,
    base_url: Url,
    schema: FieldSchema,
}

impl ElasticsearchIndex {
    /// Create a backend for the given base URL. The schema is the field
    /// registry's latest version for the kind; the index mapping is the
    /// union of all versions' fields.
    pub fn new(url: &str, request_timeout: Duration, schema: FieldSchema) -> IndexResult<Self> {
        let base_url = Url::parse(url)
            .map_err(|e| IndexError::Backend(format!("invalid index URL: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            schema,
        })
    }

    fn index_name(&self) -> &'static str {
        self.schema.kind().index_name()
    }

    fn url(&self, segments: &[&str]) -> IndexResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IndexError::Backend("index URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Typed properties for every registry field.
    fn mapping_properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        for (name, ty) in self.schema.fields() {
            properties.insert(name.to_string(), json!({"type": ty.as_str()}));
        }
        properties
    }

    /// Index creation body. Dynamic mapping is off: unknown fields must be
    /// rejected by validation, never silently mapped by the index.
    fn mapping_body(&self) -> Value {
        json!({
            "mappings": {
                "dynamic": false,
                "properties": self.mapping_properties(),
            }
        })
    }

    fn search_body(filter: &BTreeMap<String, Value>, visibility: Visibility) -> Value {
        let clauses: Vec<Value> = filter
            .iter()
            .map(|(name, value)| {
                let mut term = Map::new();
                term.insert(name.clone(), value.clone());
                json!({"term": term})
            })
            .collect();

        let mut query = json!({"bool": {"filter": clauses}});
        if visibility == Visibility::Visible {
            query["bool"]["must_not"] =
                json!([{"term": {DOCUMENT_STATUS_FIELD: DocumentStatus::Deleted.as_str()}}]);
        }

        json!({
            "query": query,
            "size": MAX_RESULTS,
            "sort": [
                {"flowcell_barcode": {"order": "asc", "missing": "_last"}},
                {"lane": {"order": "asc", "missing": "_last"}},
                {"library_name": {"order": "asc", "missing": "_last"}},
                {"location": {"order": "asc", "missing": "_last"}},
            ],
        })
    }
}

/// Classify reqwest transport failures as fail-fast unavailability.
fn transport(err: reqwest::Error) -> IndexError {
    if err.is_connect() || err.is_timeout() {
        IndexError::Unavailable(err.to_string())
    } else {
        IndexError::Http(err)
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn verify_mapping(&self) -> IndexResult<()> {
        let url = self.url(&[self.index_name()])?;
        let response = self.http.get(url.clone()).send().await.map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            let response = self
                .http
                .put(url)
                .json(&self.mapping_body())
                .send()
                .await
                .map_err(transport)?;
            if !response.status().is_success() {
                return Err(IndexError::Backend(format!(
                    "index creation failed: {}",
                    response.status()
                )));
            }
            tracing::info!(index = self.index_name(), "Created index with typed mapping");
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(IndexError::Backend(format!(
                "mapping introspection failed: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await.map_err(transport)?;
        let mapped = &body[self.index_name()]["mappings"]["properties"];

        // Schema evolution is strictly additive: fields absent from an older
        // index are added, a retyped field is a hard error.
        let mut added = Map::new();
        for (name, ty) in self.schema.fields() {
            match mapped[name]["type"].as_str() {
                Some(existing) if existing == ty.as_str() => {}
                Some(existing) => {
                    return Err(IndexError::MappingMismatch(format!(
                        "field {name}: registry has {}, index has {existing}",
                        ty.as_str()
                    )));
                }
                None => {
                    added.insert(name.to_string(), json!({"type": ty.as_str()}));
                }
            }
        }
        if !added.is_empty() {
            let count = added.len();
            let url = self.url(&[self.index_name(), "_mapping"])?;
            let response = self
                .http
                .put(url)
                .json(&json!({"properties": added}))
                .send()
                .await
                .map_err(transport)?;
            if !response.status().is_success() {
                return Err(IndexError::Backend(format!(
                    "mapping update failed: {}",
                    response.status()
                )));
            }
            tracing::info!(
                index = self.index_name(),
                fields = count,
                "Added new registry fields to index mapping"
            );
        }
        Ok(())
    }

    async fn get_document(&self, key: &DocumentKey) -> IndexResult<Option<Document>> {
        let url = self.url(&[self.index_name(), "_doc", &key.doc_id()])?;
        let response = self.http.get(url).send().await.map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(IndexError::Backend(format!(
                "document fetch failed: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await.map_err(transport)?;
        let source = body
            .get("_source")
            .cloned()
            .unwrap_or_else(|| json!({}));
        Ok(Some(serde_json::from_value(source)?))
    }

    async fn put_document(&self, key: &DocumentKey, document: &Document) -> IndexResult<()> {
        let mut url = self.url(&[self.index_name(), "_doc", &key.doc_id()])?;
        url.set_query(Some("refresh=true"));

        let response = self
            .http
            .put(url)
            .json(document)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(IndexError::Backend(format!(
                "document write failed: {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn search(
        &self,
        filter: &BTreeMap<String, Value>,
        visibility: Visibility,
    ) -> IndexResult<Vec<Document>> {
        let url = self.url(&[self.index_name(), "_search"])?;
        let response = self
            .http
            .post(url)
            .json(&Self::search_body(filter, visibility))
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(IndexError::Backend(format!(
                "search failed: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await.map_err(transport)?;
        let hits = body["hits"]["hits"].as_array().cloned().unwrap_or_default();
        hits.into_iter()
            .map(|mut hit| Ok(serde_json::from_value(hit["_source"].take())?))
            .collect()
    }

    async fn health(&self) -> IndexResult<IndexHealth> {
        let url = self.url(&["_cluster", "health"])?;
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(err) => return Ok(IndexHealth::error(err.to_string())),
        };
        if !response.status().is_success() {
            return Ok(IndexHealth::error(format!(
                "cluster health returned {}",
                response.status()
            )));
        }

        let body: Value = response.json().await.map_err(transport)?;
        let color = body["status"].as_str().unwrap_or("unknown");
        match color {
            "green" | "yellow" => Ok(IndexHealth {
                status: crate::traits::IndexStatus::Ok,
                detail: Some(color.to_string()),
            }),
            other => Ok(IndexHealth::error(other.to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "elasticsearch"
    }
}
