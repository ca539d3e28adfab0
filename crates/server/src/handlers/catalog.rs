//! Catalog endpoints: schema projection, upsert, and the two query modes.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use carrel_catalog::Filter;
use carrel_core::document::{Document, DocumentKey, Location, PartialDocument};
use carrel_core::schema::{DocumentKind, FieldSchema, SchemaVersion};
use serde_json::{json, Value};

// Path segments that fail to name a known kind, version, lane, or location
// address a nonexistent resource; the rejection is indistinguishable from an
// unmapped route.

fn parse_kind(kind: &str) -> ApiResult<DocumentKind> {
    DocumentKind::parse(kind).map_err(|_| ApiError::NotFound)
}

fn parse_version(version: &str) -> ApiResult<SchemaVersion> {
    SchemaVersion::parse(version).map_err(|_| ApiError::NotFound)
}

fn parse_lane(lane: &str) -> ApiResult<i32> {
    lane.parse().map_err(|_| ApiError::NotFound)
}

fn parse_location(location: &str) -> ApiResult<Location> {
    Location::parse(location).map_err(|_| ApiError::NotFound)
}

/// GET /{kind}/schema/{version}
pub async fn get_schema(Path((kind, version)): Path<(String, String)>) -> ApiResult<Json<Value>> {
    let kind = parse_kind(&kind)?;
    let version = parse_version(&version)?;
    Ok(Json(FieldSchema::new(kind, version).json_schema()))
}

/// POST /{kind}/metadata/{version}/{flowcell}/{lane}/{library}
pub async fn upsert_metadata(
    State(state): State<AppState>,
    Path((kind, version, flowcell, lane, library)): Path<(String, String, String, String, String)>,
    Json(partial): Json<PartialDocument>,
) -> ApiResult<Json<Value>> {
    parse_kind(&kind)?;
    let version = parse_version(&version)?;
    let key = DocumentKey {
        flowcell_barcode: flowcell,
        lane: parse_lane(&lane)?,
        library_name: library,
        location: None,
    };
    state.catalog.upsert(version, &key, &partial).await?;
    Ok(Json(json!({})))
}

/// POST /{kind}/metadata/{version}/{flowcell}/{lane}/{library}/{location}
pub async fn upsert_metadata_at_location(
    State(state): State<AppState>,
    Path((kind, version, flowcell, lane, library, location)): Path<(
        String,
        String,
        String,
        String,
        String,
        String,
    )>,
    Json(partial): Json<PartialDocument>,
) -> ApiResult<Json<Value>> {
    parse_kind(&kind)?;
    let version = parse_version(&version)?;
    let key = DocumentKey {
        flowcell_barcode: flowcell,
        lane: parse_lane(&lane)?,
        library_name: library,
        location: Some(parse_location(&location)?),
    };
    state.catalog.upsert(version, &key, &partial).await?;
    Ok(Json(json!({})))
}

/// POST /{kind}/query/{version}
///
/// Returns current documents with status Normal matching the filter.
pub async fn query(
    State(state): State<AppState>,
    Path((kind, version)): Path<(String, String)>,
    Json(filter): Json<Filter>,
) -> ApiResult<Json<Vec<Document>>> {
    parse_kind(&kind)?;
    parse_version(&version)?;
    Ok(Json(state.catalog.query(&filter).await?))
}

/// POST /{kind}/queryall/{version}
///
/// Returns current documents regardless of status.
pub async fn query_all(
    State(state): State<AppState>,
    Path((kind, version)): Path<(String, String)>,
    Json(filter): Json<Filter>,
) -> ApiResult<Json<Vec<Document>>> {
    parse_kind(&kind)?;
    parse_version(&version)?;
    Ok(Json(state.catalog.query_all(&filter).await?))
}
