//! Document model: identity keys, status, and field maps.
//!
//! A document holds the *current* version of one read group's metadata. Only
//! set fields are present in the map; a field absent from a document is
//! unset, not empty. An explicit empty string is a stored value like any
//! other, which is how clearing a previously set field is modeled.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Storage location of a read group's data.
///
/// The set is closed: a path segment naming any other value addresses a
/// nonexistent resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "GCP")]
    Gcp,
    #[serde(rename = "OnPrem")]
    OnPrem,
}

impl Location {
    /// Parse from the wire spelling. Exact match only.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "GCP" => Ok(Self::Gcp),
            "OnPrem" => Ok(Self::OnPrem),
            _ => Err(Error::UnknownLocation(s.to_string())),
        }
    }

    /// Get the wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gcp => "GCP",
            Self::OnPrem => "OnPrem",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a document.
///
/// Deletion is a status transition produced by an ordinary upsert, never a
/// physical erase; a later upsert can transition back to `Normal`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    Normal,
    Deleted,
}

impl DocumentStatus {
    /// Parse from the wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Normal" => Some(Self::Normal),
            "Deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Get the wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field name carrying the document status.
pub const DOCUMENT_STATUS_FIELD: &str = "document_status";

/// Composite identity key for a document.
///
/// At most one current document exists per key. Ordering follows the tuple
/// order, which gives the store a stable result ordering.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentKey {
    pub flowcell_barcode: String,
    pub lane: i32,
    pub library_name: String,
    /// Present from schema version v2 onward.
    pub location: Option<Location>,
}

impl DocumentKey {
    /// Identity fields as (name, value) pairs, in tuple order.
    pub fn identity_fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = vec![
            ("flowcell_barcode", Value::from(self.flowcell_barcode.as_str())),
            ("lane", Value::from(self.lane)),
            ("library_name", Value::from(self.library_name.as_str())),
        ];
        if let Some(location) = self.location {
            fields.push(("location", Value::from(location.as_str())));
        }
        fields
    }

    /// Stable string form, used as the backing index document id.
    pub fn doc_id(&self) -> String {
        match self.location {
            Some(location) => format!(
                "{}.{}.{}.{}",
                self.flowcell_barcode, self.lane, self.library_name, location
            ),
            None => format!(
                "{}.{}.{}",
                self.flowcell_barcode, self.lane, self.library_name
            ),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.doc_id())
    }
}

/// The current version of one catalog document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value, or `None` if the field is unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field value, replacing any prior value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// All set fields, ordered by name.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Current status. A document without a status field counts as `Normal`.
    pub fn status(&self) -> DocumentStatus {
        self.fields
            .get(DOCUMENT_STATUS_FIELD)
            .and_then(Value::as_str)
            .and_then(DocumentStatus::parse)
            .unwrap_or_default()
    }

    /// Conjunctive field-equality match. Every filter field must be set on
    /// the document with exactly the expected value; a filter over a field
    /// the document does not carry matches nothing.
    pub fn matches(&self, filter: &BTreeMap<String, Value>) -> bool {
        filter
            .iter()
            .all(|(name, expected)| self.fields.get(name) == Some(expected))
    }

    /// Merge a partial update into this document.
    ///
    /// Fields present in `partial` replace the stored value, including an
    /// explicit empty string; fields absent from `partial` are untouched.
    pub fn apply(&mut self, partial: &PartialDocument) {
        for (name, value) in partial.fields() {
            self.fields.insert(name.clone(), value.clone());
        }
    }
}

/// A partial field mapping as received in an upsert body.
///
/// Presence is the whole contract: a present field replaces, an absent field
/// leaves the stored value alone. There is no null spelling; clearing is an
/// explicit empty string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialDocument {
    fields: BTreeMap<String, Value>,
}

impl PartialDocument {
    /// Create an empty partial update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value, or `None` if the field is not part of the update.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Add a field to the update.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// All fields carried by the update, ordered by name.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn partial(value: Value) -> PartialDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn location_parse_is_exact() {
        assert_eq!(Location::parse("GCP").unwrap(), Location::Gcp);
        assert_eq!(Location::parse("OnPrem").unwrap(), Location::OnPrem);
        assert!(Location::parse("gcp").is_err());
        assert!(Location::parse("AWS").is_err());
    }

    #[test]
    fn status_defaults_to_normal() {
        let document = Document::new();
        assert_eq!(document.status(), DocumentStatus::Normal);

        let mut deleted = Document::new();
        deleted.set(DOCUMENT_STATUS_FIELD, json!("Deleted"));
        assert_eq!(deleted.status(), DocumentStatus::Deleted);
    }

    #[test]
    fn apply_keeps_absent_fields() {
        let mut document = Document::new();
        document.set("project", json!("p1"));
        document.set("notes", json!("keep me"));

        document.apply(&partial(json!({"project": "p2"})));

        assert_eq!(document.get("project"), Some(&json!("p2")));
        assert_eq!(document.get("notes"), Some(&json!("keep me")));
    }

    #[test]
    fn apply_clears_on_explicit_empty() {
        let mut document = Document::new();
        document.set("ubam_path", json!("gs://bucket/file.bam"));

        document.apply(&partial(json!({"ubam_path": ""})));

        assert_eq!(document.get("ubam_path"), Some(&json!("")));
    }

    #[test]
    fn matches_requires_every_filter_field() {
        let mut document = Document::new();
        document.set("project", json!("p1"));
        document.set("lane", json!(2));

        let filter: BTreeMap<String, Value> =
            serde_json::from_value(json!({"project": "p1", "lane": 2})).unwrap();
        assert!(document.matches(&filter));

        let mismatched: BTreeMap<String, Value> =
            serde_json::from_value(json!({"project": "p1", "lane": 3})).unwrap();
        assert!(!document.matches(&mismatched));

        let unknown: BTreeMap<String, Value> =
            serde_json::from_value(json!({"no_such_field": "x"})).unwrap();
        assert!(!document.matches(&unknown));
    }

    #[test]
    fn doc_id_includes_location_when_present() {
        let key = DocumentKey {
            flowcell_barcode: "fc1".to_string(),
            lane: 3,
            library_name: "lib".to_string(),
            location: None,
        };
        assert_eq!(key.doc_id(), "fc1.3.lib");

        let keyed = DocumentKey {
            location: Some(Location::Gcp),
            ..key
        };
        assert_eq!(keyed.doc_id(), "fc1.3.lib.GCP");
    }
}
