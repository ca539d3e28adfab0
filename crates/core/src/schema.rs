//! Field schema registry.
//!
//! The registry is the fixed mapping of field name to semantic type for each
//! document kind and schema version. Schema evolves strictly by adding
//! fields; nothing is ever removed or retyped. The registry feeds write-time
//! validation and the JSON-Schema projection endpoint, and is read-only
//! after initialization.

use crate::document::{DocumentKey, DocumentStatus, PartialDocument, DOCUMENT_STATUS_FIELD};
use crate::error::{Error, Result};
use serde_json::{json, Map, Value};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Semantic type of a document field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Keyword,
    Integer,
    Boolean,
    Date,
    Long,
}

impl FieldType {
    /// Mapping type name used by the backing index.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Long => "long",
        }
    }

    /// JSON-Schema fragment describing values of this type.
    pub fn json_schema(&self) -> Value {
        match self {
            Self::Keyword => json!({"type": "string"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::Integer => json!({"type": "integer", "format": "int32"}),
            Self::Long => json!({"type": "integer", "format": "int64"}),
            Self::Date => json!({"type": "string", "format": "date-time"}),
        }
    }

    /// Validate one field value against this type.
    fn validate_value(&self, name: &str, value: &Value) -> Result<()> {
        let ok = match self {
            Self::Keyword => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Integer => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            Self::Long => value.as_i64().is_some(),
            Self::Date => value
                .as_str()
                .is_some_and(|s| OffsetDateTime::parse(s, &Rfc3339).is_ok()),
        };
        if ok {
            Ok(())
        } else {
            Err(Error::FieldValidation(format!(
                "field {name} expects a {} value",
                self.as_str()
            )))
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document kinds managed by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    ReadGroup,
}

impl DocumentKind {
    /// Parse from the URL path spelling.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "readgroup" => Ok(Self::ReadGroup),
            _ => Err(Error::UnknownKind(s.to_string())),
        }
    }

    /// URL path spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadGroup => "readgroup",
        }
    }

    /// Name of the backing index for this kind.
    pub fn index_name(&self) -> &'static str {
        match self {
            Self::ReadGroup => "read_group",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Schema versions. Each version is a strict superset of its predecessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SchemaVersion {
    V1,
    V2,
}

impl SchemaVersion {
    /// Parse from the URL path spelling.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            _ => Err(Error::UnknownVersion(s.to_string())),
        }
    }

    /// URL path spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    /// The most recent schema version.
    pub fn latest() -> Self {
        Self::V2
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-group fields defined by schema version v1.
const READ_GROUP_V1: &[(&str, FieldType)] = &[
    ("analysis_type", FieldType::Keyword),
    ("bait_intervals", FieldType::Keyword),
    ("data_type", FieldType::Keyword),
    ("flowcell_barcode", FieldType::Keyword),
    ("individual_alias", FieldType::Keyword),
    ("initiative", FieldType::Keyword),
    ("lane", FieldType::Integer),
    ("lc_set", FieldType::Keyword),
    ("library_name", FieldType::Keyword),
    ("library_type", FieldType::Keyword),
    ("machine_name", FieldType::Keyword),
    ("molecular_barcode_name", FieldType::Keyword),
    ("molecular_barcode_sequence", FieldType::Keyword),
    ("paired_run", FieldType::Boolean),
    ("product_family", FieldType::Keyword),
    ("product_name", FieldType::Keyword),
    ("product_order_id", FieldType::Keyword),
    ("product_part_number", FieldType::Keyword),
    ("project", FieldType::Keyword),
    ("read_structure", FieldType::Keyword),
    ("research_project_id", FieldType::Keyword),
    ("research_project_name", FieldType::Keyword),
    ("root_sample_id", FieldType::Keyword),
    ("run_date", FieldType::Date),
    ("run_name", FieldType::Keyword),
    ("sample_alias", FieldType::Keyword),
    ("sample_gender", FieldType::Keyword),
    ("sample_id", FieldType::Keyword),
    ("sample_lsid", FieldType::Keyword),
    ("sample_type", FieldType::Keyword),
    ("target_intervals", FieldType::Keyword),
    ("ubam_md5", FieldType::Keyword),
    ("ubam_path", FieldType::Keyword),
    ("ubam_size", FieldType::Long),
];

/// Fields added to read groups by schema version v2.
const READ_GROUP_V2_ADDED: &[(&str, FieldType)] = &[
    (DOCUMENT_STATUS_FIELD, FieldType::Keyword),
    ("location", FieldType::Keyword),
    ("notes", FieldType::Keyword),
];

/// The field set of one (kind, version) pair.
#[derive(Clone, Copy, Debug)]
pub struct FieldSchema {
    kind: DocumentKind,
    version: SchemaVersion,
}

impl FieldSchema {
    pub fn new(kind: DocumentKind, version: SchemaVersion) -> Self {
        Self { kind, version }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// All (field name, type) pairs defined for this schema.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FieldType)> {
        let added: &[(&str, FieldType)] = match (self.kind, self.version) {
            (DocumentKind::ReadGroup, SchemaVersion::V1) => &[],
            (DocumentKind::ReadGroup, SchemaVersion::V2) => READ_GROUP_V2_ADDED,
        };
        READ_GROUP_V1.iter().chain(added).copied()
    }

    /// Type of one field, or `None` if the field is not in this schema.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields()
            .find(|(field, _)| *field == name)
            .map(|(_, ty)| ty)
    }

    /// Whether this schema defines the named field.
    pub fn has_field(&self, name: &str) -> bool {
        self.field_type(name).is_some()
    }

    /// Identity fields, mandatory in every document of this schema.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self.version {
            SchemaVersion::V1 => &["flowcell_barcode", "lane", "library_name"],
            SchemaVersion::V2 => &["flowcell_barcode", "lane", "library_name", "location"],
        }
    }

    /// JSON-Schema projection of this schema.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (name, ty) in self.fields() {
            properties.insert(name.to_string(), ty.json_schema());
        }
        json!({
            "type": "object",
            "required": self.required_fields(),
            "properties": properties,
        })
    }

    /// Validate an identity key against this schema version.
    pub fn validate_key(&self, key: &DocumentKey) -> Result<()> {
        if key.lane < 0 {
            return Err(Error::FieldValidation(format!(
                "lane must not be negative, got {}",
                key.lane
            )));
        }
        match (self.version, key.location) {
            (SchemaVersion::V1, Some(_)) => Err(Error::FieldValidation(
                "location is not part of schema version v1".to_string(),
            )),
            (SchemaVersion::V2, None) => Err(Error::FieldValidation(
                "missing mandatory identity field: location".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Write-time validation of a partial update against this schema.
    pub fn validate(&self, partial: &PartialDocument) -> Result<()> {
        for (name, value) in partial.fields() {
            let ty = self
                .field_type(name)
                .ok_or_else(|| Error::FieldValidation(format!("unknown field: {name}")))?;
            ty.validate_value(name, value)?;
            if name == DOCUMENT_STATUS_FIELD {
                let valid = value
                    .as_str()
                    .is_some_and(|s| DocumentStatus::parse(s).is_some());
                if !valid {
                    return Err(Error::FieldValidation(format!(
                        "{DOCUMENT_STATUS_FIELD} must be Normal or Deleted"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Identity fields repeated in an upsert body must equal the addressed
    /// key; the body cannot rename a document.
    pub fn validate_identity(&self, key: &DocumentKey, partial: &PartialDocument) -> Result<()> {
        for (name, expected) in key.identity_fields() {
            if let Some(supplied) = partial.get(name) {
                if *supplied != expected {
                    return Err(Error::FieldValidation(format!(
                        "{name} does not match the addressed document"
                    )));
                }
            }
        }
        Ok(())
    }
}
