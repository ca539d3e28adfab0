//! Core domain types and shared logic for the Carrel metadata catalog.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Field schema registry and its JSON-Schema projection
//! - Document identity keys, status, and field maps
//! - Merge semantics for partial updates
//! - Claim sets and the authorization policy
//! - Configuration types

pub mod claims;
pub mod config;
pub mod document;
pub mod error;
pub mod schema;

pub use claims::ClaimSet;
pub use document::{Document, DocumentKey, DocumentStatus, Location, PartialDocument};
pub use error::{Error, Result};
pub use schema::{DocumentKind, FieldSchema, FieldType, SchemaVersion};
