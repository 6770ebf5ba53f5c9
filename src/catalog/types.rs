//! Catalog types

use crate::collections::CollectionDescriptor;
use crate::error::{Error, Result};
use crate::types::FieldInclusion;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Discovered catalog: every collection the account can replicate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog entries, in sync order
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Entry for a collection
    pub fn entry(&self, collection_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.stream == collection_id)
    }

    /// Ids of the selected collections
    pub fn selected_ids(&self) -> HashSet<String> {
        self.streams
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.stream.clone())
            .collect()
    }
}

/// One collection in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Collection id
    pub stream: String,

    /// JSON schema
    pub schema: serde_json::Value,

    /// Primary key fields
    pub key_properties: Vec<String>,

    /// Fields valid as incremental cursors
    #[serde(default)]
    pub valid_replication_keys: Vec<String>,

    /// "FULL_TABLE" or "INCREMENTAL"
    pub forced_replication_method: String,

    /// Whether this collection is replicated
    #[serde(default = "default_true")]
    pub selected: bool,

    /// Per-field metadata, keyed by property name
    #[serde(default)]
    pub fields: BTreeMap<String, FieldMetadata>,
}

fn default_true() -> bool {
    true
}

impl CatalogEntry {
    /// Build an entry from a descriptor and its schema
    pub fn from_descriptor(
        descriptor: &CollectionDescriptor,
        schema: serde_json::Value,
        properties: &[String],
    ) -> Self {
        let automatic: HashSet<&str> = descriptor
            .primary_key
            .iter()
            .chain(descriptor.cursor_fields)
            .copied()
            .collect();

        let fields = properties
            .iter()
            .map(|prop| {
                let inclusion = if automatic.contains(prop.as_str()) {
                    FieldInclusion::Automatic
                } else {
                    FieldInclusion::Available
                };
                (prop.clone(), FieldMetadata {
                    inclusion,
                    selected: true,
                })
            })
            .collect();

        Self {
            stream: descriptor.id.to_string(),
            schema,
            key_properties: descriptor.primary_key.iter().map(ToString::to_string).collect(),
            valid_replication_keys: descriptor
                .cursor_fields
                .iter()
                .map(ToString::to_string)
                .collect(),
            forced_replication_method: descriptor.replication_mode.as_str().to_string(),
            selected: true,
            fields,
        }
    }

    /// Fields that survive record projection: automatic fields always,
    /// available fields only when selected
    pub fn emitted_fields(&self) -> HashSet<String> {
        self.fields
            .iter()
            .filter(|(_, meta)| meta.inclusion == FieldInclusion::Automatic || meta.selected)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Metadata for one schema property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Automatic fields are always emitted
    pub inclusion: FieldInclusion,

    /// Selection for available fields
    #[serde(default = "default_true")]
    pub selected: bool,
}
