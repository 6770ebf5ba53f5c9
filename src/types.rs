//! Common types used throughout the connector
//!
//! Shared enums and type aliases used across multiple modules.

use serde::{Deserialize, Serialize};

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Replication Mode
// ============================================================================

/// How a collection is replicated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationMode {
    /// Full refresh - fetch all data every time
    #[default]
    FullTable,
    /// Incremental - only fetch new/updated data past the cursor
    Incremental,
}

impl ReplicationMode {
    /// Catalog metadata string for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTable => "FULL_TABLE",
            Self::Incremental => "INCREMENTAL",
        }
    }
}

// ============================================================================
// Pagination Kind
// ============================================================================

/// Pagination algorithm a collection uses
///
/// The sync engine dispatches on this tag; there is no per-collection
/// polymorphism beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationKind {
    /// Single request returns the whole collection
    #[default]
    None,
    /// Ascending id offset with a page limit (`since_id` + `limit`)
    IdOffset,
    /// Time-windowed search returning references, followed by bulk
    /// detail fetches, with an opaque next-page token
    WindowedSearch,
}

// ============================================================================
// Field Inclusion
// ============================================================================

/// Whether a field is always emitted or subject to selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldInclusion {
    /// Primary key or cursor field - always emitted
    Automatic,
    /// Optional field - emitted only when selected
    #[default]
    Available,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replication_mode_serde() {
        let mode: ReplicationMode = serde_json::from_str("\"INCREMENTAL\"").unwrap();
        assert_eq!(mode, ReplicationMode::Incremental);

        let json = serde_json::to_string(&ReplicationMode::FullTable).unwrap();
        assert_eq!(json, "\"FULL_TABLE\"");
    }

    #[test]
    fn test_pagination_kind_default() {
        assert_eq!(PaginationKind::default(), PaginationKind::None);
    }

    #[test]
    fn test_field_inclusion_serde() {
        let json = serde_json::to_string(&FieldInclusion::Automatic).unwrap();
        assert_eq!(json, "\"automatic\"");
    }
}
