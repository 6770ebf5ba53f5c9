//! Built-in collection table
//!
//! The Zendesk Chat API exposes a fixed set of collections. Their
//! declaration order here is load-bearing: the sync engine walks this
//! order, and an interrupted run resumes from the position recorded in
//! `currently_syncing`. Reordering invalidates in-flight resume markers.

use crate::types::{PaginationKind, ReplicationMode};

/// Immutable descriptor for one upstream collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionDescriptor {
    /// Unique collection id, doubles as the API path segment
    pub id: &'static str,
    /// Primary key fields, in order
    pub primary_key: &'static [&'static str],
    /// Full-table or incremental replication
    pub replication_mode: ReplicationMode,
    /// Valid cursor fields (empty for full-table collections)
    pub cursor_fields: &'static [&'static str],
    /// Which pagination algorithm the engine runs for this collection
    pub pagination_kind: PaginationKind,
    /// A 403 from this endpoint is expected for some account tiers and
    /// must not abort the run
    pub skip_on_forbidden: bool,
}

/// All collections in sync order
pub const COLLECTIONS: &[CollectionDescriptor] = &[
    CollectionDescriptor {
        id: "account",
        primary_key: &["account_key"],
        replication_mode: ReplicationMode::FullTable,
        cursor_fields: &[],
        pagination_kind: PaginationKind::None,
        skip_on_forbidden: true,
    },
    CollectionDescriptor {
        id: "agents",
        primary_key: &["id"],
        replication_mode: ReplicationMode::FullTable,
        cursor_fields: &[],
        pagination_kind: PaginationKind::IdOffset,
        skip_on_forbidden: false,
    },
    CollectionDescriptor {
        id: "bans",
        primary_key: &["id"],
        replication_mode: ReplicationMode::FullTable,
        cursor_fields: &[],
        pagination_kind: PaginationKind::IdOffset,
        skip_on_forbidden: false,
    },
    CollectionDescriptor {
        id: "chats",
        primary_key: &["id"],
        replication_mode: ReplicationMode::Incremental,
        cursor_fields: &["timestamp", "end_timestamp"],
        pagination_kind: PaginationKind::WindowedSearch,
        skip_on_forbidden: false,
    },
    CollectionDescriptor {
        id: "departments",
        primary_key: &["id"],
        replication_mode: ReplicationMode::FullTable,
        cursor_fields: &[],
        pagination_kind: PaginationKind::None,
        skip_on_forbidden: false,
    },
    CollectionDescriptor {
        id: "goals",
        primary_key: &["id"],
        replication_mode: ReplicationMode::FullTable,
        cursor_fields: &[],
        pagination_kind: PaginationKind::None,
        skip_on_forbidden: false,
    },
    CollectionDescriptor {
        id: "shortcuts",
        primary_key: &["name"],
        replication_mode: ReplicationMode::FullTable,
        cursor_fields: &[],
        pagination_kind: PaginationKind::None,
        skip_on_forbidden: false,
    },
    CollectionDescriptor {
        id: "triggers",
        primary_key: &["id"],
        replication_mode: ReplicationMode::FullTable,
        cursor_fields: &[],
        pagination_kind: PaginationKind::None,
        skip_on_forbidden: false,
    },
];

/// Look up a collection descriptor by id
pub fn find(id: &str) -> Option<&'static CollectionDescriptor> {
    COLLECTIONS.iter().find(|c| c.id == id)
}

/// Position of a collection in the sync order
pub fn position(id: &str) -> Option<usize> {
    COLLECTIONS.iter().position(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<_> = COLLECTIONS.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), COLLECTIONS.len());
    }

    #[test]
    fn test_sync_order_is_stable() {
        // Resume markers persist across runs, so the order is a contract.
        let ids: Vec<_> = COLLECTIONS.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![
                "account",
                "agents",
                "bans",
                "chats",
                "departments",
                "goals",
                "shortcuts",
                "triggers"
            ]
        );
    }

    #[test]
    fn test_incremental_collections_have_cursor_fields() {
        for c in COLLECTIONS {
            match c.replication_mode {
                ReplicationMode::Incremental => assert!(!c.cursor_fields.is_empty()),
                ReplicationMode::FullTable => assert!(c.cursor_fields.is_empty()),
            }
            assert!(!c.primary_key.is_empty());
        }
    }

    #[test]
    fn test_find_and_position() {
        assert_eq!(find("chats").unwrap().id, "chats");
        assert_eq!(position("chats"), Some(3));
        assert!(find("nope").is_none());
        assert!(position("nope").is_none());
    }

    #[test]
    fn test_only_account_tolerates_forbidden() {
        for c in COLLECTIONS {
            assert_eq!(c.skip_on_forbidden, c.id == "account");
        }
    }
}
