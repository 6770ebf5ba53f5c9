//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs. The
//! wire format is a `bookmarks` tree keyed by collection id plus the
//! process-wide `currently_syncing` marker.

use serde::{Deserialize, Serialize};

/// The two record subtypes multiplexed by the chats collection
///
/// Each subtype has its own cursor field and its own resumable
/// next-page link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSubtype {
    /// Completed chats, bounded by `end_timestamp`
    Chat,
    /// Offline messages, bounded by `timestamp`
    OfflineMsg,
}

impl ChatSubtype {
    /// Both subtypes, in pull order
    pub const ALL: [ChatSubtype; 2] = [ChatSubtype::Chat, ChatSubtype::OfflineMsg];

    /// The `type:` value used in windowed search queries
    pub fn search_type(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::OfflineMsg => "offline_msg",
        }
    }

    /// The record field tracked as this subtype's cursor
    pub fn cursor_field(&self) -> &'static str {
        match self {
            Self::Chat => "end_timestamp",
            Self::OfflineMsg => "timestamp",
        }
    }
}

impl std::fmt::Display for ChatSubtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.search_type())
    }
}

/// Complete persisted state for the connector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Per-collection progress markers
    #[serde(default)]
    pub bookmarks: Bookmarks,

    /// Collection presently being replicated; cleared only when a whole
    /// run completes, so a crash leaves it pointing at the resume target
    #[serde(default)]
    pub currently_syncing: Option<String>,

    /// When the last full (non-incremental) resync of chats completed
    /// (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chats_last_full_sync: Option<String>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-collection bookmarks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bookmarks {
    /// Id-offset bookmark for agents
    #[serde(default)]
    pub agents: OffsetBookmark,

    /// Id-offset bookmark for bans
    #[serde(default)]
    pub bans: OffsetBookmark,

    /// Compound windowed-search bookmark for chats
    #[serde(default)]
    pub chats: ChatsBookmark,
}

impl Bookmarks {
    /// Id-offset bookmark for a collection, if it has one
    pub fn offset(&self, collection_id: &str) -> Option<&OffsetBookmark> {
        match collection_id {
            "agents" => Some(&self.agents),
            "bans" => Some(&self.bans),
            _ => None,
        }
    }

    /// Mutable id-offset bookmark for a collection
    pub fn offset_mut(&mut self, collection_id: &str) -> Option<&mut OffsetBookmark> {
        match collection_id {
            "agents" => Some(&mut self.agents),
            "bans" => Some(&mut self.bans),
            _ => None,
        }
    }
}

/// Bookmark for id-offset pagination
///
/// `since_id` is present only while a pass is in flight; it resets to
/// null when the collection is fully drained because these collections
/// have no ordering guarantee across runs, only pagination-exhaustion
/// semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OffsetBookmark {
    #[serde(default)]
    pub since_id: Option<u64>,
}

/// Bookmark for the chats collection, one window per subtype
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatsBookmark {
    /// Window for the "chat" subtype (cursor field `end_timestamp`)
    #[serde(default)]
    pub chat: WindowBookmark,

    /// Window for the "offline_msg" subtype (cursor field `timestamp`)
    #[serde(default)]
    pub offline_msg: WindowBookmark,
}

impl ChatsBookmark {
    /// Window bookmark for a subtype
    pub fn window(&self, subtype: ChatSubtype) -> &WindowBookmark {
        match subtype {
            ChatSubtype::Chat => &self.chat,
            ChatSubtype::OfflineMsg => &self.offline_msg,
        }
    }

    /// Mutable window bookmark for a subtype
    pub fn window_mut(&mut self, subtype: ChatSubtype) -> &mut WindowBookmark {
        match subtype {
            ChatSubtype::Chat => &mut self.chat,
            ChatSubtype::OfflineMsg => &mut self.offline_msg,
        }
    }
}

/// Per-subtype windowed-search progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowBookmark {
    /// Maximum cursor value observed across fully drained intervals
    /// (RFC 3339)
    #[serde(default)]
    pub cursor: Option<String>,

    /// Opaque next-page link for exact mid-interval resume
    #[serde(default)]
    pub next_url: Option<String>,
}

impl WindowBookmark {
    /// Clear both the cursor and the next-page link (forced full resync)
    pub fn clear(&mut self) {
        self.cursor = None;
        self.next_url = None;
    }
}
