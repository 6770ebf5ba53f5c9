//! State management and checkpointing
//!
//! The checkpoint structure is typed per collection rather than a
//! free-form nested map: every field carries a serde default, so reading
//! an absent path yields a default value instead of an error, and cursor
//! timestamps are always stored as RFC 3339 strings.

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{Bookmarks, ChatSubtype, ChatsBookmark, OffsetBookmark, State, WindowBookmark};
