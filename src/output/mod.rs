//! Record and schema emission
//!
//! The engine hands pages of records to a [`MessageSink`]; the default
//! sink serializes schema-tagged messages as JSON lines on stdout so a
//! downstream loader can consume the stream.

mod writer;

pub use writer::{CaptureSink, JsonlSink, Message, MessageSink};

use crate::types::JsonValue;
use std::collections::HashSet;

/// Drop non-selected fields from a record before emission
///
/// Automatic fields (primary key, cursor) are part of `allowed` by
/// construction; anything not in the set is removed. Non-object records
/// pass through untouched.
pub fn project_record(mut record: JsonValue, allowed: &HashSet<String>) -> JsonValue {
    if let Some(map) = record.as_object_mut() {
        map.retain(|key, _| allowed.contains(key));
    }
    record
}
