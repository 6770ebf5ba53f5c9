//! Message types and JSONL sinks

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;

/// A message emitted during discovery or sync
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Message {
    /// Schema for a collection, emitted once before its first record page
    Schema {
        /// Collection id
        stream: String,
        /// JSON schema
        schema: Value,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Cursor fields, empty for full-table collections
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// One record
    Record {
        /// Collection id
        stream: String,
        /// The record body
        record: Value,
    },
    /// Checkpoint snapshot
    State {
        /// The full checkpoint tree
        value: Value,
    },
}

impl Message {
    /// Create a schema message
    pub fn schema(
        stream: impl Into<String>,
        schema: Value,
        key_properties: Vec<String>,
        bookmark_properties: Vec<String>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties,
            bookmark_properties,
        }
    }

    /// Create a record message
    pub fn record(stream: impl Into<String>, record: Value) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
        }
    }

    /// Create a state message
    pub fn state(value: Value) -> Self {
        Self::State { value }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }
}

/// Destination for emitted messages
pub trait MessageSink {
    /// Emit one message
    fn emit(&mut self, message: &Message) -> Result<()>;
}

/// Sink writing one JSON document per line
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl JsonlSink<std::io::Stdout> {
    /// Sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: std::io::stdout(),
        }
    }
}

impl<W: Write> JsonlSink<W> {
    /// Sink writing to an arbitrary writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for JsonlSink<W> {
    fn emit(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink collecting messages in memory, for tests
#[derive(Debug, Default)]
pub struct CaptureSink {
    /// Everything emitted so far, in order
    pub messages: Vec<Message>,
}

impl CaptureSink {
    /// Create an empty capture sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records emitted for a collection, in order
    pub fn records_for(&self, stream: &str) -> Vec<&Value> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record { stream: s, record } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Schema messages emitted for a collection
    pub fn schemas_for(&self, stream: &str) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| matches!(m, Message::Schema { stream: s, .. } if s == stream))
            .collect()
    }
}

impl MessageSink for CaptureSink {
    fn emit(&mut self, message: &Message) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }
}
