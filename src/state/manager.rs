//! State manager implementation
//!
//! File-based state persistence with atomic writes. The manager owns the
//! in-memory state exclusively; the engine borrows it mutably and calls
//! [`StateManager::flush`] after every page and after every collection.

use super::types::{ChatSubtype, State};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// State manager for persisting and loading checkpoint state
#[derive(Debug)]
pub struct StateManager {
    /// Path to the state file; empty for in-memory mode
    path: PathBuf,
    /// Current state
    state: State,
}

impl StateManager {
    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: State::new(),
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                Error::state(format!("Failed to read state file: {e}"))
            })?;
            serde_json::from_str(&contents)
                .map_err(|e| Error::state(format!("Failed to parse state file: {e}")))?
        } else {
            State::new()
        };

        Ok(Self { path, state })
    }

    /// Create a state manager from inline JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let state: State = serde_json::from_str(json)
            .map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))?;
        Ok(Self {
            path: PathBuf::new(),
            state,
        })
    }

    /// Current state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Mutable access to the current state
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Persist the current state
    ///
    /// Writes to a temp file then renames, so a crash mid-write never
    /// leaves a truncated state file behind.
    pub fn flush(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(()); // In-memory mode
        }

        let contents = serde_json::to_string_pretty(&self.state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, &contents)
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        Ok(())
    }

    /// Return the cursor lower bound for a chat subtype, seeding it from
    /// the configured start date on first run
    ///
    /// The seed is persisted immediately so every collection has a
    /// deterministic lower bound even if the run dies right after.
    pub fn chat_start_bound(&mut self, subtype: ChatSubtype, start_date: &str) -> Result<String> {
        let window = self.state.bookmarks.chats.window_mut(subtype);
        match &window.cursor {
            Some(cursor) => Ok(cursor.clone()),
            None => {
                window.cursor = Some(start_date.to_string());
                self.flush()?;
                Ok(start_date.to_string())
            }
        }
    }

    /// Export state as JSON
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.state)?)
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}
