//! Connector configuration
//!
//! Loaded from a JSON file at process start. `access_token` and
//! `start_date` are required; everything else has a serde default.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default page limit for id-offset collections
fn default_page_limit() -> u32 {
    100
}

/// Default search window width in days
fn default_search_interval_days() -> i64 {
    14
}

fn default_user_agent() -> String {
    format!("zendesk-chat-source/{}", env!("CARGO_PKG_VERSION"))
}

fn default_requests_per_second() -> u32 {
    10
}

/// Complete connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Bearer token for the Zendesk Chat API
    pub access_token: String,

    /// Lower bound for the first incremental pull (ISO-8601)
    pub start_date: String,

    /// Page limit for the agents collection
    #[serde(default = "default_page_limit")]
    pub agents_page_limit: u32,

    /// Page limit for the bans collection
    #[serde(default = "default_page_limit")]
    pub bans_page_limit: u32,

    /// Width of each chat search window in days
    ///
    /// The upstream search endpoint has a hard page-count ceiling, so a
    /// narrow window is a correctness safeguard, not an optimization.
    #[serde(default = "default_search_interval_days")]
    pub chat_search_interval_days: i64,

    /// Run a full resync of chats every N days; absent disables it
    #[serde(default)]
    pub chats_full_sync_days: Option<i64>,

    /// User agent for API requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Client-side request rate limit
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl ConnectorConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        for field in ["access_token", "start_date"] {
            if value.get(field).and_then(|v| v.as_str()).is_none() {
                return Err(Error::missing_field(field));
            }
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values beyond presence
    fn validate(&self) -> Result<()> {
        self.parsed_start_date()?;
        if self.chat_search_interval_days <= 0 {
            return Err(Error::config(
                "chat_search_interval_days must be a positive number of days",
            ));
        }
        if let Some(days) = self.chats_full_sync_days {
            if days <= 0 {
                return Err(Error::config(
                    "chats_full_sync_days must be a positive number of days",
                ));
            }
        }
        Ok(())
    }

    /// The configured start date as a UTC timestamp
    pub fn parsed_start_date(&self) -> Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(&self.start_date)?.with_timezone(&Utc))
    }

    /// Page limit for an id-offset collection
    pub fn page_limit(&self, collection_id: &str) -> u32 {
        match collection_id {
            "agents" => self.agents_page_limit,
            "bans" => self.bans_page_limit,
            _ => default_page_limit(),
        }
    }
}
