//! CLI runner - executes commands

use crate::catalog::{self, Catalog};
use crate::cli::commands::{Cli, Commands};
use crate::config::ConnectorConfig;
use crate::engine::SyncEngine;
use crate::error::{Error, Result};
use crate::http::{ApiClient, ApiRequest};
use crate::output::JsonlSink;
use crate::state::StateManager;
use serde_json::json;
use std::collections::HashSet;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Discover => self.discover().await,
            Commands::Sync { streams } => self.sync(streams.as_deref()).await,
        }
    }

    /// Load connector configuration
    fn load_config(&self) -> Result<ConnectorConfig> {
        if let Some(json) = &self.cli.config_json {
            return ConnectorConfig::from_json(json);
        }
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config not specified (use --config or --config-json)"))?;
        ConnectorConfig::from_file(path)
    }

    /// Load persisted state, or start empty
    fn load_state(&self) -> Result<StateManager> {
        if let Some(json) = &self.cli.state_json {
            return StateManager::from_json(json);
        }
        match &self.cli.state {
            Some(path) => StateManager::from_file(path),
            None => Ok(StateManager::in_memory()),
        }
    }

    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = ApiClient::new(&config)?;
        client.request("chats", ApiRequest::new()).await?;
        println!("{}", json!({"status": "ok"}));
        Ok(())
    }

    async fn discover(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = ApiClient::new(&config)?;
        let catalog = catalog::discover(&client).await?;
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        Ok(())
    }

    async fn sync(&self, streams: Option<&str>) -> Result<()> {
        let config = self.load_config()?;
        let client = ApiClient::new(&config)?;

        let mut catalog = match &self.cli.catalog {
            Some(path) => Catalog::from_file(path)?,
            None => catalog::discover(&client).await?,
        };
        if let Some(filter) = streams {
            let wanted: HashSet<&str> = filter.split(',').map(str::trim).collect();
            for id in &wanted {
                if catalog.entry(id).is_none() {
                    return Err(Error::CollectionNotFound {
                        collection: (*id).to_string(),
                    });
                }
            }
            for entry in &mut catalog.streams {
                entry.selected = wanted.contains(entry.stream.as_str());
            }
        }

        let mut state = self.load_state()?;
        let mut sink = JsonlSink::stdout();
        let stats = SyncEngine::new(&client, &config, &catalog, &mut state, &mut sink)
            .run()
            .await?;
        info!(
            "synced {} records over {} pages ({} collections, {} skipped)",
            stats.records_synced,
            stats.pages_fetched,
            stats.collections_synced,
            stats.collections_skipped
        );
        Ok(())
    }
}
