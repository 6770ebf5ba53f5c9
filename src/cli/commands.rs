//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Zendesk Chat source connector CLI
#[derive(Parser, Debug)]
#[command(name = "zendesk-chat-source")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON); created on first sync if absent
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON (not persisted)
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Catalog file (JSON); defaults to a fresh discovery
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test connection to the API
    Check,

    /// Discover available collections and print the catalog
    Discover,

    /// Replicate collections as JSON lines on stdout
    Sync {
        /// Collections to sync (comma-separated, empty = all selected)
        #[arg(long)]
        streams: Option<String>,
    },
}
