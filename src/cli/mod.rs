//! CLI module
//!
//! Command-line interface for the connector.
//!
//! # Commands
//!
//! - `check` - Test connection to the API
//! - `discover` - List available collections as a catalog
//! - `sync` - Replicate collections as JSON lines on stdout

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
