//! CLI module for Splatpal
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server (default)
//! - `check`: verify the configured document store is reachable

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Splatpal - API key registry backed by a document store
#[derive(Parser)]
#[command(name = "splatpal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Probe the document store and exit
    Check,
}

/// Load `.env`, then the layered configuration, then install logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
