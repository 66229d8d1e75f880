#![allow(clippy::const_is_empty)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate (for main.rs and tests/)
pub use config::{COINGECKO, PERSISTENCE, WATCHLIST};
pub use data::{MarketDataProvider, MarketError};
pub use domain::Asset;
pub use engine::{Command, WatchController, WatchSetup};

// CLI argument parsing
use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Crypto watchlist with live price polling", long_about = None)]
pub struct Cli {
    /// Market API key (sent as the pro API key header)
    #[arg(long, env = COINGECKO.api_key_env, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Market API base URL
    #[arg(long, default_value = COINGECKO.base_url)]
    pub base_url: String,

    /// SQLite file for favorites and cached responses
    #[arg(long, default_value = PERSISTENCE.store.db_path)]
    pub db: String,

    /// Use the built-in sample dataset instead of the API
    #[arg(long, default_value_t = false)]
    pub sample: bool,

    /// Debug-level logging for this crate
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print the top assets by market cap
    Assets {
        /// Case-insensitive filter on name, symbol or id
        #[arg(long)]
        search: Option<String>,
        /// How many assets to fetch
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show details for one asset
    Info { id: String },
    /// Manage the favorites list
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Interactive live watch of the favorites (default)
    Watch,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
    /// Swap `old` for `new`
    Replace { old: String, new: String },
    Clear,
}
