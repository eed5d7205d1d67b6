//! CLI command definitions and dispatch.

pub mod config;
pub mod feed;
pub mod migrate;
pub mod sync;
pub mod token;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use feedhub_core::config::AppConfig;
use feedhub_core::error::AppError;
use feedhub_database::DatabasePool;

/// FeedHub: supplier feed ingestion, mapping and export
#[derive(Debug, Parser)]
#[command(name = "feedhub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration directory
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "FEEDHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run pending database migrations
    Migrate(migrate::MigrateArgs),
    /// List the field names found in a local feed file
    Sniff(feed::SniffArgs),
    /// Parse a local feed file and show the first items
    Preview(feed::PreviewArgs),
    /// Mint a development access token
    Token(token::TokenArgs),
    /// Sync suppliers now
    Sync(sync::SyncArgs),
    /// Show the effective configuration
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.load_config()?).await,
            Commands::Sniff(args) => feed::sniff(args, &self.load_config()?, self.format),
            Commands::Preview(args) => feed::preview(args, self.format),
            Commands::Token(args) => token::execute(args, &self.load_config()?),
            Commands::Sync(args) => sync::execute(args, &self.load_config()?, self.format).await,
            Commands::Config(args) => config::execute(args, &self.load_config()?),
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}

/// Helper: connect to the configured database
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
