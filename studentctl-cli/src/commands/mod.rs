//! Subcommand implementations

pub mod migrate;
pub mod serve;

pub use migrate::{run_migrate, MigrateArgs};
pub use serve::{run_serve, ServeArgs};

use anyhow::{Context, Result};
use clap::Args;
use studentctl_server::db::{Database, PoolConfig, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS};

/// Connection options shared by every command that touches the database
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Upper bound on pooled connections
    #[arg(long, env = "STUDENTCTL_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Connections kept open while idle
    #[arg(long, env = "STUDENTCTL_MIN_CONNECTIONS", default_value_t = DEFAULT_MIN_CONNECTIONS)]
    pub min_connections: u32,
}

impl DatabaseArgs {
    pub fn pool_config(&self) -> Result<PoolConfig> {
        let database_url = self
            .database_url
            .clone()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        Ok(PoolConfig {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            ..PoolConfig::new(database_url)
        })
    }

    pub async fn connect(&self) -> Result<Database> {
        Database::connect(&self.pool_config()?)
            .await
            .context("Failed to create database pool")
    }
}
