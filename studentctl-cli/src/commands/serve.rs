//! HTTP server command
//!
//! Connects the pool, applies migrations, then serves `/api` until Ctrl+C or
//! SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use studentctl_server::db::migrations;
use studentctl_server::http::{run_server, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "STUDENTCTL_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Allow any origin without credentials instead of reflecting the caller's
    #[arg(long)]
    pub cors_permissive: bool,

    /// Start without running migrations
    #[arg(long)]
    pub skip_migrations: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting studentctl server on {}", args.bind);

    let db = args.db.connect().await?;

    if !args.skip_migrations {
        migrations::run(db.pool())
            .await
            .context("Failed to run migrations")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(db, config).await.context("Server error")?;

    Ok(())
}
