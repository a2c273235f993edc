//! Apply the schema and seed the subject catalogue, then exit.

use anyhow::{Context, Result};
use clap::Parser;

use studentctl_server::db::migrations;

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let db = args.db.connect().await?;
    migrations::run(db.pool())
        .await
        .context("Failed to run migrations")?;
    db.close().await;
    Ok(())
}
