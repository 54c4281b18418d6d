//! create-tables - (re)create the warehouse tables
//!
//! Drops the staging, fact and dimension tables if they exist and creates
//! them empty. Run once before the first dwh-etl run.

use anyhow::{Context, Result};
use clap::Parser;
use dwh_common::config::resolve_config_path;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "create-tables")]
#[command(about = "Drop and recreate the staging, fact and dimension tables")]
#[command(version)]
struct Args {
    /// Config file (falls back to $DWH_CONFIG, then dwh.cfg in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!(
        "Starting create-tables v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config_path = resolve_config_path(args.config.as_deref());

    let summary = dwh_etl::create_tables_from_config(&config_path)
        .await
        .with_context(|| format!("Table creation failed (config: {})", config_path.display()))?;

    info!("Tables ready ({} statements)", summary.statements);
    Ok(())
}
