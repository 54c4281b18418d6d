//! dwh-etl - load S3 data into the warehouse star schema
//!
//! Bulk-loads the raw event log and song catalog into the staging tables,
//! then fills the songplays fact table and the users, songs, artists and
//! time dimensions from staging. One connection, one statement at a time,
//! commit after each.

use anyhow::{Context, Result};
use clap::Parser;
use dwh_common::config::resolve_config_path;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for dwh-etl
#[derive(Parser, Debug)]
#[command(name = "dwh-etl")]
#[command(about = "Load staging tables from S3 and populate the star schema")]
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
        "Starting dwh-etl v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config_path = resolve_config_path(args.config.as_deref());

    let summary = dwh_etl::run_from_config(&config_path)
        .await
        .with_context(|| format!("ETL run failed (config: {})", config_path.display()))?;

    info!(
        "ETL complete: {} staging loads ({} rows), {} inserts ({} rows)",
        summary.staging.statements,
        summary.staging.rows_affected,
        summary.inserts.statements,
        summary.inserts.rows_affected
    );
    Ok(())
}
