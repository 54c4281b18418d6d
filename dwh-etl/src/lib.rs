//! dwh-etl library - warehouse load driver
//!
//! Runs the statement lists assembled by `dwh_common::sql` against one
//! warehouse connection, committing after every statement:
//!
//! `Disconnected → Connected → StagingLoaded → TablesPopulated → Disconnected`
//!
//! The first failing statement aborts the run. Statements committed before
//! it stay applied; there is no transaction around the whole run.

use dwh_common::db::{self, Warehouse};
use dwh_common::{DwhConfig, Error, Queries, Result, Statement};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

/// Where the pipeline stands in the load sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Disconnected,
    Connected,
    StagingLoaded,
    TablesPopulated,
}

/// Statements executed and rows affected by one phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseSummary {
    pub statements: usize,
    pub rows_affected: u64,
}

/// Outcome of a complete ETL run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub staging: PhaseSummary,
    pub inserts: PhaseSummary,
}

/// Sequential load driver owning one warehouse connection
pub struct Pipeline<W: Warehouse> {
    warehouse: W,
    state: LoadState,
}

impl<W: Warehouse> Pipeline<W> {
    /// Wrap an open connection
    pub fn new(warehouse: W) -> Self {
        info!("Pipeline state: {:?}", LoadState::Connected);
        Self {
            warehouse,
            state: LoadState::Connected,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Bulk-load the staging tables from S3
    pub async fn load_staging_tables(&mut self, copy: &[Statement]) -> Result<PhaseSummary> {
        self.expect_state(LoadState::Connected, "load staging tables")?;
        let summary = execute_all(&mut self.warehouse, copy).await?;
        self.transition(LoadState::StagingLoaded);
        Ok(summary)
    }

    /// Populate the fact and dimension tables from staging
    pub async fn insert_tables(&mut self, insert: &[Statement]) -> Result<PhaseSummary> {
        self.expect_state(LoadState::StagingLoaded, "insert tables")?;
        let summary = execute_all(&mut self.warehouse, insert).await?;
        self.transition(LoadState::TablesPopulated);
        Ok(summary)
    }

    /// Close the connection after a completed run
    pub async fn close(self) -> Result<()> {
        if self.state != LoadState::TablesPopulated {
            return Err(Error::State(format!(
                "cannot finish run from {:?}, expected {:?}",
                self.state,
                LoadState::TablesPopulated
            )));
        }
        self.warehouse.close().await?;
        info!("Pipeline state: {:?}", LoadState::Disconnected);
        Ok(())
    }

    fn expect_state(&self, expected: LoadState, step: &str) -> Result<()> {
        if self.state != expected {
            return Err(Error::State(format!(
                "cannot {} from {:?}, expected {:?}",
                step, self.state, expected
            )));
        }
        Ok(())
    }

    fn transition(&mut self, next: LoadState) {
        info!("Pipeline state: {:?} → {:?}", self.state, next);
        self.state = next;
    }
}

/// Execute statements in order, committing after each
///
/// Stops at the first failure; statements before it remain committed.
pub async fn execute_all<W: Warehouse>(
    warehouse: &mut W,
    statements: &[Statement],
) -> Result<PhaseSummary> {
    let mut summary = PhaseSummary::default();

    for stmt in statements {
        info!("{} {}", stmt.kind, stmt.table);
        let start = Instant::now();

        let rows = match warehouse.execute_committed(&stmt.sql).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("{} {} failed: {}", stmt.kind, stmt.table, e);
                return Err(e);
            }
        };

        info!(
            "✓ {} {} ({} rows, {:.2?})",
            stmt.kind,
            stmt.table,
            rows,
            start.elapsed()
        );
        summary.statements += 1;
        summary.rows_affected += rows;
    }

    Ok(summary)
}

/// Load staging tables, populate the star schema, then close
pub async fn run_etl<W: Warehouse>(warehouse: W, queries: &Queries) -> Result<RunSummary> {
    let mut pipeline = Pipeline::new(warehouse);

    let staging = pipeline.load_staging_tables(&queries.copy).await?;
    let inserts = pipeline.insert_tables(&queries.insert).await?;
    pipeline.close().await?;

    Ok(RunSummary { staging, inserts })
}

/// Drop every table, then recreate it empty
///
/// Runs before the first ETL run, or whenever the schema must be rebuilt.
pub async fn create_tables<W: Warehouse>(mut warehouse: W, queries: &Queries) -> Result<PhaseSummary> {
    let dropped = execute_all(&mut warehouse, &queries.drop).await?;
    let created = execute_all(&mut warehouse, &queries.create).await?;
    warehouse.close().await?;

    Ok(PhaseSummary {
        statements: dropped.statements + created.statements,
        rows_affected: dropped.rows_affected + created.rows_affected,
    })
}

/// Load the config, connect and run the ETL
///
/// Configuration is validated completely before any connection attempt.
pub async fn run_from_config(config_path: &Path) -> Result<RunSummary> {
    let (config, queries) = prepare(config_path)?;
    let conn = db::connect(&config.cluster).await?;
    run_etl(conn, &queries).await
}

/// Load the config, connect and rebuild the tables
pub async fn create_tables_from_config(config_path: &Path) -> Result<PhaseSummary> {
    let (config, queries) = prepare(config_path)?;
    let conn = db::connect(&config.cluster).await?;
    create_tables(conn, &queries).await
}

fn prepare(config_path: &Path) -> Result<(DwhConfig, Queries)> {
    info!("Config file: {}", config_path.display());
    let config = DwhConfig::load(config_path)?;
    let queries = Queries::from_config(&config);
    Ok((config, queries))
}
