//! Statement execution seam
//!
//! The load steps only need two operations from the warehouse: run one
//! statement and commit it, then eventually close. Keeping that behind a
//! trait lets the pipeline run against a recording fake in tests.

use crate::Result;
use async_trait::async_trait;
use sqlx::{Connection, Executor, PgConnection};

/// A connection statements can be executed on
#[async_trait]
pub trait Warehouse: Send + Sized {
    /// Execute one statement in its own transaction and commit it
    ///
    /// Returns the number of rows affected. On error nothing of this
    /// statement is committed; earlier commits stay applied.
    async fn execute_committed(&mut self, sql: &str) -> Result<u64>;

    /// Close the connection
    async fn close(self) -> Result<()>;
}

#[async_trait]
impl Warehouse for PgConnection {
    async fn execute_committed(&mut self, sql: &str) -> Result<u64> {
        let mut tx = self.begin().await?;
        // Simple-query protocol: DDL and COPY are sent as plain text
        let done = (&mut *tx).execute(sqlx::raw_sql(sql)).await?;
        tx.commit().await?;
        Ok(done.rows_affected())
    }

    async fn close(self) -> Result<()> {
        Connection::close(self).await?;
        Ok(())
    }
}
