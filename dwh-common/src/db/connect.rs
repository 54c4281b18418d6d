//! Warehouse connection
//!
//! The warehouse speaks the Postgres wire protocol, so a single sqlx
//! `PgConnection` is all the loaders need. No pool: exactly one connection
//! is owned by the running step for its whole lifetime.

use crate::config::ClusterConfig;
use crate::Result;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::ConnectOptions;
use tracing::info;

/// Build connection options from the `[CLUSTER]` parameters
pub fn connect_options(cluster: &ClusterConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cluster.host)
        .port(cluster.db_port)
        .database(&cluster.db_name)
        .username(&cluster.db_user)
        .password(&cluster.db_password)
        .application_name("dwh-etl")
}

/// Open one connection to the warehouse
pub async fn connect(cluster: &ClusterConfig) -> Result<PgConnection> {
    info!(
        "Connecting to {}:{}/{} as {}",
        cluster.host, cluster.db_port, cluster.db_name, cluster.db_user
    );

    let conn = connect_options(cluster).connect().await?;

    info!("✓ Connected to warehouse");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster() -> ClusterConfig {
        ClusterConfig {
            host: "dwh.example.com".to_string(),
            db_name: "dwh".to_string(),
            db_user: "loader".to_string(),
            db_password: "secret".to_string(),
            db_port: 5439,
        }
    }

    #[test]
    fn test_connect_options_from_cluster() {
        let opts = connect_options(&cluster());
        assert_eq!(opts.get_host(), "dwh.example.com");
        assert_eq!(opts.get_port(), 5439);
        assert_eq!(opts.get_database(), Some("dwh"));
        assert_eq!(opts.get_username(), "loader");
    }

    #[tokio::test]
    async fn test_connect_unreachable_host_fails() {
        let mut unreachable = cluster();
        unreachable.host = "127.0.0.1".to_string();
        // Port 1 is reserved and never has a listener
        unreachable.db_port = 1;

        let result = connect(&unreachable).await;
        assert!(matches!(result, Err(crate::Error::Database(_))));
    }
}
