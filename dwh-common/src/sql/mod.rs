//! SQL statement assembly
//!
//! Builds the four ordered statement lists the loaders execute. Pure string
//! work: nothing here touches the network or the database.

pub mod copy;
pub mod insert;
pub mod schema;

pub use copy::{CopyCommand, JsonFormat};
pub use schema::{ColumnDefinition, TableSchema};

use crate::config::DwhConfig;
use schema::{
    ArtistsTable, SongplaysTable, SongsTable, StagingEventsTable, StagingSongsTable, TimeTable,
    UsersTable,
};
use std::fmt;

/// What a statement does to its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Drop,
    Create,
    Copy,
    Insert,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatementKind::Drop => "DROP",
            StatementKind::Create => "CREATE",
            StatementKind::Copy => "COPY",
            StatementKind::Insert => "INSERT",
        };
        f.write_str(s)
    }
}

/// One ready-to-execute statement and the table it targets
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub table: &'static str,
    pub sql: String,
}

impl Statement {
    pub fn new(kind: StatementKind, table: &'static str, sql: impl Into<String>) -> Self {
        Self {
            kind,
            table,
            sql: sql.into(),
        }
    }

    fn create_for<T: TableSchema>() -> Self {
        Self::new(StatementKind::Create, T::table_name(), T::create_sql())
    }

    fn drop_for<T: TableSchema>() -> Self {
        Self::new(StatementKind::Drop, T::table_name(), T::drop_sql())
    }
}

/// The complete statement set for one configuration
#[derive(Debug, Clone)]
pub struct Queries {
    /// staging_events, staging_songs, songplays, users, songs, artists, time
    pub create: Vec<Statement>,
    /// Same table order as `create`
    pub drop: Vec<Statement>,
    /// staging_events, staging_songs
    pub copy: Vec<Statement>,
    /// songplays, users, songs, artists, time
    pub insert: Vec<Statement>,
}

impl Queries {
    /// Interpolate the configured locations and role into the templates
    pub fn from_config(config: &DwhConfig) -> Self {
        Self {
            create: vec![
                Statement::create_for::<StagingEventsTable>(),
                Statement::create_for::<StagingSongsTable>(),
                Statement::create_for::<SongplaysTable>(),
                Statement::create_for::<UsersTable>(),
                Statement::create_for::<SongsTable>(),
                Statement::create_for::<ArtistsTable>(),
                Statement::create_for::<TimeTable>(),
            ],
            drop: vec![
                Statement::drop_for::<StagingEventsTable>(),
                Statement::drop_for::<StagingSongsTable>(),
                Statement::drop_for::<SongplaysTable>(),
                Statement::drop_for::<UsersTable>(),
                Statement::drop_for::<SongsTable>(),
                Statement::drop_for::<ArtistsTable>(),
                Statement::drop_for::<TimeTable>(),
            ],
            copy: copy_statements(config),
            insert: insert_statements(),
        }
    }
}

fn copy_statements(config: &DwhConfig) -> Vec<Statement> {
    let events = CopyCommand {
        table: StagingEventsTable::table_name(),
        source: &config.s3.log_data,
        iam_role: &config.iam_role.arn,
        format: JsonFormat::JsonPaths(&config.s3.log_jsonpath),
        timeformat: Some(copy::EVENT_TIMEFORMAT),
    };
    let songs = CopyCommand {
        table: StagingSongsTable::table_name(),
        source: &config.s3.song_data,
        iam_role: &config.iam_role.arn,
        format: JsonFormat::Auto,
        timeformat: None,
    };

    vec![
        Statement::new(StatementKind::Copy, StagingEventsTable::table_name(), events.to_sql()),
        Statement::new(StatementKind::Copy, StagingSongsTable::table_name(), songs.to_sql()),
    ]
}

fn insert_statements() -> Vec<Statement> {
    [
        (SongplaysTable::table_name(), insert::SONGPLAY_TABLE_INSERT),
        (UsersTable::table_name(), insert::USER_TABLE_INSERT),
        (SongsTable::table_name(), insert::SONG_TABLE_INSERT),
        (ArtistsTable::table_name(), insert::ARTIST_TABLE_INSERT),
        (TimeTable::table_name(), insert::TIME_TABLE_INSERT),
    ]
    .into_iter()
    .map(|(table, sql)| Statement::new(StatementKind::Insert, table, sql))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_order() {
        let tables: Vec<&str> = insert_statements().iter().map(|s| s.table).collect();
        assert_eq!(tables, ["songplays", "users", "songs", "artists", "time"]);
    }

    #[test]
    fn test_inserts_read_only_from_staging() {
        for stmt in insert_statements() {
            let from_clauses: Vec<&str> = stmt
                .sql
                .split("FROM ")
                .skip(1)
                .filter_map(|rest| rest.split_whitespace().next())
                .collect();
            for source in from_clauses {
                // EXTRACT(... FROM ts) and the CTE are the only non-staging sources
                assert!(
                    source.starts_with("staging_") || source.starts_with("ts") || source == "temp_time",
                    "{} reads from {}",
                    stmt.table,
                    source
                );
            }
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(StatementKind::Copy.to_string(), "COPY");
        assert_eq!(StatementKind::Insert.to_string(), "INSERT");
    }
}
