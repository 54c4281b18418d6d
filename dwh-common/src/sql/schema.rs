//! Table Schema Definitions
//!
//! Single source of truth for the warehouse tables. Each struct describes one
//! table; the CREATE and DROP statements are rendered from it.
//!
//! # Usage
//!
//! ```rust,ignore
//! pub struct UsersTable;
//!
//! impl TableSchema for UsersTable {
//!     fn table_name() -> &'static str { "users" }
//!
//!     fn columns() -> Vec<ColumnDefinition> {
//!         vec![
//!             ColumnDefinition::new("user_id", "VARCHAR(MAX)").primary_key().not_null(),
//!             ColumnDefinition::new("first_name", "VARCHAR(MAX)"),
//!         ]
//!     }
//! }
//!
//! let ddl = UsersTable::create_sql();
//! ```

/// Column definition with warehouse column attributes
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,
    /// SQL type (e.g., "INT", "VARCHAR(MAX)", "TIMESTAMP")
    pub sql_type: String,
    /// IDENTITY(seed, step) generated column
    pub identity: Option<(i64, i64)>,
    /// DISTKEY column attribute
    pub distkey: bool,
    /// SORTKEY column attribute
    pub sortkey: bool,
    /// NOT NULL constraint
    pub not_null: bool,
    /// PRIMARY KEY constraint (informational in the warehouse)
    pub primary_key: bool,
}

impl ColumnDefinition {
    /// Create new column definition
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            identity: None,
            distkey: false,
            sortkey: false,
            not_null: false,
            primary_key: false,
        }
    }

    /// Generate values with IDENTITY(seed, step)
    pub fn identity(mut self, seed: i64, step: i64) -> Self {
        self.identity = Some((seed, step));
        self
    }

    /// Mark column as the distribution key
    pub fn distkey(mut self) -> Self {
        self.distkey = true;
        self
    }

    /// Mark column as the sort key
    pub fn sortkey(mut self) -> Self {
        self.sortkey = true;
        self
    }

    /// Mark column as NOT NULL
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Mark column as PRIMARY KEY
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Render the column as it appears inside CREATE TABLE
    ///
    /// Attribute order follows the warehouse grammar: type, IDENTITY,
    /// DISTKEY, SORTKEY, then constraints.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);
        if let Some((seed, step)) = self.identity {
            sql.push_str(&format!(" IDENTITY({}, {})", seed, step));
        }
        if self.distkey {
            sql.push_str(" DISTKEY");
        }
        if self.sortkey {
            sql.push_str(" SORTKEY");
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        sql
    }
}

/// Defines the schema of one warehouse table
pub trait TableSchema {
    /// Table name in the warehouse
    fn table_name() -> &'static str;

    /// Column definitions, in table order
    fn columns() -> Vec<ColumnDefinition>;

    /// `CREATE TABLE IF NOT EXISTS` statement
    fn create_sql() -> String {
        let columns = Self::columns()
            .iter()
            .map(|c| format!("    {}", c.to_sql()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            Self::table_name(),
            columns
        )
    }

    /// `DROP TABLE IF EXISTS` statement
    fn drop_sql() -> String {
        format!("DROP TABLE IF EXISTS {}", Self::table_name())
    }
}

const TEXT: &str = "VARCHAR(MAX)";

/// Raw event log rows, one per user action
pub struct StagingEventsTable;

impl TableSchema for StagingEventsTable {
    fn table_name() -> &'static str {
        "staging_events"
    }

    fn columns() -> Vec<ColumnDefinition> {
        // Names match the JSON keys of the event log
        vec![
            ColumnDefinition::new("artist", TEXT),
            ColumnDefinition::new("auth", TEXT),
            ColumnDefinition::new("firstName", TEXT),
            ColumnDefinition::new("gender", TEXT),
            ColumnDefinition::new("itemInSession", "INT"),
            ColumnDefinition::new("lastName", TEXT),
            ColumnDefinition::new("length", "FLOAT"),
            ColumnDefinition::new("level", TEXT),
            ColumnDefinition::new("location", TEXT),
            ColumnDefinition::new("method", TEXT),
            ColumnDefinition::new("page", TEXT),
            ColumnDefinition::new("registration", TEXT),
            ColumnDefinition::new("sessionId", "INT"),
            ColumnDefinition::new("song", TEXT),
            ColumnDefinition::new("status", "INT"),
            ColumnDefinition::new("ts", "BIGINT"),
            ColumnDefinition::new("userAgent", TEXT),
            ColumnDefinition::new("userId", "INT"),
        ]
    }
}

/// Raw song catalog rows
pub struct StagingSongsTable;

impl TableSchema for StagingSongsTable {
    fn table_name() -> &'static str {
        "staging_songs"
    }

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("song_id", TEXT).primary_key(),
            ColumnDefinition::new("artist_id", TEXT),
            ColumnDefinition::new("artist_latitude", "FLOAT"),
            ColumnDefinition::new("artist_longitude", "FLOAT"),
            ColumnDefinition::new("artist_location", TEXT),
            ColumnDefinition::new("artist_name", TEXT),
            ColumnDefinition::new("duration", "FLOAT"),
            ColumnDefinition::new("num_songs", "INT"),
            ColumnDefinition::new("title", TEXT),
            ColumnDefinition::new("year", "INT"),
        ]
    }
}

/// Fact table: one row per song play
pub struct SongplaysTable;

impl TableSchema for SongplaysTable {
    fn table_name() -> &'static str {
        "songplays"
    }

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("songplay_id", "INT")
                .identity(0, 1)
                .primary_key(),
            ColumnDefinition::new("start_time", "TIMESTAMP")
                .distkey()
                .sortkey()
                .not_null(),
            ColumnDefinition::new("user_id", "INT").not_null(),
            ColumnDefinition::new("level", TEXT),
            ColumnDefinition::new("song_id", TEXT).not_null(),
            ColumnDefinition::new("artist_id", TEXT).not_null(),
            ColumnDefinition::new("session_id", "INT"),
            ColumnDefinition::new("location", TEXT),
            ColumnDefinition::new("user_agent", TEXT),
        ]
    }
}

pub struct UsersTable;

impl TableSchema for UsersTable {
    fn table_name() -> &'static str {
        "users"
    }

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("user_id", TEXT).not_null().primary_key(),
            ColumnDefinition::new("first_name", TEXT),
            ColumnDefinition::new("last_name", TEXT),
            ColumnDefinition::new("gender", TEXT),
            ColumnDefinition::new("level", TEXT),
        ]
    }
}

pub struct SongsTable;

impl TableSchema for SongsTable {
    fn table_name() -> &'static str {
        "songs"
    }

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("song_id", TEXT).not_null().primary_key(),
            ColumnDefinition::new("title", TEXT).not_null(),
            ColumnDefinition::new("artist_id", TEXT).not_null(),
            ColumnDefinition::new("year", "INT"),
            ColumnDefinition::new("duration", "FLOAT"),
        ]
    }
}

pub struct ArtistsTable;

impl TableSchema for ArtistsTable {
    fn table_name() -> &'static str {
        "artists"
    }

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("artist_id", TEXT).not_null().primary_key(),
            ColumnDefinition::new("name", TEXT),
            ColumnDefinition::new("location", TEXT),
            ColumnDefinition::new("latitude", "FLOAT"),
            ColumnDefinition::new("longitude", "FLOAT"),
        ]
    }
}

/// Play timestamps broken down into calendar units
pub struct TimeTable;

impl TableSchema for TimeTable {
    fn table_name() -> &'static str {
        "time"
    }

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("start_time", "TIMESTAMP")
                .distkey()
                .sortkey()
                .not_null()
                .primary_key(),
            ColumnDefinition::new("hour", "INT").not_null(),
            ColumnDefinition::new("day", "INT").not_null(),
            ColumnDefinition::new("week", "INT").not_null(),
            ColumnDefinition::new("month", "INT").not_null(),
            ColumnDefinition::new("year", "INT").not_null(),
            ColumnDefinition::new("weekday", TEXT).not_null(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_attribute_order() {
        let col = ColumnDefinition::new("start_time", "TIMESTAMP")
            .not_null()
            .sortkey()
            .distkey();
        assert_eq!(col.to_sql(), "start_time TIMESTAMP DISTKEY SORTKEY NOT NULL");
    }

    #[test]
    fn test_identity_column() {
        let col = ColumnDefinition::new("songplay_id", "INT")
            .identity(0, 1)
            .primary_key();
        assert_eq!(col.to_sql(), "songplay_id INT IDENTITY(0, 1) PRIMARY KEY");
    }

    #[test]
    fn test_create_sql_lists_every_column() {
        let sql = SongplaysTable::create_sql();

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS songplays ("));
        for col in SongplaysTable::columns() {
            assert!(sql.contains(&col.to_sql()), "missing column {}", col.name);
        }
        // No trailing comma before the closing parenthesis
        assert!(sql.ends_with("user_agent VARCHAR(MAX)\n)"));
    }

    #[test]
    fn test_drop_sql() {
        assert_eq!(TimeTable::drop_sql(), "DROP TABLE IF EXISTS time");
    }

    #[test]
    fn test_staging_events_matches_log_layout() {
        let names: Vec<String> = StagingEventsTable::columns()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names.len(), 18);
        assert_eq!(names.first().map(String::as_str), Some("artist"));
        assert_eq!(names.last().map(String::as_str), Some("userId"));
    }
}
