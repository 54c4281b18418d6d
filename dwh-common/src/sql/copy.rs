//! Bulk-load (COPY) statements
//!
//! The warehouse pulls JSON objects straight from S3 into a staging table;
//! the loader only renders the command text. Locations and role are
//! interpolated exactly as configured.

/// Region of the source bucket
pub const COPY_REGION: &str = "us-west-2";

/// Timestamp encoding of the event log `ts` field
pub const EVENT_TIMEFORMAT: &str = "epochmillisecs";

/// How the loader maps JSON objects onto table columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonFormat<'a> {
    /// Column mapping given by a JSONPaths file at this location
    JsonPaths(&'a str),
    /// Match JSON keys to column names automatically
    Auto,
}

/// A COPY command from S3 into one table
#[derive(Debug, Clone)]
pub struct CopyCommand<'a> {
    pub table: &'a str,
    pub source: &'a str,
    pub iam_role: &'a str,
    pub format: JsonFormat<'a>,
    pub timeformat: Option<&'a str>,
}

impl CopyCommand<'_> {
    pub fn to_sql(&self) -> String {
        let format = match self.format {
            JsonFormat::JsonPaths(location) => location,
            JsonFormat::Auto => "'auto'",
        };

        let mut sql = format!(
            "COPY {table} FROM {source}\n    \
             CREDENTIALS 'aws_iam_role={role}'\n    \
             REGION '{region}'\n    \
             FORMAT AS JSON {format}",
            table = self.table,
            source = self.source,
            role = self.iam_role,
            region = COPY_REGION,
            format = format,
        );
        if let Some(timeformat) = self.timeformat {
            sql.push_str(&format!("\n    TIMEFORMAT AS '{}'", timeformat));
        }
        sql
    }
}
