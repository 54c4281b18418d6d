//! Configuration loading and config file resolution
//!
//! The loaders read a single INI-style file (`dwh.cfg`) with three sections:
//!
//! ```ini
//! [CLUSTER]
//! HOST=example.abc123.us-west-2.redshift.amazonaws.com
//! DB_NAME=dwh
//! DB_USER=dwhuser
//! DB_PASSWORD=secret
//! DB_PORT=5439
//!
//! [IAM_ROLE]
//! ARN=arn:aws:iam::123456789012:role/dwhRole
//!
//! [S3]
//! LOG_DATA='s3://udacity-dend/log_data'
//! LOG_JSONPATH='s3://udacity-dend/log_json_path.json'
//! SONG_DATA='s3://udacity-dend/song_data'
//! ```
//!
//! Values are taken verbatim. The COPY templates interpolate the S3 values
//! unquoted, so those carry their own single quotes in the file.

use crate::{Error, Result};
use ini::{Ini, ParseOption, Properties};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "DWH_CONFIG";

/// Config file used when neither CLI nor environment names one
pub const DEFAULT_CONFIG_FILE: &str = "dwh.cfg";

/// Warehouse cluster connection parameters (`[CLUSTER]`)
///
/// Read positionally: the first five entries of the section are
/// host, database name, user, password and port, in that order.
#[derive(Clone, PartialEq)]
pub struct ClusterConfig {
    pub host: String,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_port: u16,
}

impl fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("host", &self.host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"********")
            .field("db_port", &self.db_port)
            .finish()
    }
}

/// Object storage locations of the raw data (`[S3]`)
#[derive(Debug, Clone, PartialEq)]
pub struct S3Config {
    /// Raw event log data (`LOG_DATA`)
    pub log_data: String,
    /// JSONPaths file describing the event log layout (`LOG_JSONPATH`)
    pub log_jsonpath: String,
    /// Raw song catalog data (`SONG_DATA`)
    pub song_data: String,
}

/// Access role the warehouse assumes to read from S3 (`[IAM_ROLE]`)
#[derive(Debug, Clone, PartialEq)]
pub struct IamRoleConfig {
    pub arn: String,
}

/// Complete loader configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DwhConfig {
    pub cluster: ClusterConfig,
    pub s3: S3Config,
    pub iam_role: IamRoleConfig,
}

impl DwhConfig {
    /// Load and validate the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ini_str(&content)
    }

    /// Parse and validate configuration from INI text
    ///
    /// Every required key must be present and non-empty; nothing is
    /// defaulted.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let ini = Ini::load_from_str_opt(content, verbatim())?;

        let cluster = ClusterConfig::from_section(section(&ini, "CLUSTER")?)?;

        let s3_section = section(&ini, "S3")?;
        let s3 = S3Config {
            log_data: required(s3_section, "S3", "LOG_DATA")?,
            log_jsonpath: required(s3_section, "S3", "LOG_JSONPATH")?,
            song_data: required(s3_section, "S3", "SONG_DATA")?,
        };

        let iam_role = IamRoleConfig {
            arn: required(section(&ini, "IAM_ROLE")?, "IAM_ROLE", "ARN")?,
        };

        Ok(Self {
            cluster,
            s3,
            iam_role,
        })
    }
}

impl ClusterConfig {
    const FIELDS: [&'static str; 5] = ["host", "database name", "user", "password", "port"];

    fn from_section(props: &Properties) -> Result<Self> {
        let values: Vec<&str> = props.iter().map(|(_, v)| v.trim()).take(5).collect();

        if values.len() < Self::FIELDS.len() {
            return Err(Error::Config(format!(
                "[CLUSTER] needs {} entries ({}), found {}",
                Self::FIELDS.len(),
                Self::FIELDS.join(", "),
                values.len()
            )));
        }
        if let Some(pos) = values.iter().position(|v| v.is_empty()) {
            return Err(Error::Config(format!(
                "[CLUSTER] entry {} ({}) is empty",
                pos + 1,
                Self::FIELDS[pos]
            )));
        }

        let db_port = values[4].parse::<u16>().map_err(|e| {
            Error::Config(format!("[CLUSTER] port {:?} is not a valid port: {}", values[4], e))
        })?;

        Ok(Self {
            host: values[0].to_string(),
            db_name: values[1].to_string(),
            db_user: values[2].to_string(),
            db_password: values[3].to_string(),
            db_port,
        })
    }
}

/// Parse options that keep values exactly as written
fn verbatim() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

/// Fetch a section, rejecting keys that appear more than once
///
/// A repeated key would otherwise shift the positional `[CLUSTER]` read.
fn section<'a>(ini: &'a Ini, name: &str) -> Result<&'a Properties> {
    let props = ini
        .section(Some(name))
        .ok_or_else(|| Error::Config(format!("Missing section [{}]", name)))?;

    let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
    for (i, key) in keys.iter().enumerate() {
        if keys[..i].iter().any(|seen| seen.eq_ignore_ascii_case(key)) {
            return Err(Error::Config(format!(
                "Duplicate key {} in section [{}]",
                key, name
            )));
        }
    }
    Ok(props)
}

/// Look up a key case-insensitively, the way INI readers conventionally do
fn required(props: &Properties, section: &str, key: &str) -> Result<String> {
    let value = props
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
        .ok_or_else(|| Error::Config(format!("Missing key {} in section [{}]", key, section)))?;

    if value.is_empty() {
        return Err(Error::Config(format!(
            "Key {} in section [{}] is empty",
            key, section
        )));
    }
    Ok(value.to_string())
}

/// Config file resolution, highest priority first:
/// 1. Command-line argument
/// 2. `DWH_CONFIG` environment variable
/// 3. `dwh.cfg` in the working directory
pub fn resolve_config_path(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    PathBuf::from(DEFAULT_CONFIG_FILE)
}
