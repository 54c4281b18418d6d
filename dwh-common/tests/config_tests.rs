//! Integration tests for configuration loading
//!
//! Every required key must be present; loading fails on the first gap.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate DWH_CONFIG are marked with #[serial].

use dwh_common::config::{resolve_config_path, DwhConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use dwh_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = "\
[CLUSTER]
HOST=dwhcluster.abc123.us-west-2.redshift.amazonaws.com
DB_NAME=dwh
DB_USER=dwhuser
DB_PASSWORD=Passw0rd
DB_PORT=5439

[IAM_ROLE]
ARN=arn:aws:iam::123456789012:role/dwhRole

[S3]
LOG_DATA='s3://udacity-dend/log_data'
LOG_JSONPATH='s3://udacity-dend/log_json_path.json'
SONG_DATA='s3://udacity-dend/song_data'
";

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn without_line(key: &str) -> String {
    FULL_CONFIG
        .lines()
        .filter(|line| !line.starts_with(&format!("{}=", key)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_load_full_config() {
    let file = write_config(FULL_CONFIG);
    let config = DwhConfig::load(file.path()).unwrap();

    assert_eq!(
        config.cluster.host,
        "dwhcluster.abc123.us-west-2.redshift.amazonaws.com"
    );
    assert_eq!(config.cluster.db_name, "dwh");
    assert_eq!(config.cluster.db_user, "dwhuser");
    assert_eq!(config.cluster.db_password, "Passw0rd");
    assert_eq!(config.cluster.db_port, 5439);
    assert_eq!(config.iam_role.arn, "arn:aws:iam::123456789012:role/dwhRole");
}

#[test]
fn test_s3_values_kept_verbatim() {
    // Quotes are part of the value; the COPY templates rely on them
    let config = DwhConfig::from_ini_str(FULL_CONFIG).unwrap();

    assert_eq!(config.s3.log_data, "'s3://udacity-dend/log_data'");
    assert_eq!(config.s3.log_jsonpath, "'s3://udacity-dend/log_json_path.json'");
    assert_eq!(config.s3.song_data, "'s3://udacity-dend/song_data'");
}

#[test]
fn test_each_missing_key_is_an_error() {
    for key in ["LOG_DATA", "LOG_JSONPATH", "SONG_DATA", "ARN"] {
        let result = DwhConfig::from_ini_str(&without_line(key));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains(key), "{}: {}", key, msg),
            other => panic!("{} missing should fail with Config error, got {:?}", key, other),
        }
    }
}

#[test]
fn test_short_cluster_section_is_an_error() {
    let result = DwhConfig::from_ini_str(&without_line("DB_PORT"));
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("[CLUSTER]")));
}

#[test]
fn test_missing_section_is_an_error() {
    let config: String = FULL_CONFIG.replace("[IAM_ROLE]", "[ROLE]");
    let result = DwhConfig::from_ini_str(&config);
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("IAM_ROLE")));
}

#[test]
fn test_empty_value_is_an_error() {
    let config = FULL_CONFIG.replace("ARN=arn:aws:iam::123456789012:role/dwhRole", "ARN=");
    let result = DwhConfig::from_ini_str(&config);
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("empty")));
}

#[test]
fn test_missing_file_is_an_error() {
    let result = DwhConfig::load(&PathBuf::from("/nonexistent/dwh-test/dwh.cfg"));
    assert!(matches!(result, Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn test_repeated_cluster_key_is_an_error() {
    // A second HOST would shift every positional value after it
    let config = FULL_CONFIG.replace("DB_NAME=dwh\n", "DB_NAME=dwh\nhost=dwh-replica\n");
    let result = DwhConfig::from_ini_str(&config);
    assert!(
        matches!(&result, Err(Error::Config(msg)) if msg.contains("Duplicate key") && msg.contains("[CLUSTER]")),
        "unexpected result: {:?}",
        result
    );
}

#[test]
fn test_repeated_s3_key_is_an_error() {
    let config = format!("{}LOG_DATA='s3://other-bucket/log_data'\n", FULL_CONFIG);
    let result = DwhConfig::from_ini_str(&config);
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("[S3]")));
}

#[test]
#[serial]
fn test_resolve_uses_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/dwh-test-env.cfg");

    let path = resolve_config_path(None);
    assert_eq!(path, PathBuf::from("/tmp/dwh-test-env.cfg"));

    // Cleanup
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_falls_back_to_default() {
    env::remove_var(CONFIG_ENV_VAR);

    let path = resolve_config_path(None);
    assert_eq!(path, PathBuf::from(DEFAULT_CONFIG_FILE));
}

#[test]
#[serial]
fn test_resolve_cli_beats_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/dwh-test-env.cfg");

    let cli = PathBuf::from("/tmp/dwh-test-cli.cfg");
    let path = resolve_config_path(Some(&cli));
    assert_eq!(path, cli);

    // Cleanup
    env::remove_var(CONFIG_ENV_VAR);
}
