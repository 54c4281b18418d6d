//! Common error types for the warehouse loaders

use thiserror::Error;

/// Common result type for DWH operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the DWH tools
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed INI configuration file
    #[error("Config parse error: {0}")]
    IniParse(#[from] ini::ParseError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Load step requested from the wrong pipeline state
    #[error("Invalid state: {0}")]
    State(String),
}
