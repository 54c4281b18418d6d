//! # DWH Common Library
//!
//! Shared code for the warehouse loading tools:
//! - Configuration loading (`dwh.cfg`)
//! - SQL statement assembly for staging, fact and dimension tables
//! - Warehouse connection and statement execution
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod sql;

pub use config::DwhConfig;
pub use error::{Error, Result};
pub use sql::{Queries, Statement, StatementKind};
