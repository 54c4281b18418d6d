//! Warehouse connection and statement execution

pub mod connect;
pub mod warehouse;

pub use connect::*;
pub use warehouse::*;
