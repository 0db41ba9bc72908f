//! Database connection and repository implementations.

pub mod connection;
pub mod mysql;
