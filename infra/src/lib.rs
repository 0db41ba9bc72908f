//! # CityScout Infrastructure
//!
//! MySQL-backed implementations of the `cs_core` repository traits,
//! plus database connection pool management.

pub mod database;

pub use database::connection::create_pool;
pub use database::mysql::MySqlUserRepository;
