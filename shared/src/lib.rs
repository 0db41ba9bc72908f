//! Shared utilities and common types for the CityScout server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - API response envelope structures
//! - Common type definitions

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig, TokenConfig};
pub use types::{ApiResponse, ErrorBody, ErrorEnvelope};
