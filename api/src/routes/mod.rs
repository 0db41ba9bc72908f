//! Route handlers grouped by resource.

pub mod admin;
pub mod auth;

pub use auth::AppState;
