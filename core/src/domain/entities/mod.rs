//! Domain entities.

pub mod token;
pub mod user;

pub use token::{AccessClaims, RefreshClaims};
pub use user::{PublicUser, RefreshTokenRecord, Role, User};
