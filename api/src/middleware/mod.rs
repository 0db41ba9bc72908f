//! HTTP middleware: authentication guard, role gate and CORS.

pub mod auth;
pub mod cors;
pub mod roles;

pub use auth::{AuthContext, IdentityVerifier, RequireAuth};
pub use roles::RequireRole;
