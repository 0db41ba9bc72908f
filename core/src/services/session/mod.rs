//! Session management module
//!
//! This module owns the credential lifecycle:
//! - Login (password verification, token issuance, login recording)
//! - Refresh (access re-issuance against the stored refresh collection)
//! - Logout (refresh token revocation)
//! - Request identification for the authentication guard

mod service;

#[cfg(test)]
mod tests;

pub use service::SessionService;
