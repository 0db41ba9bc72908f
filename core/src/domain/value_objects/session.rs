//! Results of the session manager operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::{PublicUser, Role};

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// Short-lived, stateless access token
    pub access_token: String,

    /// Long-lived refresh token, persisted in the user's credential store
    pub refresh_token: String,

    /// Public projection of the authenticated user
    pub user: PublicUser,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Result of a successful token refresh
///
/// The refresh token itself is not rotated; only a new access token is
/// issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    /// Newly issued access token
    pub access_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Authenticated identity attached to a guarded request
///
/// Immutable snapshot built by the request guard; handlers receive it
/// as an argument rather than reading ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}
