//! Claim payloads for the two signed token kinds.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{Role, User};

/// Claims carried by an access token
///
/// Access tokens are stateless: everything the request guard needs to
/// identify the caller is embedded here, and validity is purely
/// signature + expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Login email at issue time
    pub email: String,

    /// Account role at issue time
    pub role: Role,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Token ID, unique per issued token
    pub jti: String,
}

/// Claims carried by a refresh token
///
/// Deliberately minimal: a refresh token is matched against the stored
/// collection on use, so only the subject needs to be embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl AccessClaims {
    /// Creates access claims for a user with the given lifetime
    pub fn new(user: &User, lifetime_secs: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(lifetime_secs);
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

impl RefreshClaims {
    /// Creates refresh claims for a subject with the given lifetime
    pub fn new(user_id: Uuid, lifetime_secs: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(lifetime_secs);
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}
