//! Authentication and token signing configuration

use serde::{Deserialize, Serialize};

/// Configuration for one signed, expiring token kind
///
/// Access and refresh tokens are two instances of this same shape with
/// independent secrets and lifetimes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Signing secret for this token kind
    pub secret: String,

    /// Token lifetime in seconds
    pub lifetime_secs: i64,
}

impl TokenConfig {
    /// Create a new token configuration
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Check if using a default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret.starts_with("development-")
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Access token signing configuration (short-lived, stateless)
    pub access: TokenConfig,

    /// Refresh token signing configuration (long-lived, persisted per user)
    pub refresh: TokenConfig,

    /// bcrypt cost factor for password hashing
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access: TokenConfig::new("development-access-secret-change-in-production", 900),
            refresh: TokenConfig::new("development-refresh-secret-change-in-production", 604_800),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    /// Load authentication configuration from environment variables
    ///
    /// Recognized variables: `ACCESS_TOKEN_SECRET`, `ACCESS_TOKEN_LIFETIME`,
    /// `REFRESH_TOKEN_SECRET`, `REFRESH_TOKEN_LIFETIME`, `BCRYPT_COST`.
    /// Lifetimes are in seconds.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let access_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .unwrap_or(defaults.access.secret);
        let access_lifetime = env_i64("ACCESS_TOKEN_LIFETIME", defaults.access.lifetime_secs);

        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .unwrap_or(defaults.refresh.secret);
        let refresh_lifetime = env_i64("REFRESH_TOKEN_LIFETIME", defaults.refresh.lifetime_secs);

        let bcrypt_cost = env_i64("BCRYPT_COST", defaults.bcrypt_cost as i64) as u32;

        Self {
            access: TokenConfig::new(access_secret, access_lifetime),
            refresh: TokenConfig::new(refresh_secret, refresh_lifetime),
            bcrypt_cost,
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_bcrypt_cost() -> u32 {
    12
}
