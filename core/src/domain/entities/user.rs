//! User entity representing a portal account in the CityScout system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Role of a portal account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Content administrator
    Admin,
    /// Full administrator, including account management
    SuperAdmin,
}

/// A refresh token held by a user, stored alongside the account record
///
/// Insertion order is append order; pruning removes entries older than
/// the refresh lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// The exact token value as issued to the client
    pub token: String,

    /// Timestamp when the token was issued
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates a record for a freshly issued token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            created_at: Utc::now(),
        }
    }
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login email, stored lowercased
    pub email: String,

    /// bcrypt hash of the password; never serialized outward
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Whether the account is active; deactivated accounts fail login
    /// and every guarded request
    pub is_active: bool,

    /// Timestamp of the user's last successful login
    pub last_login_at: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Active refresh tokens, append-ordered
    #[serde(default)]
    pub refresh_tokens: Vec<RefreshTokenRecord>,
}

/// Public projection of a user, safe to serialize to clients
///
/// Excludes `password_hash` and `refresh_tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User, hashing the given plaintext password
    pub fn new(
        email: impl Into<String>,
        password: &str,
        role: Role,
        bcrypt_cost: u32,
    ) -> DomainResult<Self> {
        let now = Utc::now();
        let password_hash = hash_password(password, bcrypt_cost)?;
        Ok(Self {
            id: Uuid::new_v4(),
            email: email.into().trim().to_lowercase(),
            password_hash,
            role,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
            refresh_tokens: Vec::new(),
        })
    }

    /// Replaces the password hash with a hash of the new plaintext
    ///
    /// No-op when the plaintext already matches the stored hash, so
    /// unrelated updates that round-trip the same password do not
    /// re-hash (and invalidate) anything.
    pub fn set_password(&mut self, plaintext: &str, bcrypt_cost: u32) -> DomainResult<()> {
        if self.verify_password(plaintext) {
            return Ok(());
        }
        self.password_hash = hash_password(plaintext, bcrypt_cost)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Verifies a candidate password against the stored hash
    pub fn verify_password(&self, candidate: &str) -> bool {
        bcrypt::verify(candidate, &self.password_hash).unwrap_or(false)
    }

    /// Checks whether the exact token value is present in the stored collection
    pub fn has_refresh_token(&self, token: &str) -> bool {
        self.refresh_tokens.iter().any(|r| r.token == token)
    }

    /// Deactivates the account
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivates the account
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Returns the public projection of this user
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

fn hash_password(plaintext: &str, cost: u32) -> DomainResult<String> {
    bcrypt::hash(plaintext, cost).map_err(|e| DomainError::Internal {
        message: format!("Password hashing failed: {}", e),
    })
}
