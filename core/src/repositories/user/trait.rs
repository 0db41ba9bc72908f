//! User repository trait defining the interface for the credential store.
//!
//! The repository is the only mutation path for a user's credential
//! data. Refresh-token mutations are expressed as store-native
//! operations (append, remove-by-value, prune-by-age) so that
//! implementations can make each one a single atomic update instead of
//! a read-modify-write of the whole record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::{RefreshTokenRecord, User};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by login email
    ///
    /// Matching is case-insensitive; implementations receive the email
    /// already trimmed and lowercased.
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that email
    /// * `Err(DomainError)` - Store error
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// List all users (admin surface)
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Creation failed (e.g. duplicate email)
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Record a successful login in one write
    ///
    /// Sets `last_login_at` and appends the freshly issued refresh
    /// token record together; the token is not valid for refresh until
    /// this persists.
    async fn record_login(
        &self,
        user_id: Uuid,
        login_at: DateTime<Utc>,
        record: RefreshTokenRecord,
    ) -> Result<(), DomainError>;

    /// Remove the single refresh token with an exact value match
    ///
    /// # Returns
    /// * `Ok(true)` - A record was removed
    /// * `Ok(false)` - No record matched (idempotent no-op)
    async fn remove_refresh_token(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError>;

    /// Remove all refresh token records created before `cutoff`
    ///
    /// # Returns
    /// * `Ok(count)` - Number of records removed
    async fn prune_refresh_tokens(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, DomainError>;
}
