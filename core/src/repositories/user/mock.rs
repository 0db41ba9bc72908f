//! In-memory implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::{RefreshTokenRecord, User};
use crate::errors::DomainError;

use super::trait_::UserRepository;

/// Mock user repository backed by a HashMap
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch a snapshot of a stored user, bypassing the trait (test helper)
    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// Overwrite a stored user directly (test helper)
    pub async fn put(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let needle = email.trim().to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == needle).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Internal {
                message: "Email already registered".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn record_login(
        &self,
        user_id: Uuid,
        login_at: DateTime<Utc>,
        record: RefreshTokenRecord,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(DomainError::NotFound {
            resource: "User".to_string(),
        })?;

        user.last_login_at = Some(login_at);
        user.updated_at = login_at;
        user.refresh_tokens.push(record);
        Ok(())
    }

    async fn remove_refresh_token(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(DomainError::NotFound {
            resource: "User".to_string(),
        })?;

        let before = user.refresh_tokens.len();
        user.refresh_tokens.retain(|r| r.token != token);
        Ok(user.refresh_tokens.len() < before)
    }

    async fn prune_refresh_tokens(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(DomainError::NotFound {
            resource: "User".to_string(),
        })?;

        let before = user.refresh_tokens.len();
        user.refresh_tokens.retain(|r| r.created_at >= cutoff);
        Ok(before - user.refresh_tokens.len())
    }
}
