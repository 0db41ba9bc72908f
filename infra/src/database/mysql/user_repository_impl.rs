//! MySQL implementation of the UserRepository trait.
//!
//! Users live in the `users` table; their refresh tokens live in the
//! `user_refresh_tokens` child table so that append, remove-by-value
//! and prune-by-age are each a single atomic statement. No credential
//! mutation goes through a read-modify-write of the whole record, which
//! closes the lost-update race between concurrent logins.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cs_core::domain::entities::user::{RefreshTokenRecord, Role, User};
use cs_core::errors::DomainError;
use cs_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn role_to_str(role: Role) -> &'static str {
        match role {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    fn role_from_str(value: &str) -> Result<Role, DomainError> {
        match value {
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(DomainError::Internal {
                message: format!("Unknown role in database: {}", other),
            }),
        }
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| internal(format!("Failed to get id: {}", e)))?;
        let role: String = row
            .try_get("role")
            .map_err(|e| internal(format!("Failed to get role: {}", e)))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| internal(format!("Invalid user UUID: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| internal(format!("Failed to get email: {}", e)))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| internal(format!("Failed to get password_hash: {}", e)))?,
            role: Self::role_from_str(&role)?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| internal(format!("Failed to get is_active: {}", e)))?,
            last_login_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_login_at")
                .map_err(|e| internal(format!("Failed to get last_login_at: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| internal(format!("Failed to get created_at: {}", e)))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| internal(format!("Failed to get updated_at: {}", e)))?,
            refresh_tokens: Vec::new(),
        })
    }

    /// Load the refresh token records for one user, in insertion order
    async fn load_refresh_tokens(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        let rows = sqlx::query(
            "SELECT token, created_at FROM user_refresh_tokens WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal(format!("Failed to load refresh tokens: {}", e)))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(RefreshTokenRecord {
                token: row
                    .try_get("token")
                    .map_err(|e| internal(format!("Failed to get token: {}", e)))?,
                created_at: row
                    .try_get::<DateTime<Utc>, _>("created_at")
                    .map_err(|e| internal(format!("Failed to get created_at: {}", e)))?,
            });
        }
        Ok(records)
    }

    async fn hydrate(&self, mut user: User) -> Result<User, DomainError> {
        user.refresh_tokens = self.load_refresh_tokens(user.id).await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        // Emails are stored lowercased; the comparison stays
        // case-insensitive for records seeded outside the application.
        let query = r#"
            SELECT id, email, password_hash, role, is_active, last_login_at, created_at, updated_at
            FROM users
            WHERE LOWER(email) = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to find user by email: {}", e)))?;

        match result {
            Some(row) => {
                let user = Self::row_to_user(&row)?;
                Ok(Some(self.hydrate(user).await?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, email, password_hash, role, is_active, last_login_at, created_at, updated_at
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to find user by id: {}", e)))?;

        match result {
            Some(row) => {
                let user = Self::row_to_user(&row)?;
                Ok(Some(self.hydrate(user).await?))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, is_active, last_login_at, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(Self::row_to_user(&row)?);
        }

        // Group all token records in one pass instead of a query per user
        let token_rows = sqlx::query(
            "SELECT user_id, token, created_at FROM user_refresh_tokens ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal(format!("Failed to load refresh tokens: {}", e)))?;

        let mut by_user: HashMap<String, Vec<RefreshTokenRecord>> = HashMap::new();
        for row in token_rows {
            let user_id: String = row
                .try_get("user_id")
                .map_err(|e| internal(format!("Failed to get user_id: {}", e)))?;
            by_user.entry(user_id).or_default().push(RefreshTokenRecord {
                token: row
                    .try_get("token")
                    .map_err(|e| internal(format!("Failed to get token: {}", e)))?,
                created_at: row
                    .try_get::<DateTime<Utc>, _>("created_at")
                    .map_err(|e| internal(format!("Failed to get created_at: {}", e)))?,
            });
        }

        for user in &mut users {
            if let Some(records) = by_user.remove(&user.id.to_string()) {
                user.refresh_tokens = records;
            }
        }

        Ok(users)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, email, password_hash, role, is_active, last_login_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(Self::role_to_str(user.role))
            .bind(user.is_active)
            .bind(user.last_login_at)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to create user: {}", e)))?;

        Ok(user)
    }

    async fn record_login(
        &self,
        user_id: Uuid,
        login_at: DateTime<Utc>,
        record: RefreshTokenRecord,
    ) -> Result<(), DomainError> {
        // One transaction: the login timestamp and the new token record
        // land together or not at all.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal(format!("Failed to begin transaction: {}", e)))?;

        let updated = sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(login_at)
            .bind(login_at)
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| internal(format!("Failed to record login: {}", e)))?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        sqlx::query("INSERT INTO user_refresh_tokens (user_id, token, created_at) VALUES (?, ?, ?)")
            .bind(user_id.to_string())
            .bind(&record.token)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| internal(format!("Failed to store refresh token: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| internal(format!("Failed to commit login: {}", e)))
    }

    async fn remove_refresh_token(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_refresh_tokens WHERE user_id = ? AND token = ?")
            .bind(user_id.to_string())
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to remove refresh token: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn prune_refresh_tokens(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let result =
            sqlx::query("DELETE FROM user_refresh_tokens WHERE user_id = ? AND created_at < ?")
                .bind(user_id.to_string())
                .bind(cutoff)
                .execute(&self.pool)
                .await
                .map_err(|e| internal(format!("Failed to prune refresh tokens: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}

fn internal(message: String) -> DomainError {
    DomainError::Internal { message }
}
