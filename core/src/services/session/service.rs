//! Main session manager implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshClaims};
use crate::domain::entities::user::{PublicUser, RefreshTokenRecord};
use crate::domain::value_objects::{Identity, LoginOutcome, RefreshOutcome};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::token::TokenCodec;
use cs_shared::config::AuthConfig;

/// Session manager orchestrating login, refresh and logout
///
/// Holds two token codecs: access tokens are short-lived and stateless,
/// refresh tokens are long-lived and matched against the user's stored
/// collection on every use. Refresh tokens are not rotated on use; they
/// stay valid until logged out or pruned by age.
pub struct SessionService<U: UserRepository> {
    /// User repository, the credential store
    users: Arc<U>,
    /// Codec for access tokens
    access: TokenCodec,
    /// Codec for refresh tokens
    refresh: TokenCodec,
}

impl<U: UserRepository> SessionService<U> {
    /// Create a new session service from the authentication configuration
    pub fn new(users: Arc<U>, config: &AuthConfig) -> Self {
        Self {
            users,
            access: TokenCodec::new(&config.access),
            refresh: TokenCodec::new(&config.refresh),
        }
    }

    /// Authenticate a user by email and password
    ///
    /// On success issues an access token and a refresh token, records
    /// the login timestamp and the refresh token in one write, and
    /// returns the public projection of the user.
    ///
    /// Unknown email and wrong password both fail `InvalidCredentials`;
    /// a deactivated account fails `Unauthorized`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginOutcome> {
        let email = email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(password) {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "login rejected for deactivated account");
            return Err(AuthError::Unauthorized.into());
        }

        let access_token = self
            .access
            .sign(&AccessClaims::new(&user, self.access.lifetime_secs()))?;
        let refresh_token = self
            .refresh
            .sign(&RefreshClaims::new(user.id, self.refresh.lifetime_secs()))?;

        // last_login_at and the new refresh record persist together;
        // the refresh token is not usable until this write lands.
        let now = Utc::now();
        self.users
            .record_login(user.id, now, RefreshTokenRecord::new(refresh_token.clone()))
            .await?;

        let mut public = user.public();
        public.last_login_at = Some(now);

        tracing::info!(user_id = %public.id, "user logged in");

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            user: public,
            expires_in: self.access.lifetime_secs(),
        })
    }

    /// Exchange a refresh token for a new access token
    ///
    /// The refresh token must carry a valid signature, be unexpired
    /// (expired tokens fail with the distinct `TokenExpired`), and be
    /// present in the user's stored collection. The refresh token is
    /// not reissued. Aged-out records are pruned on every call.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<RefreshOutcome> {
        let claims: RefreshClaims = self.refresh.verify(refresh_token).map_err(|e| match e {
            crate::errors::TokenError::TokenExpired => DomainError::Token(e),
            _ => AuthError::Unauthorized.into(),
        })?;

        let user_id = claims.user_id().map_err(|_| AuthError::Unauthorized)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !user.is_active {
            return Err(AuthError::Unauthorized.into());
        }

        // A cryptographically valid token that was revoked via logout
        // is no longer in the stored collection.
        if !user.has_refresh_token(refresh_token) {
            tracing::warn!(user_id = %user.id, "refresh attempted with revoked token");
            return Err(AuthError::Unauthorized.into());
        }

        let access_token = self
            .access
            .sign(&AccessClaims::new(&user, self.access.lifetime_secs()))?;

        let cutoff = Utc::now() - Duration::seconds(self.refresh.lifetime_secs());
        let pruned = self.users.prune_refresh_tokens(user.id, cutoff).await?;
        if pruned > 0 {
            tracing::debug!(user_id = %user.id, pruned, "pruned expired refresh tokens");
        }

        Ok(RefreshOutcome {
            access_token,
            expires_in: self.access.lifetime_secs(),
        })
    }

    /// Revoke a refresh token for the authenticated user
    ///
    /// Idempotent: an absent, already-removed or unsupplied token is
    /// not an error. The access token stays valid until its natural
    /// expiry (accepted limitation of stateless access tokens).
    pub async fn logout(&self, user_id: Uuid, refresh_token: Option<&str>) -> DomainResult<()> {
        if let Some(token) = refresh_token {
            match self.users.remove_refresh_token(user_id, token).await {
                Ok(removed) => {
                    if removed {
                        tracing::info!(user_id = %user_id, "refresh token revoked on logout");
                    }
                }
                Err(DomainError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Return the public projection of the authenticated user
    pub async fn current_user(&self, user_id: Uuid) -> DomainResult<PublicUser> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        Ok(user.public())
    }

    /// Resolve an access token into an authenticated identity
    ///
    /// Backend of the request guard: verifies the token, loads the
    /// referenced user, and rejects missing or deactivated accounts.
    pub async fn identify(&self, access_token: &str) -> DomainResult<Identity> {
        let claims: AccessClaims = self.access.verify(access_token)?;
        let user_id = claims.user_id().map_err(|_| AuthError::Unauthorized)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "request rejected for deactivated account");
            return Err(AuthError::Unauthorized.into());
        }

        Ok(Identity {
            user_id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}
