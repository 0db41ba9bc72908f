//! Session manager behavior tests over the in-memory repository

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::token::AccessClaims;
use crate::domain::entities::user::{Role, User};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{MockUserRepository, UserRepository};
use crate::services::session::SessionService;
use crate::services::token::TokenCodec;
use cs_shared::config::{AuthConfig, TokenConfig};

const TEST_COST: u32 = 4;

fn test_config() -> AuthConfig {
    AuthConfig {
        access: TokenConfig::new("test-access-secret", 900),
        refresh: TokenConfig::new("test-refresh-secret", 604_800),
        bcrypt_cost: TEST_COST,
    }
}

struct Fixture {
    repo: Arc<MockUserRepository>,
    service: SessionService<MockUserRepository>,
    config: AuthConfig,
}

impl Fixture {
    fn new() -> Self {
        let repo = Arc::new(MockUserRepository::new());
        let config = test_config();
        let service = SessionService::new(Arc::clone(&repo), &config);
        Self {
            repo,
            service,
            config,
        }
    }

    async fn seed_user(&self, email: &str, password: &str, role: Role) -> User {
        let user = User::new(email, password, role, TEST_COST).unwrap();
        self.repo.create(user.clone()).await.unwrap();
        user
    }
}

fn assert_invalid_credentials(err: DomainError) {
    match err {
        DomainError::Auth(AuthError::InvalidCredentials) => {}
        other => panic!("expected InvalidCredentials, got {:?}", other),
    }
}

fn assert_unauthorized(err: DomainError) {
    match err {
        DomainError::Auth(AuthError::Unauthorized) => {}
        other => panic!("expected Unauthorized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_round_trip() {
    let fx = Fixture::new();
    let user = fx.seed_user("u1@example.com", "secret-pw", Role::Admin).await;

    let outcome = fx.service.login("u1@example.com", "secret-pw").await.unwrap();

    // Embedded subject matches the user
    let codec = TokenCodec::new(&fx.config.access);
    let claims: AccessClaims = codec.verify(&outcome.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(outcome.expires_in, 900);

    // Refresh token persisted alongside the login timestamp
    let stored = fx.repo.get(user.id).await.unwrap();
    assert!(stored.has_refresh_token(&outcome.refresh_token));
    assert!(stored.last_login_at.is_some());
    assert_eq!(outcome.user.last_login_at, stored.last_login_at);

    // Projection carries no secrets
    let json = serde_json::to_value(&outcome.user).unwrap();
    assert!(json.get("password_hash").is_none());
    assert!(json.get("refresh_tokens").is_none());
}

#[tokio::test]
async fn test_login_email_lookup_is_case_insensitive() {
    let fx = Fixture::new();
    fx.seed_user("mixed@example.com", "secret-pw", Role::Admin).await;

    assert!(fx.service.login("  MIXED@Example.com ", "secret-pw").await.is_ok());
}

#[tokio::test]
async fn test_credential_invariance() {
    let fx = Fixture::new();
    fx.seed_user("known@example.com", "right-pw", Role::Admin).await;

    // Wrong password and unknown email produce the same error
    let wrong_pw = fx.service.login("known@example.com", "wrong-pw").await.unwrap_err();
    let no_user = fx.service.login("ghost@example.com", "right-pw").await.unwrap_err();

    assert_invalid_credentials(wrong_pw);
    assert_invalid_credentials(no_user);
}

#[tokio::test]
async fn test_deactivated_account_fails_login_and_identify() {
    let fx = Fixture::new();
    let user = fx.seed_user("gone@example.com", "pw-123456", Role::Admin).await;

    // Token issued while the account was still active
    let outcome = fx.service.login("gone@example.com", "pw-123456").await.unwrap();

    let mut stored = fx.repo.get(user.id).await.unwrap();
    stored.deactivate();
    fx.repo.put(stored).await;

    assert_unauthorized(fx.service.login("gone@example.com", "pw-123456").await.unwrap_err());
    assert_unauthorized(fx.service.identify(&outcome.access_token).await.unwrap_err());
}

#[tokio::test]
async fn test_refresh_revocation_after_logout() {
    let fx = Fixture::new();
    let user = fx.seed_user("rev@example.com", "pw-123456", Role::Admin).await;

    let outcome = fx.service.login("rev@example.com", "pw-123456").await.unwrap();

    fx.service
        .logout(user.id, Some(&outcome.refresh_token))
        .await
        .unwrap();

    // Signature and expiry are still valid; presence check must fail
    assert_unauthorized(fx.service.refresh(&outcome.refresh_token).await.unwrap_err());
}

#[tokio::test]
async fn test_refresh_prunes_aged_records() {
    let fx = Fixture::new();
    let user = fx.seed_user("prune@example.com", "pw-123456", Role::Admin).await;

    let outcome = fx.service.login("prune@example.com", "pw-123456").await.unwrap();

    // Backdate the stored record past the prune window while the token
    // itself remains cryptographically valid
    let mut stored = fx.repo.get(user.id).await.unwrap();
    stored.refresh_tokens[0].created_at = stored.refresh_tokens[0].created_at - Duration::days(30);
    fx.repo.put(stored).await;

    // Still present, so this refresh succeeds, then the sweep removes it
    fx.service.refresh(&outcome.refresh_token).await.unwrap();

    let stored = fx.repo.get(user.id).await.unwrap();
    assert!(!stored.has_refresh_token(&outcome.refresh_token));

    assert_unauthorized(fx.service.refresh(&outcome.refresh_token).await.unwrap_err());
}

#[tokio::test]
async fn test_expired_refresh_token_is_distinguished() {
    let fx = Fixture::new();
    let user = fx.seed_user("exp@example.com", "pw-123456", Role::Admin).await;

    // Sign a refresh token that is already past its expiry
    let codec = TokenCodec::new(&fx.config.refresh);
    let mut claims = crate::domain::entities::token::RefreshClaims::new(user.id, 900);
    claims.exp = claims.iat - 10;
    let stale = codec.sign(&claims).unwrap();

    match fx.service.refresh(&stale).await.unwrap_err() {
        DomainError::Token(TokenError::TokenExpired) => {}
        other => panic!("expected TokenExpired, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expired_access_token_rejected_by_identify() {
    let fx = Fixture::new();
    let user = fx.seed_user("expacc@example.com", "pw-123456", Role::Admin).await;

    let codec = TokenCodec::new(&fx.config.access);
    let mut claims = AccessClaims::new(&user, 900);
    claims.exp = claims.iat - 10;
    let stale = codec.sign(&claims).unwrap();

    match fx.service.identify(&stale).await.unwrap_err() {
        DomainError::Token(TokenError::TokenExpired) => {}
        other => panic!("expected TokenExpired, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refresh_with_foreign_signature_is_unauthorized() {
    let fx = Fixture::new();
    let user = fx.seed_user("foreign@example.com", "pw-123456", Role::Admin).await;

    // Signed with the access secret instead of the refresh secret
    let codec = TokenCodec::new(&fx.config.access);
    let forged = codec
        .sign(&crate::domain::entities::token::RefreshClaims::new(user.id, 900))
        .unwrap();

    assert_unauthorized(fx.service.refresh(&forged).await.unwrap_err());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let fx = Fixture::new();
    let user = fx.seed_user("out@example.com", "pw-123456", Role::Admin).await;

    let outcome = fx.service.login("out@example.com", "pw-123456").await.unwrap();

    fx.service.logout(user.id, Some(&outcome.refresh_token)).await.unwrap();
    fx.service.logout(user.id, Some(&outcome.refresh_token)).await.unwrap();
    fx.service.logout(user.id, None).await.unwrap();
    fx.service.logout(user.id, Some("never-issued")).await.unwrap();
}

#[tokio::test]
async fn test_current_user_projection() {
    let fx = Fixture::new();
    let user = fx.seed_user("me@example.com", "pw-123456", Role::SuperAdmin).await;

    let public = fx.service.current_user(user.id).await.unwrap();
    assert_eq!(public.id, user.id);
    assert_eq!(public.email, "me@example.com");
    assert_eq!(public.role, Role::SuperAdmin);

    assert_unauthorized(fx.service.current_user(Uuid::new_v4()).await.unwrap_err());
}

#[tokio::test]
async fn test_repeated_refresh_without_rotation() {
    let fx = Fixture::new();
    let user = fx.seed_user("u1@example.com", "pw-123456", Role::Admin).await;

    let outcome = fx.service.login("u1@example.com", "pw-123456").await.unwrap();
    let r1 = outcome.refresh_token.clone();

    // Two refreshes in succession both succeed with distinct access tokens
    let first = fx.service.refresh(&r1).await.unwrap();
    let second = fx.service.refresh(&r1).await.unwrap();
    assert_ne!(first.access_token, second.access_token);

    let codec = TokenCodec::new(&fx.config.access);
    let c1: AccessClaims = codec.verify(&first.access_token).unwrap();
    let c2: AccessClaims = codec.verify(&second.access_token).unwrap();
    assert_eq!(c1.user_id().unwrap(), user.id);
    assert_eq!(c2.user_id().unwrap(), user.id);

    // R1 itself is unchanged in the store
    let stored = fx.repo.get(user.id).await.unwrap();
    assert!(stored.has_refresh_token(&r1));
    assert_eq!(stored.refresh_tokens.len(), 1);

    // Logout then refresh fails
    fx.service.logout(user.id, Some(&r1)).await.unwrap();
    assert_unauthorized(fx.service.refresh(&r1).await.unwrap_err());
}
