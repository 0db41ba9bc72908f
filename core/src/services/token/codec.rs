//! Generic signed-token codec built on JWT (HS256)

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::TokenError;
use cs_shared::config::TokenConfig;

/// Signs and verifies compact, tamper-evident tokens
///
/// Stateless; access and refresh tokens are two instances of this type
/// with independent secrets and lifetimes.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_secs: i64,
}

impl TokenCodec {
    /// Creates a codec from a token configuration
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry is exact; the default 60s leeway would let expired
        // tokens pass verification for a minute.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            lifetime_secs: config.lifetime_secs,
        }
    }

    /// The configured token lifetime in seconds
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Signs a claims payload into a compact token
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)
    }

    /// Verifies a token and decodes its claims
    ///
    /// Distinguishes `TokenExpired` (structurally valid, past its
    /// embedded expiry) from `InvalidToken` (malformed or signed with a
    /// different secret).
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::token::{AccessClaims, RefreshClaims};
    use crate::domain::entities::user::{Role, User};
    use chrono::Utc;
    use uuid::Uuid;

    fn codec(secret: &str, lifetime: i64) -> TokenCodec {
        TokenCodec::new(&TokenConfig::new(secret, lifetime))
    }

    fn test_user() -> User {
        User::new("codec@example.com", "pw", Role::Admin, 4).unwrap()
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let codec = codec("access-secret", 900);
        let user = test_user();

        let token = codec.sign(&AccessClaims::new(&user, 900)).unwrap();
        let claims: AccessClaims = codec.verify(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let codec = codec("access-secret", 900);
        let user = test_user();

        let mut claims = AccessClaims::new(&user, 900);
        claims.exp = Utc::now().timestamp() - 10;
        let token = codec.sign(&claims).unwrap();

        let err = codec.verify::<AccessClaims>(&token).unwrap_err();
        assert_eq!(err, TokenError::TokenExpired);
    }

    #[test]
    fn test_wrong_secret_is_invalid_not_expired() {
        let signer = codec("refresh-secret", 900);
        let verifier = codec("access-secret", 900);

        let token = signer
            .sign(&RefreshClaims::new(Uuid::new_v4(), 900))
            .unwrap();

        let err = verifier.verify::<RefreshClaims>(&token).unwrap_err();
        assert_eq!(err, TokenError::InvalidToken);
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let codec = codec("access-secret", 900);
        let err = codec.verify::<AccessClaims>("not.a.token").unwrap_err();
        assert_eq!(err, TokenError::InvalidToken);
    }
}
