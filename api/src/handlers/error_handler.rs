//! Mapping from domain errors to HTTP error envelopes.
//!
//! Every error leaving the API carries the standard envelope
//! `{success: false, error: {code, message}, timestamp, path}` with a
//! stable machine-readable code. Internal details never reach clients;
//! they go to the log instead.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use cs_core::errors::{AuthError, DomainError, TokenError};
use cs_shared::types::ErrorEnvelope;

/// Status code and stable error code for a domain error
pub fn error_parts(error: &DomainError) -> (StatusCode, &'static str) {
    match error {
        DomainError::Auth(AuthError::InvalidCredentials) => {
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        }
        DomainError::Auth(AuthError::Unauthorized) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        DomainError::Auth(AuthError::InsufficientPermissions) => {
            (StatusCode::FORBIDDEN, "INSUFFICIENT_PERMISSIONS")
        }
        DomainError::Token(TokenError::TokenExpired) => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
        DomainError::Token(TokenError::InvalidToken) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
        DomainError::Token(TokenError::TokenGenerationFailed) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        DomainError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

/// Build an error envelope response for a given code and path
pub fn error_response(status: StatusCode, code: &str, message: &str, path: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorEnvelope::new(code, message, path))
}

/// Convert a domain error into the enveloped HTTP response
pub fn handle_domain_error(error: DomainError, path: &str) -> HttpResponse {
    let (status, code) = error_parts(&error);

    // Internal messages stay server-side
    let message = if status.is_server_error() {
        log::error!("API error at {}: {}", path, error);
        "An internal error occurred".to_string()
    } else {
        error.to_string()
    };

    error_response(status, code, &message, path)
}
