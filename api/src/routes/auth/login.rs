use actix_web::{web, HttpRequest, HttpResponse};
use actix_web::http::StatusCode;
use validator::Validate;

use cs_core::repositories::UserRepository;
use cs_shared::types::ApiResponse;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::handlers::error_handler::{error_response, handle_domain_error};

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates by email and password. Unknown email and wrong password
/// both answer `401 INVALID_CREDENTIALS` with the same message.
pub async fn login<U>(
    state: web::Data<AppState<U>>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if body.validate().is_err() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Invalid email or password format",
            req.path(),
        );
    }

    match state.session.login(&body.email, &body.password).await {
        Ok(outcome) => HttpResponse::Ok().json(ApiResponse::success(LoginResponse {
            token: outcome.access_token,
            refresh_token: outcome.refresh_token,
            user: outcome.user.into(),
            expires_in: outcome.expires_in,
        })),
        Err(error) => handle_domain_error(error, req.path()),
    }
}
