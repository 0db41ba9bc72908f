use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};

use cs_core::repositories::UserRepository;
use cs_shared::types::ApiResponse;

use crate::dto::auth_dto::{RefreshRequest, RefreshResponse};
use crate::handlers::error_handler::{error_response, handle_domain_error};

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new access token. The refresh token
/// itself is not reissued. A missing token answers `401 UNAUTHORIZED`,
/// an expired one `401 TOKEN_EXPIRED`; any other failure answers
/// `401 UNAUTHORIZED`.
pub async fn refresh<U>(
    state: web::Data<AppState<U>>,
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    let refresh_token = match body.as_ref().and_then(|b| b.refresh_token.as_deref()) {
        Some(token) => token,
        None => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Refresh token required",
                req.path(),
            );
        }
    };

    match state.session.refresh(refresh_token).await {
        Ok(outcome) => HttpResponse::Ok().json(ApiResponse::success(RefreshResponse {
            token: outcome.access_token,
            expires_in: outcome.expires_in,
        })),
        Err(error) => handle_domain_error(error, req.path()),
    }
}
