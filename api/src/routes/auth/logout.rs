use actix_web::{web, HttpRequest, HttpResponse};

use cs_core::repositories::UserRepository;
use cs_shared::types::ApiResponse;

use crate::dto::auth_dto::LogoutRequest;
use crate::handlers::error_handler::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the supplied refresh token for the authenticated user.
/// Idempotent: answers `200` whether or not a token was removed, and
/// the body itself is optional.
pub async fn logout<U>(
    state: web::Data<AppState<U>>,
    req: HttpRequest,
    ctx: AuthContext,
    body: Option<web::Json<LogoutRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    let refresh_token = body.as_ref().and_then(|b| b.refresh_token.as_deref());

    match state.session.logout(ctx.user_id, refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success_with_message(
            serde_json::json!({}),
            "Logged out",
        )),
        Err(error) => handle_domain_error(error, req.path()),
    }
}
