use actix_web::{web, HttpRequest, HttpResponse};

use cs_core::repositories::UserRepository;
use cs_shared::types::ApiResponse;

use crate::dto::auth_dto::UserDto;
use crate::handlers::error_handler::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/auth/me
///
/// Returns the public projection of the authenticated user.
pub async fn me<U>(
    state: web::Data<AppState<U>>,
    req: HttpRequest,
    ctx: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    match state.session.current_user(ctx.user_id).await {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::success(UserDto::from(user))),
        Err(error) => handle_domain_error(error, req.path()),
    }
}
