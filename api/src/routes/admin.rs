//! Admin portal routes, gated to `super_admin`.

use actix_web::{web, HttpRequest, HttpResponse};

use cs_core::repositories::UserRepository;
use cs_shared::types::ApiResponse;

use crate::dto::auth_dto::UserDto;
use crate::handlers::error_handler::handle_domain_error;

use super::AppState;

/// Handler for GET /api/v1/admin/users
///
/// Lists every account as its public projection. Secrets never leave
/// the repository layer.
pub async fn list_users<U>(state: web::Data<AppState<U>>, req: HttpRequest) -> HttpResponse
where
    U: UserRepository + 'static,
{
    match state.users.find_all().await {
        Ok(users) => {
            let users: Vec<UserDto> = users.into_iter().map(|u| UserDto::from(u.public())).collect();
            HttpResponse::Ok().json(ApiResponse::success(users))
        }
        Err(error) => handle_domain_error(error, req.path()),
    }
}
