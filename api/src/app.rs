//! Application factory
//!
//! Builds the actix-web application with all routes, middleware and
//! shared state wired in. Used by both the server binary and the HTTP
//! integration tests.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use cs_core::domain::entities::user::Role;
use cs_core::repositories::UserRepository;
use cs_shared::types::ErrorEnvelope;

use crate::middleware::auth::IdentityVerifier;
use crate::middleware::{cors::create_cors, RequireAuth, RequireRole};
use crate::routes::auth::{login::login, logout::logout, me::me, refresh::refresh};
use crate::routes::{admin, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<U>(
    state: web::Data<AppState<U>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
{
    // The guard sees the session service only through the object-safe
    // verifier, so the middleware itself stays non-generic.
    let verifier: Arc<dyn IdentityVerifier> = state.session.clone();

    let cors = create_cors();

    App::new()
        .app_data(state.clone())
        .app_data(web::Data::from(verifier))
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(login::<U>))
                        .route("/refresh", web::post().to(refresh::<U>))
                        .route("/logout", web::post().to(logout::<U>).wrap(RequireAuth))
                        .route("/me", web::get().to(me::<U>).wrap(RequireAuth)),
                )
                .service(
                    web::scope("/admin")
                        // RequireAuth wraps RequireRole, so the context
                        // is attached before the gate inspects it
                        .wrap(RequireRole::new([Role::SuperAdmin]))
                        .wrap(RequireAuth)
                        .route("/users", web::get().to(admin::list_users::<U>)),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "cityscout-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found(req: actix_web::HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorEnvelope::new(
        "NOT_FOUND",
        "The requested resource was not found",
        req.path(),
    ))
}
