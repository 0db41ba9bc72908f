use std::io;
use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::{info, warn};

use cs_api::app::create_app;
use cs_api::routes::AppState;
use cs_core::domain::entities::user::{Role, User};
use cs_core::repositories::UserRepository;
use cs_core::services::session::SessionService;
use cs_infra::{create_pool, MySqlUserRepository};
use cs_shared::config::{AppConfig, AuthConfig};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting CityScout API server");

    let config = AppConfig::from_env();

    if config.auth.access.is_using_default_secret() || config.auth.refresh.is_using_default_secret()
    {
        warn!("Token secrets are not configured; using development defaults");
    }

    let pool = create_pool(&config.database)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let users = Arc::new(MySqlUserRepository::new(pool));

    seed_admin(users.as_ref(), &config.auth)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let session = Arc::new(SessionService::new(users.clone(), &config.auth));
    let state = web::Data::new(AppState::new(session, users));

    let bind_address = config.server.bind_address();
    info!("Server listening on {}", bind_address);

    HttpServer::new(move || create_app(state.clone()))
        .bind(&bind_address)?
        .run()
        .await
}

/// Bootstrap a super_admin account from the environment
///
/// A fresh deployment has no way to log in otherwise. No-op when the
/// variables are unset or the account already exists.
async fn seed_admin(
    users: &MySqlUserRepository,
    auth: &AuthConfig,
) -> Result<(), cs_core::errors::DomainError> {
    let (email, password) = match (
        std::env::var("SEED_ADMIN_EMAIL"),
        std::env::var("SEED_ADMIN_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => (email, password),
        _ => return Ok(()),
    };

    if users.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let admin = User::new(email.as_str(), &password, Role::SuperAdmin, auth.bcrypt_cost)?;
    users.create(admin).await?;
    info!("Seeded super_admin account {}", email);

    Ok(())
}
