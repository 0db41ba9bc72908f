//! Authentication route handlers
//!
//! Login, token refresh, logout and the authenticated-user lookup.

use std::sync::Arc;

use cs_core::repositories::UserRepository;
use cs_core::services::session::SessionService;

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;

/// Shared application state injected into handlers
pub struct AppState<U: UserRepository> {
    /// Session manager for login, refresh, logout and identification
    pub session: Arc<SessionService<U>>,
    /// User repository, for endpoints that read accounts directly
    pub users: Arc<U>,
}

impl<U: UserRepository> AppState<U> {
    pub fn new(session: Arc<SessionService<U>>, users: Arc<U>) -> Self {
        Self { session, users }
    }
}
