//! Request guard for protected endpoints.
//!
//! `RequireAuth` extracts the `Bearer` credential from the Authorization
//! header, resolves it through the session service, and injects an
//! immutable `AuthContext` into the request extensions. Handlers receive
//! the context as an extractor argument; there is no ambient mutable
//! authentication state.

use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    http::StatusCode,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::{BoxFuture, LocalBoxFuture};
use uuid::Uuid;

use cs_core::domain::value_objects::Identity;
use cs_core::domain::entities::user::Role;
use cs_core::errors::DomainResult;
use cs_core::repositories::UserRepository;
use cs_core::services::session::SessionService;

use crate::handlers::error_handler::{error_parts, error_response};

/// Authenticated user context injected into guarded requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Identity> for AuthContext {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.role,
        }
    }
}

/// Object-safe access-token verification, so the middleware does not
/// need to be generic over the repository type
pub trait IdentityVerifier: Send + Sync {
    fn identify<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, DomainResult<Identity>>;
}

impl<U: UserRepository + 'static> IdentityVerifier for SessionService<U> {
    fn identify<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, DomainResult<Identity>> {
        Box::pin(SessionService::identify(self, access_token))
    }
}

/// Authentication middleware factory
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Ok(reject(
                        req,
                        StatusCode::UNAUTHORIZED,
                        "UNAUTHORIZED",
                        "Authentication required",
                    ));
                }
            };

            let verifier = match req.app_data::<web::Data<dyn IdentityVerifier>>() {
                Some(verifier) => verifier.clone(),
                None => {
                    log::error!("identity verifier missing from app data");
                    return Ok(reject(
                        req,
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred",
                    ));
                }
            };

            match verifier.identify(&token).await {
                Ok(identity) => {
                    req.extensions_mut().insert(AuthContext::from(identity));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(error) => {
                    let (status, code) = error_parts(&error);
                    Ok(reject(req, status, code, &error.to_string()))
                }
            }
        })
    }
}

/// Short-circuit the request with an enveloped error response
fn reject<B>(
    req: ServiceRequest,
    status: StatusCode,
    code: &str,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let path = req.path().to_string();
    let (request, _) = req.into_parts();
    let response = error_response(status, code, message, &path).map_into_right_body();
    ServiceResponse::new(request, response)
}

/// Extracts the Bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
