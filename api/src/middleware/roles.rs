//! Role gate for endpoints restricted beyond plain authentication.
//!
//! Runs after `RequireAuth`: a pure predicate over the attached
//! `AuthContext`. A missing context means the guard did not run, which
//! is rejected as unauthenticated rather than forbidden.

use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;

use cs_core::domain::entities::user::Role;

use crate::handlers::error_handler::error_response;
use crate::middleware::auth::AuthContext;

/// Role gate middleware factory, holding the set of permitted roles
pub struct RequireRole {
    allowed: Vec<Role>,
}

impl RequireRole {
    pub fn new(allowed: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed: allowed.into(),
        }
    }
}

fn permits(allowed: &[Role], role: Role) -> bool {
    allowed.contains(&role)
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: Rc::new(self.allowed.clone()),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<Vec<Role>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed = Rc::clone(&self.allowed);

        Box::pin(async move {
            let role = req.extensions().get::<AuthContext>().map(|ctx| ctx.role);

            match role {
                Some(role) if permits(&allowed, role) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Some(_) => Ok(reject(
                    req,
                    StatusCode::FORBIDDEN,
                    "INSUFFICIENT_PERMISSIONS",
                    "Insufficient permissions",
                )),
                None => Ok(reject(
                    req,
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required",
                )),
            }
        })
    }
}

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
