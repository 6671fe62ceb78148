//! Access control middleware for the dealership server.
//! This middleware can be placed on any route or service.
//!
//! It validates the `Authorization: Bearer` credential on the incoming request, stores the
//! decoded claims in the request extensions for handlers to extract, and then checks the claimed
//! role against the roles allowed on the route. A request with no valid credential gets a 401; a
//! valid credential with a role outside the allowed set gets a 403.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    web,
    Error,
    HttpMessage,
};
use dealership_engine::db_types::Role;
use futures::{
    future::{ok, Ready},
    Future,
};
use log::debug;

use crate::{
    auth::TokenIssuer,
    errors::{AuthError, ServerError},
};

pub struct AclMiddlewareFactory {
    /// Roles allowed through. An empty list means any authenticated user.
    allowed_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed_roles: &[Role]) -> Self {
        AclMiddlewareFactory { allowed_roles: allowed_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { allowed_roles: self.allowed_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    allowed_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed_roles = self.allowed_roles.clone();
        Box::pin(async move {
            let issuer = req
                .app_data::<web::Data<TokenIssuer>>()
                .ok_or_else(|| {
                    log::warn!("No TokenIssuer found in app data");
                    ErrorInternalServerError("No TokenIssuer found in app data")
                })?
                .clone();
            let token = bearer_token(&req).ok_or(ServerError::AuthenticationError(AuthError::MissingToken))?;
            let claims = issuer.verify(&token).map_err(|e| {
                debug!("💻️ Credential rejected. {e}");
                ServerError::AuthenticationError(e)
            })?;
            if !allowed_roles.is_empty() && !allowed_roles.contains(&claims.role) {
                debug!("💻️ Role '{}' is not allowed on this route", claims.role);
                return Err(ServerError::AuthenticationError(AuthError::InsufficientRole).into());
            }
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|t| t.to_string())
}
