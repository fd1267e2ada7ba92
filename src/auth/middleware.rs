use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{error::ErrorUnauthorized, http::header, Error, HttpMessage};
use futures::future::LocalBoxFuture;

use crate::auth::config::JwtConfig;
use crate::auth::jwt::verify_token;

#[derive(Clone)]
pub struct AuthLayer {
    jwt_cfg: JwtConfig,
}

impl AuthLayer {
    pub fn new(jwt_cfg: JwtConfig) -> Self {
        Self { jwt_cfg }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
            inner: self.clone(),
        }))
    }
}

pub struct AuthMiddleware<S> {
    service: Rc<S>,
    inner: AuthLayer,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Bypass only '/' and '/health'
        if req.path() == "/" || req.path() == "/health" {
            return Box::pin(self.service.call(req));
        }

        let token_opt = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string());
        let token = match token_opt {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Box::pin(async {
                    Err(ErrorUnauthorized("missing or invalid auth header"))
                })
            }
        };
        let inner = self.inner.clone();
        let srv = self.service.clone();
        Box::pin(async move {
            match verify_token(&token, &inner.jwt_cfg) {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                    srv.call(req).await
                }
                Err(_) => Err(ErrorUnauthorized("unauthorized")),
            }
        })
    }
}
