use crate::auth::principal::Principal;
use actix_web::dev::Payload;
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

pub struct PrincipalExtractor(pub Principal);

impl FromRequest for PrincipalExtractor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(p) = req.extensions().get::<Principal>() {
            return ready(Ok(PrincipalExtractor(p.clone())));
        }
        ready(Err(ErrorUnauthorized("missing principal")))
    }
}

pub struct ClientPrincipal {
    pub customer_id: i32,
}

impl FromRequest for ClientPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(p) = req.extensions().get::<Principal>() {
            if let Principal::Client { customer_id } = p {
                return ready(Ok(ClientPrincipal {
                    customer_id: *customer_id,
                }));
            }
            return ready(Err(actix_web::error::ErrorForbidden(
                "client role required",
            )));
        }
        ready(Err(ErrorUnauthorized("missing principal")))
    }
}

pub struct AdminPrincipal;

impl FromRequest for AdminPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(p) = req.extensions().get::<Principal>() {
            if p.is_admin() {
                return ready(Ok(AdminPrincipal));
            }
            return ready(Err(actix_web::error::ErrorForbidden("admin role required")));
        }
        ready(Err(ErrorUnauthorized("missing principal")))
    }
}
