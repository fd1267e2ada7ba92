use crate::db::RepositoryError;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{Error, HttpRequest, HttpResponse};

pub fn default_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    error!("Error in request: {} \n Error: {}", req.full_url(), err);
    actix_web::error::InternalError::from_response("", HttpResponse::BadRequest().finish()).into()
}

pub(crate) fn status_for(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound { .. } | RepositoryError::NotFoundBy { .. } => {
            StatusCode::NOT_FOUND
        }
        RepositoryError::BusinessRule(_) => StatusCode::BAD_REQUEST,
        RepositoryError::Conflict { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
