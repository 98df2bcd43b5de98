use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::{ErrorBody, NO_ENDPOINT_MESSAGE, UPSTREAM_FAILURE_MESSAGE};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("{}", NO_ENDPOINT_MESSAGE)]
    MissingEndpoint,

    /// Cause is logged where it happens, clients only get the generic message
    #[error("{}", UPSTREAM_FAILURE_MESSAGE)]
    Upstream,
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingEndpoint => StatusCode::BAD_REQUEST,
            ProxyError::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}
