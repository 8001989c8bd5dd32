//! Converts any fault raised while serving a resource request into the uniform
//! `500 {"message": "Internal server error"}` response, logging the cause on the way out.
//!
//! Handlers return `Result<HttpResponse, AppError>` and propagate with `?`; actix-web hands the
//! error to [`ResponseError::error_response`], so nothing escapes to the transport unlogged.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::types::StoreError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "Request failed");
        HttpResponse::InternalServerError().json(MessageBody::new(INTERNAL_ERROR_MESSAGE))
    }
}

/// Fallback for verbs a resource does not serve. Not a fault, so it is not logged as one.
pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    tracing::debug!(method = %req.method(), path = req.path(), "Method not allowed");
    HttpResponse::MethodNotAllowed()
        .json(MessageBody::new(format!("Method {} not allowed", req.method())))
}
