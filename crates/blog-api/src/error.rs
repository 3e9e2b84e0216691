//! HTTP mapping for `AppError`.
//!
//! Every error crosses the request boundary exactly once, here; nothing is
//! retried and nothing is fatal to the process.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use blog_core::error::AppError;
use serde_json::json;
use std::fmt;

/// Newtype so the web crate can implement `ResponseError` for the
/// framework-agnostic `AppError`.
pub struct ApiError(pub AppError);

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = &self.0 {
            log::error!("internal error: {detail}");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
