//! The auth gate.
//!
//! `AuthedUser` is an extractor, so protected handlers simply take it as an
//! argument; extraction rejects the request before the handler body runs.
//! It is a pure gate: no side effects beyond admitting or refusing.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use blog_core::error::{AppError, Result};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::AppState;

/// The verified identity behind the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser(pub Uuid);

fn verify_request(req: &HttpRequest) -> Result<Uuid> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?;
    let raw = header
        .to_str()
        .map_err(|_| AppError::InvalidToken("Authorization header is not valid text".to_string()))?;

    // Clients send the bare token; a `Bearer ` prefix is tolerated but
    // not required.
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);

    state.tokens.verify(token)
}

impl FromRequest for AuthedUser {
    type Error = actix_web::Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            verify_request(req)
                .map(AuthedUser)
                .map_err(|e| ApiError(e).into()),
        )
    }
}
