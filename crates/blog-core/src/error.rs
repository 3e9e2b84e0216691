//! # AppError
//!
//! Centralized error handling for the rusty-blog ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all blog-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., unknown post id on update/delete)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., missing form field, duplicate username)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// No credential presented on a protected operation
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A credential was presented but its signature or payload is bad
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Login failure (unknown user or wrong password)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Infrastructure failure (e.g., DB down, upload directory unwritable)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for rusty-blog logic.
pub type Result<T> = std::result::Result<T, AppError>;
