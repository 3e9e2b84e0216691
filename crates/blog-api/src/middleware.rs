//! rusty-blog/crates/blog-api/src/middleware.rs
//!
//! Standard middleware for logging and cross-origin traffic.

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;

// Returns the standard request logger for the blog API.
pub fn standard_middleware() -> Logger {
    // The 'default' logger outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

// Configures CORS (Cross-Origin Resource Sharing).
// The SPA frontend is typically served from a different origin during
// development, and it reads the login token out of the Authorization
// response header.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_header()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .expose_headers(vec![header::AUTHORIZATION])
        .max_age(3600)
}
