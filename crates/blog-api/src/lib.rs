//! # blog-api
//!
//! The web routing and orchestration layer for rusty-blog.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the routes for the blog API.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/), and to
/// register the static mounts and SPA fallback after it.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            // Post lifecycle
            .route("/blogs", web::get().to(handlers::list_posts))
            .route("/blogs", web::post().to(handlers::create_post))
            .route("/blogs/{id}", web::put().to(handlers::update_post))
            .route("/blogs/{id}", web::delete().to(handlers::delete_post))
            // Authentication
            .route("/register", web::post().to(handlers::register))
            .route("/login", web::post().to(handlers::login)),
    );
}
