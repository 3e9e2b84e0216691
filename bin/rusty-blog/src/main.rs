//! # rusty-blog Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod config;

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use blog_api::handlers::AppState;
use config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;

// Feature-gated imports: This is the "Compiled-to-Order" magic
#[cfg(feature = "db-sqlite")]
use blog_db_sqlite::SqliteBlogRepo;

#[cfg(feature = "storage-local")]
use blog_storage_local::LocalMediaStore;

#[cfg(feature = "auth-jwt")]
use blog_auth_jwt::{Argon2CredentialHasher, JwtTokenService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cfg = AppConfig::from_env()?;

    // 1. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let repo = Arc::new(SqliteBlogRepo::new(&cfg.database_url).await?);

    // 2. Initialize Storage Implementation
    #[cfg(feature = "storage-local")]
    let store = Arc::new(LocalMediaStore::new(
        PathBuf::from(&cfg.upload_dir),
        cfg.upload_url_prefix.clone(),
    ));

    // 3. Initialize Auth Implementation
    #[cfg(feature = "auth-jwt")]
    let tokens = Arc::new(JwtTokenService::new(
        &cfg.jwt_secret,
        chrono::Duration::hours(cfg.token_ttl_hours),
    ));
    #[cfg(feature = "auth-jwt")]
    let hasher = Arc::new(Argon2CredentialHasher);

    // 4. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState {
        posts: repo.clone(),
        users: repo,
        store,
        tokens,
        hasher,
    });

    let bind_addr = format!("{}:{}", cfg.host, cfg.port);
    log::info!("🚀 rusty-blog starting on http://{bind_addr}");

    HttpServer::new(move || {
        let spa_index: PathBuf = [cfg.frontend_dir.as_str(), "index.html"].iter().collect();

        App::new()
            .app_data(state.clone())
            .wrap(blog_api::middleware::cors_policy())
            .wrap(blog_api::middleware::standard_middleware())
            // The API routes win over the static mounts below.
            .configure(blog_api::configure_routes)
            // Uploaded photos, served read-only.
            .service(Files::new(&cfg.upload_url_prefix, &cfg.upload_dir))
            // The SPA bundle; any unmatched path falls back to its entry document.
            .service(
                Files::new("/", &cfg.frontend_dir)
                    .index_file("index.html")
                    .default_handler(fn_service(move |req: ServiceRequest| {
                        let spa_index = spa_index.clone();
                        async move {
                            let (req, _) = req.into_parts();
                            let file = NamedFile::open_async(&spa_index).await?;
                            let res = file.into_response(&req);
                            Ok(ServiceResponse::new(req, res))
                        }
                    })),
            )
    })
    .bind(bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
