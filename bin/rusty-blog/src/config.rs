//! Process configuration, loaded once at startup from the environment.
//!
//! Everything that used to be a global in deployments of this kind (signing
//! key, storage paths) lives here and is passed explicitly to the services
//! that need it.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: String,
    pub upload_url_prefix: String,
    pub frontend_dir: String,
    /// HS256 signing secret. Never logged, never sent to clients.
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = var_or("BLOG_PORT", "5000")
            .parse()
            .map_err(|e| anyhow::anyhow!("BLOG_PORT is not a valid port: {e}"))?;
        let token_ttl_hours = var_or("BLOG_TOKEN_TTL_HOURS", "24")
            .parse()
            .map_err(|e| anyhow::anyhow!("BLOG_TOKEN_TTL_HOURS is not a number: {e}"))?;

        let jwt_secret = match env::var("BLOG_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                log::warn!("BLOG_JWT_SECRET is not set; using an insecure development default");
                "insecure-dev-secret".to_string()
            }
        };

        Ok(Self {
            host: var_or("BLOG_HOST", "127.0.0.1"),
            port,
            database_url: var_or("BLOG_DATABASE_URL", "sqlite:blog.db"),
            upload_dir: var_or("BLOG_UPLOAD_DIR", "./data/uploads"),
            upload_url_prefix: var_or("BLOG_UPLOAD_URL_PREFIX", "/uploads"),
            frontend_dir: var_or("BLOG_FRONTEND_DIR", "./frontend/build"),
            jwt_secret,
            token_ttl_hours,
        })
    }
}
