//! # blog-storage-local
//!
//! Local filesystem implementation of `MediaStore`. Uploads land under a
//! single root directory with a request-time-unique name (UUID v7 plus the
//! original file extension), so concurrent requests can never collide.

use async_trait::async_trait;
use blog_core::error::{AppError, Result};
use blog_core::traits::MediaStore;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/uploads")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix,
        }
    }

    /// Carries over the original extension so served files keep a usable
    /// content type; the rest of the name is freshly generated.
    fn unique_filename(original_name: &str) -> String {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        format!("{}{ext}", Uuid::now_v7())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save_upload(&self, data: Vec<u8>, original_name: &str) -> Result<String> {
        let filename = Self::unique_filename(original_name);

        fs::create_dir_all(&self.root_path)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;
        fs::write(self.root_path.join(&filename), &data)
            .await
            .map_err(|e| AppError::Internal(format!("failed to store upload: {e}")))?;

        Ok(format!(
            "{}/{filename}",
            self.url_prefix.trim_end_matches('/')
        ))
    }
}
