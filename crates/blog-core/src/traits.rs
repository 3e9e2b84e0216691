//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use crate::error::Result;
use crate::models::{Post, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Data persistence contract for blog posts.
#[async_trait]
pub trait PostRepo: Send + Sync {
    /// Natural storage order, no pagination.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// The caller assigns `id` and `created_at` before persisting.
    async fn create_post(&self, post: Post) -> Result<()>;

    /// Replaces title and content. A `photo` of `None` retains the stored
    /// reference; omission never clears a photo. Returns `None` for an
    /// unknown id.
    async fn update_post(
        &self,
        id: Uuid,
        title: String,
        content: String,
        photo: Option<String>,
    ) -> Result<Option<Post>>;

    /// Returns `false` for an unknown id.
    async fn delete_post(&self, id: Uuid) -> Result<bool>;
}

/// Data persistence contract for user credentials.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Persists a new user. A duplicate username surfaces as a
    /// `ValidationError`.
    async fn create_user(&self, user: User) -> Result<User>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Media storage contract for photo uploads.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes under a request-time-unique name and returns the
    /// public reference stored on the post.
    async fn save_upload(&self, data: Vec<u8>, original_name: &str) -> Result<String>;
}

/// Issues and verifies the signed identity tokens handed out at login.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<String>;

    /// Fails with `InvalidToken` on a bad signature, malformed or expired
    /// payload, or a subject that is not a user id.
    fn verify(&self, token: &str) -> Result<Uuid>;
}

/// One-way password hashing used at registration and login.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool>;
}
