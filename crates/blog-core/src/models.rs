//! # Domain Models
//!
//! These structs represent the core entities of rusty-blog.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single blog entry, optionally carrying a reference to an uploaded photo.
///
/// Serialized in camelCase to match the public JSON API (`createdAt`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Public path of the stored upload (e.g., "/uploads/<name>"); None when
    /// the post has no photo.
    pub photo: Option<String>,
    /// Set exactly once at creation, never changed by updates.
    pub created_at: DateTime<Utc>,
}

/// A registered author.
///
/// Deliberately not serializable: the password hash must never cross the
/// process boundary. API layers expose their own response types.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// PHC-formatted one-way hash (salt embedded); the plaintext is never stored.
    pub password_hash: String,
}
