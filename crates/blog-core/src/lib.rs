//! rusty-blog/crates/blog-core/src/lib.rs
//!
//! The central domain logic and interface definitions for rusty-blog.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_post_creation_v7() {
        let id = Uuid::now_v7();
        let post = Post {
            id,
            title: "Hello".to_string(),
            content: "First post".to_string(),
            photo: None,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(post.id, id);
        assert!(post.photo.is_none());
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = Post {
            id: Uuid::now_v7(),
            title: "A".to_string(),
            content: "B".to_string(),
            photo: Some("/uploads/x.png".to_string()),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["photo"], "/uploads/x.png");
    }
}
