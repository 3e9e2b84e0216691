//! # blog-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `blog-core` domain models. One pool-holding adapter serves both the
//! post and user ports; the schema is bootstrapped on construction.

use async_trait::async_trait;
use blog_core::error::{AppError, Result};
use blog_core::models::{Post, User};
use blog_core::traits::{PostRepo, UserRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

const CREATE_POSTS: &str = "
CREATE TABLE IF NOT EXISTS posts (
    id         BLOB PRIMARY KEY,
    title      TEXT NOT NULL,
    content    TEXT NOT NULL,
    photo      TEXT,
    created_at TEXT NOT NULL
)";

const CREATE_USERS: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            BLOB PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
)";

pub struct SqliteBlogRepo {
    pool: SqlitePool,
}

// Helper for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Result<Uuid> {
    Uuid::from_slice(blob).map_err(|e| AppError::Internal(format!("corrupt id column: {e}")))
}

fn map_db_err(e: sqlx::Error) -> AppError {
    AppError::Internal(format!("database error: {e}"))
}

fn row_to_post(row: &SqliteRow) -> Result<Post> {
    Ok(Post {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice())?,
        title: row.get("title"),
        content: row.get("content"),
        photo: row.get("photo"),
        created_at: row.get("created_at"),
    })
}

impl SqliteBlogRepo {
    /// Connects to the given SQLite URL (creating the file if missing) and
    /// ensures the posts/users tables exist.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(map_db_err)?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.map_err(map_db_err)?;

        sqlx::query(CREATE_POSTS).execute(&pool).await.map_err(map_db_err)?;
        sqlx::query(CREATE_USERS).execute(&pool).await.map_err(map_db_err)?;
        log::debug!("sqlite schema ready at {url}");

        Ok(Self { pool })
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT id, title, content, photo, created_at FROM posts WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(|row| row_to_post(&row)).transpose()
    }
}

#[async_trait]
impl PostRepo for SqliteBlogRepo {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query("SELECT id, title, content, photo, created_at FROM posts")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.iter().map(row_to_post).collect()
    }

    async fn create_post(&self, post: Post) -> Result<()> {
        sqlx::query("INSERT INTO posts (id, title, content, photo, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(uuid_to_blob(post.id))
            .bind(post.title)
            .bind(post.content)
            .bind(post.photo)
            .bind(post.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Last write wins; no version field, no existence lock between the read
    /// and the write.
    async fn update_post(
        &self,
        id: Uuid,
        title: String,
        content: String,
        photo: Option<String>,
    ) -> Result<Option<Post>> {
        let existing = match self.get_post(id).await? {
            Some(post) => post,
            None => return Ok(None),
        };

        // Omission retains the stored photo reference.
        let photo = photo.or(existing.photo);

        sqlx::query("UPDATE posts SET title = ?, content = ?, photo = ? WHERE id = ?")
            .bind(&title)
            .bind(&content)
            .bind(&photo)
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(Some(Post {
            id,
            title,
            content,
            photo,
            created_at: existing.created_at,
        }))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepo for SqliteBlogRepo {
    async fn create_user(&self, user: User) -> Result<User> {
        sqlx::query("INSERT INTO users (id, username, password_hash) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(user.id))
            .bind(&user.username)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db)
                    if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
                {
                    AppError::ValidationError(format!(
                        "username '{}' is already taken",
                        user.username
                    ))
                }
                _ => map_db_err(e),
            })?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(|row| {
            Ok(User {
                id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice())?,
                username: row.get("username"),
                password_hash: row.get("password_hash"),
            })
        })
        .transpose()
    }
}
