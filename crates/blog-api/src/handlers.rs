//! # blog-api Handlers
//!
//! This module coordinates the flow between HTTP requests and core traits.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use blog_core::error::AppError;
use blog_core::models::{Post, User};
use blog_core::traits::{CredentialHasher, MediaStore, PostRepo, TokenService, UserRepo};
use chrono::Utc;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthedUser;
use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub posts: Arc<dyn PostRepo>,
    pub users: Arc<dyn UserRepo>,
    pub store: Arc<dyn MediaStore>,
    pub tokens: Arc<dyn TokenService>,
    pub hasher: Arc<dyn CredentialHasher>,
}

/// Request body for /register and /login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// What registration returns. The stored hash never leaves the process.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

struct UploadedFile {
    filename: String,
    data: Vec<u8>,
}

/// The decoded multipart write request.
///
/// `photo_file` is a fresh upload; `photo_ref` is an already-stored reference
/// passed through as a plain text field (the update form sends the existing
/// path back when the photo is unchanged client-side).
#[derive(Default)]
struct PostForm {
    title: Option<String>,
    content: Option<String>,
    photo_file: Option<UploadedFile>,
    photo_ref: Option<String>,
}

async fn read_post_form(mut payload: Multipart) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| AppError::ValidationError(format!("malformed multipart request: {e}")))?;
        let name = field.name().to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(|f| f.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes = chunk.map_err(|e| {
                AppError::ValidationError(format!("failed reading field '{name}': {e}"))
            })?;
            data.extend_from_slice(&bytes);
        }

        match name.as_str() {
            "title" => form.title = Some(String::from_utf8_lossy(&data).into_owned()),
            "content" => form.content = Some(String::from_utf8_lossy(&data).into_owned()),
            "photo" => match filename {
                // Browsers send an empty file part when no photo was picked.
                Some(filename) if !data.is_empty() => {
                    form.photo_file = Some(UploadedFile { filename, data });
                }
                Some(_) => {}
                None if !data.is_empty() => {
                    form.photo_ref = Some(String::from_utf8_lossy(&data).into_owned());
                }
                None => {}
            },
            _ => {}
        }
    }

    Ok(form)
}

fn require_text_fields(form: &PostForm) -> Result<(String, String), AppError> {
    let title = form
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("title is required".to_string()))?;
    let content = form
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("content is required".to_string()))?;
    Ok((title.to_string(), content.to_string()))
}

/// GET /blogs — public, unordered, unpaginated.
pub async fn list_posts(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let posts = data.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /blogs — create a post, storing the photo first if one was sent.
pub async fn create_post(
    data: web::Data<AppState>,
    _user: AuthedUser,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = read_post_form(payload).await?;
    let (title, content) = require_text_fields(&form)?;

    let photo = match form.photo_file {
        Some(file) => Some(data.store.save_upload(file.data, &file.filename).await?),
        None => None,
    };

    let post = Post {
        id: Uuid::now_v7(),
        title,
        content,
        photo,
        created_at: Utc::now(),
    };
    data.posts.create_post(post.clone()).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// PUT /blogs/{id} — replace title/content; a missing photo field retains the
/// stored reference, a text photo field passes one through unchanged.
pub async fn update_post(
    data: web::Data<AppState>,
    _user: AuthedUser,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let form = read_post_form(payload).await?;
    let (title, content) = require_text_fields(&form)?;

    let photo = match form.photo_file {
        Some(file) => Some(data.store.save_upload(file.data, &file.filename).await?),
        None => form.photo_ref,
    };

    let updated = data
        .posts
        .update_post(id, title, content, photo)
        .await?
        .ok_or_else(|| AppError::NotFound("post".to_string(), id.to_string()))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /blogs/{id}
pub async fn delete_post(
    data: web::Data<AppState>,
    _user: AuthedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.posts.delete_post(id).await? {
        return Err(AppError::NotFound("post".to_string(), id.to_string()).into());
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Blog deleted" })))
}

/// POST /register — hash the password, persist the user, return the record
/// without the hash.
pub async fn register(
    data: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let creds = body.into_inner();
    if creds.username.trim().is_empty() {
        return Err(AppError::ValidationError("username is required".to_string()).into());
    }
    if creds.password.is_empty() {
        return Err(AppError::ValidationError("password is required".to_string()).into());
    }

    let password_hash = data.hasher.hash(&creds.password)?;
    let user = data
        .users
        .create_user(User {
            id: Uuid::now_v7(),
            username: creds.username,
            password_hash,
        })
        .await?;
    log::info!("registered user '{}'", user.username);

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// POST /login — verify credentials and issue a token, returned both as the
/// response body and in the Authorization header.
pub async fn login(
    data: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let creds = body.into_inner();

    let user = data
        .users
        .find_by_username(&creds.username)
        .await?
        .ok_or_else(|| AppError::Authentication("unknown user".to_string()))?;

    if !data.hasher.verify(&creds.password, &user.password_hash)? {
        return Err(AppError::Authentication("bad password".to_string()).into());
    }

    let token = data.tokens.issue(user.id)?;
    Ok(HttpResponse::Ok()
        .insert_header(("Authorization", token.clone()))
        .content_type("text/plain; charset=utf-8")
        .body(token))
}
