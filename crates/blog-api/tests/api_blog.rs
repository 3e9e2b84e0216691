//! End-to-end tests for the blog API: registration, login, the auth gate,
//! and the post lifecycle, running against a throwaway SQLite file and a
//! temp upload directory.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use blog_api::handlers::AppState;
use blog_auth_jwt::{Argon2CredentialHasher, JwtTokenService};
use blog_core::traits::TokenService;
use blog_db_sqlite::SqliteBlogRepo;
use blog_storage_local::LocalMediaStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret";
const BOUNDARY: &str = "----rustyblogtestboundary";

async fn test_state(dir: &TempDir) -> web::Data<AppState> {
    let url = format!("sqlite:{}/api-test.db", dir.path().display());
    let repo = Arc::new(SqliteBlogRepo::new(&url).await.expect("sqlite init"));
    web::Data::new(AppState {
        posts: repo.clone(),
        users: repo,
        store: Arc::new(LocalMediaStore::new(
            dir.path().join("uploads"),
            "/uploads".to_string(),
        )),
        tokens: Arc::new(JwtTokenService::new(TEST_SECRET, chrono::Duration::hours(1))),
        hasher: Arc::new(Argon2CredentialHasher),
    })
}

/// Builds a multipart/form-data body out of text fields plus an optional file
/// part, returning (content-type, body).
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(blog_api::configure_routes),
        )
        .await
    };
}

macro_rules! register {
    ($app:expr, $username:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({ "username": $username, "password": $password }))
            .to_request();
        test::call_service(&$app, req).await
    }};
}

macro_rules! login {
    ($app:expr, $username:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "username": $username, "password": $password }))
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn register_then_login_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    let resp = register!(app, "alice", "hunter2");
    assert_eq!(resp.status(), StatusCode::OK);
    let user: Value = test::read_body_json(resp).await;
    let user_id = user["id"].as_str().expect("id in response").to_string();
    assert_eq!(user["username"], "alice");
    // The stored hash must never appear in a response payload.
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());

    let resp = login!(app, "alice", "hunter2");
    assert_eq!(resp.status(), StatusCode::OK);
    let header_token = resp
        .headers()
        .get("Authorization")
        .expect("Authorization response header")
        .to_str()
        .unwrap()
        .to_string();
    let body_token = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert_eq!(header_token, body_token);

    let verifier = JwtTokenService::new(TEST_SECRET, chrono::Duration::hours(1));
    let verified = verifier.verify(&body_token).expect("token should verify");
    assert_eq!(verified.to_string(), user_id);
}

#[actix_web::test]
async fn duplicate_username_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    assert_eq!(register!(app, "alice", "one").status(), StatusCode::OK);
    assert_eq!(
        register!(app, "alice", "two").status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn login_failures_are_authentication_errors() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    assert_eq!(
        login!(app, "nobody", "whatever").status(),
        StatusCode::BAD_REQUEST
    );

    register!(app, "bob", "correct horse");
    assert_eq!(
        login!(app, "bob", "wrong horse").status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn list_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/blogs").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Value = test::read_body_json(resp).await;
    assert_eq!(posts, json!([]));
}

#[actix_web::test]
async fn writes_require_a_token() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    let (content_type, body) = multipart_body(&[("title", "A"), ("content", "B")], None);
    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn foreign_signed_token_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    let foreign = JwtTokenService::new("some-other-secret", chrono::Duration::hours(1));
    let token = foreign.issue(Uuid::now_v7()).unwrap();

    let (content_type, body) = multipart_body(&[("title", "A"), ("content", "B")], None);
    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header(("content-type", content_type))
        .insert_header(("Authorization", token))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn post_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    register!(app, "carol", "pw");
    let resp = login!(app, "carol", "pw");
    let token = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    // Create with a photo.
    let (content_type, body) = multipart_body(
        &[("title", "A"), ("content", "B")],
        Some(("photo", "cat.png", b"png bytes")),
    );
    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header(("content-type", content_type))
        .insert_header(("Authorization", token.clone()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().expect("non-null id").to_string();
    assert!(created["createdAt"].is_string());
    let photo = created["photo"].as_str().expect("photo ref").to_string();
    assert!(photo.starts_with("/uploads/"));

    // Create without a photo.
    let (content_type, body) = multipart_body(&[("title", "C"), ("content", "D")], None);
    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header(("content-type", content_type))
        .insert_header(("Authorization", token.clone()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let second: Value = test::read_body_json(resp).await;
    assert!(second["photo"].is_null());
    assert_ne!(second["id"], created["id"]);

    let req = test::TestRequest::get().uri("/blogs").to_request();
    let posts: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(posts.as_array().unwrap().len(), 2);

    // Update with no photo field retains the stored reference. A Bearer
    // prefix on the token is tolerated.
    let (content_type, body) = multipart_body(&[("title", "A2"), ("content", "B2")], None);
    let req = test::TestRequest::put()
        .uri(&format!("/blogs/{id}"))
        .insert_header(("content-type", content_type))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "A2");
    assert_eq!(updated["photo"], photo.as_str());

    // Delete, then confirm it is gone.
    let req = test::TestRequest::delete()
        .uri(&format!("/blogs/{id}"))
        .insert_header(("Authorization", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = test::read_body_json(resp).await;
    assert_eq!(ack["message"], "Blog deleted");

    let req = test::TestRequest::get().uri("/blogs").to_request();
    let posts: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let remaining: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert!(!remaining.contains(&id.as_str()));

    // Unknown ids are a 404, for update and delete alike.
    let (content_type, body) = multipart_body(&[("title", "X"), ("content", "Y")], None);
    let req = test::TestRequest::put()
        .uri(&format!("/blogs/{id}"))
        .insert_header(("content-type", content_type))
        .insert_header(("Authorization", token.clone()))
        .set_payload(body)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
    let req = test::TestRequest::delete()
        .uri(&format!("/blogs/{id}"))
        .insert_header(("Authorization", token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn update_can_pass_photo_ref_through() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    register!(app, "dave", "pw");
    let resp = login!(app, "dave", "pw");
    let token = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    let (content_type, body) = multipart_body(&[("title", "T"), ("content", "C")], None);
    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header(("content-type", content_type))
        .insert_header(("Authorization", token.clone()))
        .set_payload(body)
        .to_request();
    let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = created["id"].as_str().unwrap().to_string();

    // The client can echo an existing reference back as a text field.
    let (content_type, body) = multipart_body(
        &[("title", "T"), ("content", "C"), ("photo", "/uploads/kept.png")],
        None,
    );
    let req = test::TestRequest::put()
        .uri(&format!("/blogs/{id}"))
        .insert_header(("content-type", content_type))
        .insert_header(("Authorization", token))
        .set_payload(body)
        .to_request();
    let updated: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(updated["photo"], "/uploads/kept.png");
}

#[actix_web::test]
async fn missing_title_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let app = test_app!(state);

    register!(app, "erin", "pw");
    let resp = login!(app, "erin", "pw");
    let token = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    let (content_type, body) = multipart_body(&[("content", "body only")], None);
    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header(("content-type", content_type))
        .insert_header(("Authorization", token))
        .set_payload(body)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}
