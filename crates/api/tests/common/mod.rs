#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use enki_api::auth::jwt::JwtConfig;
use enki_api::auth::password::hash_password;
use enki_api::config::ServerConfig;
use enki_api::router::build_app_router;
use enki_api::state::AppState;
use enki_db::models::user::CreateAdminUser;
use enki_db::repositories::UserRepo;
use enki_events::ContactNotifier;

pub const ADMIN_EMAIL: &str = "admin@enkimedia.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults and uploads under `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        upload_dir: upload_dir.to_path_buf(),
        public_storage_path: "/storage".to_string(),
        max_upload_bytes: 1024 * 1024,
        admin_email: None,
        admin_panel_url: "http://localhost:3000/admin".to_string(),
    }
}

/// The application router plus the temporary upload area it writes to.
pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    /// A fresh handle on the router (each request consumes one).
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Filesystem path behind a public `/storage/...` URL.
    pub fn stored_path(&self, public_url: &str) -> std::path::PathBuf {
        let relative = public_url
            .strip_prefix("/storage/")
            .expect("thumbnail URL should live under /storage");
        self.uploads.path().join(relative)
    }
}

/// Build the full application router, exactly as `main.rs` does, with
/// notifications disabled.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with_notifier(pool, ContactNotifier::disabled())
}

pub fn build_test_app_with_notifier(pool: PgPool, notifier: ContactNotifier) -> TestApp {
    let uploads = tempfile::tempdir().expect("temp upload dir");
    let config = test_config(uploads.path());
    let state = AppState::new(pool, config.clone(), notifier);
    TestApp {
        router: build_app_router(state, &config),
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// POST a body verbatim with a JSON content type, for malformed payloads.
pub async fn post_raw_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, None, Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "enki-test-boundary";

/// A file part for [`multipart_auth`].
pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

/// Send a `multipart/form-data` request with text fields and optional file.
pub async fn multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
    token: &str,
) -> Response<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::new(4, 4);
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Insert an admin account directly in the database.
pub async fn create_admin(pool: &PgPool, email: &str, password: &str) {
    let password_hash = hash_password(password).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateAdminUser {
            name: "Test Admin".to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await
    .expect("admin creation should succeed");
}

/// Log in via the API and return the bearer token.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .expect("login response must contain a token")
        .to_string()
}

/// Create the default admin and log in as them.
pub async fn seed_admin_and_login(pool: &PgPool, app: Router) -> String {
    create_admin(pool, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}
