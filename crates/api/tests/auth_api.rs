//! HTTP-level integration tests for admin authentication.
//!
//! Covers login, `me`, logout revocation, and rejection of missing or bad
//! tokens on protected routes.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_admin, get, get_auth, login, post_auth, post_json, seed_admin_and_login,
    ADMIN_EMAIL, ADMIN_PASSWORD,
};
use enki_api::bootstrap::{ensure_admin, AdminSeed};
use enki_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_success_returns_token_and_user(pool: PgPool) {
    create_admin(&pool, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let test = common::build_test_app(pool);

    let response = post_json(
        test.app(),
        "/api/auth/login",
        json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
    assert!(
        json["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_email_is_case_insensitive(pool: PgPool) {
    create_admin(&pool, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let test = common::build_test_app(pool);

    let response = post_json(
        test.app(),
        "/api/auth/login",
        json!({ "email": ADMIN_EMAIL.to_uppercase(), "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_wrong_password_returns_401(pool: PgPool) {
    create_admin(&pool, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let test = common::build_test_app(pool);

    let response = post_json(
        test.app(),
        "/api/auth/login",
        json!({ "email": ADMIN_EMAIL, "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_unknown_email_returns_401(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = post_json(
        test.app(),
        "/api/auth/login",
        json!({ "email": "nobody@enkimedia.test", "password": "whatever-123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_missing_fields_returns_422(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = post_json(test.app(), "/api/auth/login", json!({ "email": "not-an-email" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert!(json["fields"]["email"].is_array());
    assert!(json["fields"]["password"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_current_admin(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = seed_admin_and_login(&pool, test.app()).await;

    let response = get_auth(test.app(), "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], ADMIN_EMAIL);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_records_last_login(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    seed_admin_and_login(&pool, test.app()).await;

    let user = UserRepo::find_by_email(&pool, ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert!(user.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_without_token_returns_401(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get(test.app(), "/api/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(test.app(), "/api/messages").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_returns_401(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get_auth(test.app(), "/api/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_only_the_presented_token(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let first = seed_admin_and_login(&pool, test.app()).await;
    let second = login(test.app(), ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = post_auth(test.app(), "/api/auth/logout", &first).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Logged out successfully");

    let revoked = get_auth(test.app(), "/api/auth/me", &first).await;
    assert_eq!(revoked.status(), StatusCode::UNAUTHORIZED);

    let still_live = get_auth(test.app(), "/api/auth/me", &second).await;
    assert_eq!(still_live.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn seed(password: &str) -> AdminSeed {
    AdminSeed {
        email: " Owner@EnkiMedia.test ".to_string(),
        password: password.to_string(),
        name: "Owner".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ensure_admin_creates_first_account_once(pool: PgPool) {
    assert!(ensure_admin(&pool, &seed("long-enough-pass")).await.unwrap());
    assert!(!ensure_admin(&pool, &seed("long-enough-pass")).await.unwrap());
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 1);

    let test = common::build_test_app(pool);
    let token = login(test.app(), "owner@enkimedia.test", "long-enough-pass").await;
    assert!(!token.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ensure_admin_rejects_weak_password(pool: PgPool) {
    assert!(ensure_admin(&pool, &seed("short")).await.is_err());
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 0);
}
