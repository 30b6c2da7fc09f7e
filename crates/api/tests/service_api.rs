//! HTTP-level integration tests for `/api/services`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, post_json_auth, put_json_auth, seed_admin_and_login};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn seeded_services_are_listed_in_order(pool: PgPool) {
    let test = common::build_test_app(pool);

    let json = body_json(get(test.app(), "/api/services").await).await;
    let services = json.as_array().unwrap();
    assert_eq!(services.len(), 4);

    let orders: Vec<i64> = services.iter().map(|s| s["order"].as_i64().unwrap()).collect();
    let mut sorted = orders.clone();
    sorted.sort();
    assert_eq!(orders, sorted);
    assert!(services[0]["features"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_update_and_active_filter(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = seed_admin_and_login(&pool, test.app()).await;

    let response = post_json_auth(
        test.app(),
        "/api/services",
        json!({
            "title": "Drone Footage",
            "description": "Aerial cinematography",
            "icon": "drone",
            "features": ["4K", "FAA licensed"],
            "is_active": false,
            "order": 9,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["features"], json!(["4K", "FAA licensed"]));
    assert_eq!(created["is_active"], false);
    let id = created["id"].as_str().unwrap().to_string();

    let all = body_json(get(test.app(), "/api/services").await).await;
    assert_eq!(all.as_array().unwrap().len(), 5);
    let active = body_json(get(test.app(), "/api/services?active=1").await).await;
    assert_eq!(active.as_array().unwrap().len(), 4);

    let response = put_json_auth(
        test.app(),
        &format!("/api/services/{id}"),
        json!({ "is_active": true, "features": ["8K"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["features"], json!(["8K"]));
    assert_eq!(updated["title"], "Drone Footage");

    let active = body_json(get(test.app(), "/api/services?active=1").await).await;
    assert_eq!(active.as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validates_fields(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = seed_admin_and_login(&pool, test.app()).await;

    let response = post_json_auth(
        test.app(),
        "/api/services",
        json!({ "title": "", "icon": "x".repeat(51) }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    for field in ["title", "description", "icon"] {
        assert!(json["fields"][field].is_array(), "missing error for {field}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_hides_service(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = seed_admin_and_login(&pool, test.app()).await;

    let services = body_json(get(test.app(), "/api/services").await).await;
    let id = services[0]["id"].as_str().unwrap().to_string();

    let response = delete_auth(test.app(), &format!("/api/services/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Service deleted successfully"
    );

    let response = get(test.app(), &format!("/api/services/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let services = body_json(get(test.app(), "/api/services").await).await;
    assert_eq!(services.as_array().unwrap().len(), 3);
}
