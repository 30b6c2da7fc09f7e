//! HTTP-level integration tests for `/api/stats`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, seed_admin_and_login};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_site_reports_seeded_services_only(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get(test.app(), "/api/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total_projects"], 0);
    assert_eq!(json["total_services"], 4);
    assert_eq!(json["total_messages"], 0);
    assert_eq!(json["unread_messages"], 0);
    assert_eq!(json["recent_projects"], json!([]));
    assert_eq!(json["recent_messages"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn counts_and_recent_lists(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = seed_admin_and_login(&pool, test.app()).await;

    for i in 0..6 {
        let response = post_json_auth(
            test.app(),
            "/api/projects",
            json!({
                "title": format!("Project {i}"),
                "description": "d",
                "category": "commercial",
                "date": "2024-01-01",
            }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let mut message_ids = Vec::new();
    for name in ["Ann", "Ben", "Cat"] {
        let response = post_json(
            test.app(),
            "/api/contact",
            json!({ "name": name, "email": "x@example.com", "message": "Hi" }),
        )
        .await;
        let id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();
        message_ids.push(id);
    }
    get_auth(test.app(), &format!("/api/messages/{}", message_ids[0]), &token).await;

    let json = body_json(get(test.app(), "/api/stats").await).await;
    assert_eq!(json["total_projects"], 6);
    assert_eq!(json["total_messages"], 3);
    assert_eq!(json["unread_messages"], 2);
    assert_eq!(json["recent_projects"].as_array().unwrap().len(), 5);
    assert_eq!(json["recent_projects"][0]["title"], "Project 5");
    assert_eq!(json["recent_messages"][0]["name"], "Cat");
}
