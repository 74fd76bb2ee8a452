//! Integration tests for the CSV export endpoints.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{body_json, body_text, get_auth, post_json_auth};
use sqlx::PgPool;

async fn create_agreement(pool: &PgPool, token: &str, name: &str) -> String {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": name });
    let response = post_json_auth(app, "/api/v1/agreements", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["slug"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Two commitments export as a header plus two data rows, served as a CSV
/// attachment.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commitment_export(pool: PgPool) {
    let token = common::auth_token(&pool, "exporter", "staff").await;
    let slug = create_agreement(&pool, &token, "Export Pact").await;

    for name in ["Water, clean", "Roads"] {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "name": name });
        let response = post_json_auth(
            app,
            &format!("/api/v1/agreements/{slug}/commitments"),
            body,
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/agreements/{slug}/commitments/export"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response.headers()[CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"lastmile_"));
    assert!(disposition.ends_with(".csv\""));

    let body = body_text(response).await;
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one line per commitment");
    assert!(lines[0].starts_with("name,category,description,status"));
    // The comma in the name forces RFC 4180 quoting.
    assert!(body.contains("\"Water, clean\""));
    assert!(body.contains("Not Started"));
}

/// Action export resolves commitment and actor names into cells.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_action_export(pool: PgPool) {
    let token = common::auth_token(&pool, "exporter2", "staff").await;
    let slug = create_agreement(&pool, &token, "Action Export Pact").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": "Build school" });
    let response = post_json_auth(
        app,
        &format!("/api/v1/agreements/{slug}/commitments"),
        body,
        &token,
    )
    .await;
    let commitment_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": "Ministry of Education" });
    let response = post_json_auth(
        app,
        &format!("/api/v1/agreements/{slug}/actors"),
        body,
        &token,
    )
    .await;
    let actor_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "name": "Pour foundation",
        "commitment_id": commitment_id,
        "responsible_party_ids": [actor_id]
    });
    let response = post_json_auth(
        app,
        &format!("/api/v1/agreements/{slug}/actions"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/agreements/{slug}/actions/export"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("Pour foundation"));
    assert!(lines[1].contains("Build school"));
    assert!(lines[1].contains("Ministry of Education"));
}
