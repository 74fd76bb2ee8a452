//! Integration tests for agreement CRUD and tenant scoping.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

/// Create an agreement via the API and return its slug.
async fn create_agreement(pool: &PgPool, token: &str, name: &str) -> String {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": name });
    let response = post_json_auth(app, "/api/v1/agreements", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["slug"].as_str().unwrap().to_string()
}

/// Creating an agreement derives a unique slug from the name.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_agreement_derives_slug(pool: PgPool) {
    let token = common::auth_token(&pool, "creator", "staff").await;

    let slug = create_agreement(&pool, &token, "Ghana Mining Agreement").await;
    assert_eq!(slug, "ghana-mining-agreement");

    // Same name again gets a numbered slug.
    let slug2 = create_agreement(&pool, &token, "Ghana Mining Agreement").await;
    assert_eq!(slug2, "ghana-mining-agreement2");
}

/// A missing slug is a 404 with the standard JSON error shape, never a 500.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_slug_is_404_json(pool: PgPool) {
    let token = common::auth_token(&pool, "reader", "staff").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/agreements/no-such-agreement", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("no-such-agreement"));
}

/// Members see only agreements they are enrolled in; staff see all.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_scoping(pool: PgPool) {
    let staff_token = common::auth_token(&pool, "staffer", "staff").await;
    let slug = create_agreement(&pool, &staff_token, "Water Access Pact").await;
    create_agreement(&pool, &staff_token, "Roads Pact").await;

    let member = common::create_test_user(&pool, "enrolled", "member").await;
    let member_token = common::login_token(&pool, "enrolled").await;

    // Not enrolled yet: the agreement is forbidden.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/agreements/{slug}"), &member_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Enrol the member.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "user_id": member.id });
    let response = post_json_auth(
        app,
        &format!("/api/v1/agreements/{slug}/members"),
        body,
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Now the member can read it.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/agreements/{slug}"), &member_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // And their listing shows only the one enrolment.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/agreements", &member_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // Staff listing shows both.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/agreements", &staff_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

/// Members are read-only: writes to agreement content are forbidden.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_writes_forbidden(pool: PgPool) {
    let staff_token = common::auth_token(&pool, "writer", "staff").await;
    let slug = create_agreement(&pool, &staff_token, "Forest Pact").await;

    let member = common::create_test_user(&pool, "readonly", "member").await;
    let member_token = common::login_token(&pool, "readonly").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "user_id": member.id });
    post_json_auth(
        app,
        &format!("/api/v1/agreements/{slug}/members"),
        body,
        &staff_token,
    )
    .await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "name": "Plant trees" });
    let response = post_json_auth(
        app,
        &format!("/api/v1/agreements/{slug}/commitments"),
        body,
        &member_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Renaming an agreement recomputes its slug.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rename_recomputes_slug(pool: PgPool) {
    let token = common::auth_token(&pool, "renamer", "staff").await;
    let slug = create_agreement(&pool, &token, "Old Name").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "name": "New Name" });
    let response = put_json_auth(app, &format!("/api/v1/agreements/{slug}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "new-name");
}

/// Agreement deletion is admin-only.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_requires_admin(pool: PgPool) {
    let staff_token = common::auth_token(&pool, "staffdel", "staff").await;
    let admin_token = common::auth_token(&pool, "admindel", "admin").await;
    let slug = create_agreement(&pool, &staff_token, "Doomed Pact").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/agreements/{slug}"), &staff_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/agreements/{slug}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
