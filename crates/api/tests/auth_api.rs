//! HTTP-level integration tests for auth and admin user management.
//!
//! Covers login, token refresh with rotation, logout, RBAC enforcement on
//! the admin routes, and password reset revoking sessions.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use sqlx::PgPool;

/// Log in a user via the API and return the full JSON response.
async fn login_json(pool: &PgPool, username: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Auth flow tests
// ---------------------------------------------------------------------------

/// Successful login returns 200 with access_token, refresh_token, and user info.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = common::create_test_user(&pool, "loginuser", "staff").await;

    let json = login_json(&pool, "loginuser").await;

    assert!(
        json["access_token"].is_string(),
        "response must contain access_token"
    );
    assert!(
        json["refresh_token"].is_string(),
        "response must contain refresh_token"
    );
    assert!(
        json["expires_in"].is_number(),
        "response must contain expires_in"
    );
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["role"], "staff");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_test_user(&pool, "wrongpw", "member").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "wrongpw", "password": "incorrect_password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with a nonexistent username returns 401 (same message as wrong
/// password, so usernames cannot be probed).
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "ghost", "password": "whatever" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login to a deactivated account returns 403.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = common::create_test_user(&pool, "inactive", "member").await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .expect("deactivation should succeed");

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "inactive", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A valid refresh token returns new tokens and rotates the old one out.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_refresh_rotates(pool: PgPool) {
    common::create_test_user(&pool, "refresher", "staff").await;
    let login = login_json(&pool, "refresher").await;
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_ne!(
        json["refresh_token"].as_str().unwrap(),
        refresh_token,
        "refresh token must rotate on use"
    );

    // The presented token is single-use: replaying it fails.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Refreshing with a garbage token returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_with_invalid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "refresh_token": "not-a-real-token" });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes every session and returns 204 No Content.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    common::create_test_user(&pool, "logoutuser", "member").await;
    let login = login_json(&pool, "logoutuser").await;
    let access_token = login["access_token"].as_str().unwrap();
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/auth/logout", serde_json::json!({}), access_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The refresh token from before logout is now dead.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// RBAC enforcement tests
// ---------------------------------------------------------------------------

/// Admin endpoints require authentication -- missing token returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_endpoint_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/admin/users/1").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A staff user is forbidden from admin endpoints.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_endpoint_requires_admin_role(pool: PgPool) {
    let token = common::auth_token(&pool, "staffer", "staff").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/users/1", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Admin user management tests
// ---------------------------------------------------------------------------

/// Admin can create a new user via POST /admin/users and receives 201.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_create_user(pool: PgPool) {
    let token = common::auth_token(&pool, "adminmgr", "admin").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "username": "newuser",
        "password": "strong_password_123!",
        "role": "member"
    });
    let response = post_json_auth(app, "/api/v1/admin/users", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newuser");
    assert_eq!(json["data"]["role"], "member");
    assert!(json["data"]["is_active"].as_bool().unwrap());
}

/// Creating a user with an unknown role returns 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_create_user_bad_role(pool: PgPool) {
    let token = common::auth_token(&pool, "roleadmin", "admin").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "username": "oddball",
        "password": "strong_password_123!",
        "role": "superuser"
    });
    let response = post_json_auth(app, "/api/v1/admin/users", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Password reset replaces the hash and kills open sessions.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password_revokes_sessions(pool: PgPool) {
    let admin_token = common::auth_token(&pool, "resetadmin", "admin").await;
    let target = common::create_test_user(&pool, "target", "member").await;
    let target_login = login_json(&pool, "target").await;
    let target_refresh = target_login["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "password": "brand_new_password_1" });
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/users/{}/reset-password", target.id),
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Old refresh token no longer works.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "refresh_token": target_refresh });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The new password does.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "target", "password": "brand_new_password_1" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}
