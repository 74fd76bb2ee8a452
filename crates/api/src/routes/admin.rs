//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// POST   /users                     -> create
/// GET    /users/{id}                -> get_by_id
/// POST   /users/{id}/reset-password -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create))
        .route("/users/{id}", get(users::get_by_id))
        .route("/users/{id}/reset-password", post(users::reset_password))
}
