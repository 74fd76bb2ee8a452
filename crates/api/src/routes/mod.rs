pub mod admin;
pub mod agreements;
pub mod auth;
pub mod health;
pub mod microsite;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /admin/users                                     create (admin only)
/// /admin/users/{id}                                get
/// /admin/users/{id}/reset-password                 reset password
///
/// /agreements                                      list, create
/// /agreements/{slug}                               get, update, delete
/// /agreements/{slug}/members                       enrol member (POST)
/// /agreements/{slug}/members/{user_id}             remove member (DELETE)
/// /agreements/{slug}/dashboard                     status counts, workloads, recent updates
///
/// /agreements/{slug}/categories                    list, create
/// /agreements/{slug}/categories/{id}               get, update, delete
///
/// /agreements/{slug}/commitments                   list, create
/// /agreements/{slug}/commitments/export            CSV download
/// /agreements/{slug}/commitments/{id}              get, update, delete
///
/// /agreements/{slug}/actions                       list, create
/// /agreements/{slug}/actions/export                CSV download
/// /agreements/{slug}/actions/{id}                  get, update, delete
///
/// /agreements/{slug}/actors                        list, create
/// /agreements/{slug}/actors/workloads              per-actor action counts
/// /agreements/{slug}/actors/{id}                   update, delete
///
/// /agreements/{slug}/attachments                   list, create
/// /agreements/{slug}/attachments/{id}              get, update, delete
///
/// /agreements/{slug}/updates                       audit timeline (GET)
///
/// /agreements/{slug}/overview                      get, upsert, delete
/// /agreements/{slug}/overview/items/{kind}         list, create
/// /agreements/{slug}/overview/items/{kind}/{id}    update, delete
///
/// /agreements/{slug}/documents                     list, create
/// /agreements/{slug}/documents/{id}                update, delete
///
/// /microsite/{slug}                                public page payload (no auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Admin routes (user management).
        .nest("/admin", admin::router())
        // Agreements and every slug-scoped resource.
        .nest("/agreements", agreements::router())
        // Public microsite payload.
        .nest("/microsite", microsite::router())
}
