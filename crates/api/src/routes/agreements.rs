//! Route definitions for the `/agreements` resource and everything scoped
//! under an agreement slug.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{
    actions, actors, agreements, attachments, categories, commitments, dashboard, documents,
    exports, overviews, updates,
};
use crate::state::AppState;

/// Routes mounted at `/agreements`.
///
/// Writes require the staff role (member writes are rejected by handler
/// extractors); reads require enrolment in the agreement unless the caller
/// is staff or admin.
///
/// ```text
/// GET    /                                      -> list
/// POST   /                                      -> create
/// GET    /{slug}                                -> get_by_slug
/// PUT    /{slug}                                -> update
/// DELETE /{slug}                                -> delete (admin only)
/// POST   /{slug}/members                        -> add_member
/// DELETE /{slug}/members/{user_id}              -> remove_member
///
/// GET    /{slug}/dashboard                      -> dashboard payload
///
/// GET    /{slug}/categories                     -> list, POST -> create
/// GET    /{slug}/categories/{id}                -> get, PUT -> update, DELETE -> delete
///
/// GET    /{slug}/commitments                    -> list (?status, ?category_id), POST -> create
/// GET    /{slug}/commitments/export             -> CSV download
/// GET    /{slug}/commitments/{id}               -> get, PUT -> update, DELETE -> delete
///
/// GET    /{slug}/actions                        -> list (?status incl. overdue, ?commitment_id), POST -> create
/// GET    /{slug}/actions/export                 -> CSV download
/// GET    /{slug}/actions/{id}                   -> get, PUT -> update, DELETE -> delete
///
/// GET    /{slug}/actors                         -> list, POST -> create
/// GET    /{slug}/actors/workloads               -> per-actor action counts
/// PUT    /{slug}/actors/{id}                    -> update, DELETE -> delete
///
/// GET    /{slug}/attachments                    -> list, POST -> create
/// GET    /{slug}/attachments/{id}               -> get, PUT -> update, DELETE -> delete
///
/// GET    /{slug}/updates                        -> audit timeline (?kind, ?commitment_id, ...)
///
/// GET    /{slug}/overview                       -> get, PUT -> upsert, DELETE -> delete
/// GET    /{slug}/overview/items/{kind}          -> list, POST -> create
/// PUT    /{slug}/overview/items/{kind}/{id}     -> update, DELETE -> delete
///
/// GET    /{slug}/documents                      -> list, POST -> create
/// PUT    /{slug}/documents/{id}                 -> update, DELETE -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(agreements::list).post(agreements::create))
        .route(
            "/{slug}",
            get(agreements::get_by_slug)
                .put(agreements::update)
                .delete(agreements::delete),
        )
        .route("/{slug}/members", post(agreements::add_member))
        .route(
            "/{slug}/members/{user_id}",
            delete(agreements::remove_member),
        )
        .route("/{slug}/dashboard", get(dashboard::get))
        // Categories.
        .route(
            "/{slug}/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/{slug}/categories/{id}",
            get(categories::get_by_id)
                .put(categories::update)
                .delete(categories::delete),
        )
        // Commitments.
        .route(
            "/{slug}/commitments",
            get(commitments::list).post(commitments::create),
        )
        .route("/{slug}/commitments/export", get(exports::commitments))
        .route(
            "/{slug}/commitments/{id}",
            get(commitments::get_by_id)
                .put(commitments::update)
                .delete(commitments::delete),
        )
        // Actions.
        .route("/{slug}/actions", get(actions::list).post(actions::create))
        .route("/{slug}/actions/export", get(exports::actions))
        .route(
            "/{slug}/actions/{id}",
            get(actions::get_by_id)
                .put(actions::update)
                .delete(actions::delete),
        )
        // Actors (responsible parties).
        .route("/{slug}/actors", get(actors::list).post(actors::create))
        .route("/{slug}/actors/workloads", get(actors::workloads))
        .route(
            "/{slug}/actors/{id}",
            put(actors::update).delete(actors::delete),
        )
        // Attachments.
        .route(
            "/{slug}/attachments",
            get(attachments::list).post(attachments::create),
        )
        .route(
            "/{slug}/attachments/{id}",
            get(attachments::get_by_id)
                .put(attachments::update)
                .delete(attachments::delete),
        )
        // Audit timeline.
        .route("/{slug}/updates", get(updates::list))
        // Overview and its item collections.
        .route(
            "/{slug}/overview",
            get(overviews::get)
                .put(overviews::upsert)
                .delete(overviews::delete),
        )
        .route(
            "/{slug}/overview/items/{kind}",
            get(overviews::list_items).post(overviews::create_item),
        )
        .route(
            "/{slug}/overview/items/{kind}/{id}",
            put(overviews::update_item).delete(overviews::delete_item),
        )
        // Documents.
        .route(
            "/{slug}/documents",
            get(documents::list).post(documents::create),
        )
        .route(
            "/{slug}/documents/{id}",
            put(documents::update).delete(documents::delete),
        )
}
