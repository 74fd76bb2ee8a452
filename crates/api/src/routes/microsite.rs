//! Route definitions for the public `/microsite` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::microsite;
use crate::state::AppState;

/// Routes mounted at `/microsite`.
///
/// The only unauthenticated routes in the API.
///
/// ```text
/// GET /{slug} -> full public page payload
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}", get(microsite::get))
}
