//! Handlers for `/agreements/{slug}/updates` (the read-only audit timeline).

use axum::extract::{Path, Query, State};
use axum::Json;
use lastmile_core::error::CoreError;
use lastmile_db::models::update::{Update, UpdateListParams};
use lastmile_db::repositories::{ActorRepo, UpdateRepo};

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/agreements/{slug}/updates
///
/// Newest-first. Every id filter is scope-checked against the resolved
/// agreement before use, and the listing itself is constrained to the
/// agreement's commitments, so filters can never read another tenant's
/// timeline.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Query(params): Query<UpdateListParams>,
) -> AppResult<Json<DataResponse<Vec<Update>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;

    if let Some(commitment_id) = params.commitment_id {
        super::commitments::scoped_commitment(&state, agreement.id, commitment_id).await?;
    }
    if let Some(action_id) = params.action_id {
        super::actions::scoped_action(&state, agreement.id, action_id).await?;
    }
    if let Some(actor_id) = params.actor_id {
        if !ActorRepo::is_linked(&state.pool, actor_id, agreement.id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Actor",
                id: actor_id,
            }));
        }
    }

    let updates = UpdateRepo::list_scoped(&state.pool, agreement.id, &params).await?;
    Ok(Json(DataResponse { data: updates }))
}
