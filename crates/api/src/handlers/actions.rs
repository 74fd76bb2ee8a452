//! Handlers for `/agreements/{slug}/actions`.
//!
//! Actions are scoped through their owning commitment, so every lookup joins
//! back to the agreement. The `?status=overdue` filter is derived from
//! expected completion dates rather than the stored status.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use lastmile_core::error::CoreError;
use lastmile_core::types::DbId;
use lastmile_db::models::action::{
    Action, ActionListParams, ActionWithActors, CreateAction, UpdateAction,
};
use lastmile_db::repositories::{ActionRepo, CommitmentRepo};

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch an action and check its commitment belongs to the resolved agreement.
pub(crate) async fn scoped_action(
    state: &AppState,
    agreement_id: DbId,
    id: DbId,
) -> AppResult<Action> {
    let action = ActionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Action",
            id,
        }))?;

    let in_scope = match action.commitment_id {
        Some(commitment_id) => CommitmentRepo::find_by_id(&state.pool, commitment_id)
            .await?
            .is_some_and(|c| c.agreement_id == Some(agreement_id)),
        None => false,
    };
    if !in_scope {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Action",
            id,
        }));
    }

    Ok(action)
}

/// POST /api/v1/agreements/{slug}/actions
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<CreateAction>,
) -> AppResult<(StatusCode, Json<DataResponse<ActionWithActors>>)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;

    // The owning commitment must live inside this agreement.
    let commitment_id = input.commitment_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation("commitment_id is required".into()))
    })?;
    super::commitments::scoped_commitment(&state, agreement.id, commitment_id).await?;

    let action = ActionRepo::create(&state.pool, &input).await?;
    let with_actors = ActionRepo::find_with_actors(&state.pool, action.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Action",
            id: action.id,
        }))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: with_actors })))
}

/// GET /api/v1/agreements/{slug}/actions
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Query(params): Query<ActionListParams>,
) -> AppResult<Json<DataResponse<Vec<Action>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let today = Utc::now().date_naive();
    let actions =
        ActionRepo::list_for_agreement(&state.pool, agreement.id, &params, today).await?;
    Ok(Json(DataResponse { data: actions }))
}

/// GET /api/v1/agreements/{slug}/actions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<ActionWithActors>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_action(&state, agreement.id, id).await?;
    let with_actors = ActionRepo::find_with_actors(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Action",
            id,
        }))?;
    Ok(Json(DataResponse { data: with_actors }))
}

/// PUT /api/v1/agreements/{slug}/actions/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateAction>,
) -> AppResult<Json<DataResponse<ActionWithActors>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_action(&state, agreement.id, id).await?;

    if let Some(commitment_id) = input.commitment_id {
        // Re-parenting must stay within the agreement.
        super::commitments::scoped_commitment(&state, agreement.id, commitment_id).await?;
    }

    ActionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Action",
            id,
        }))?;
    let with_actors = ActionRepo::find_with_actors(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Action",
            id,
        }))?;
    Ok(Json(DataResponse { data: with_actors }))
}

/// DELETE /api/v1/agreements/{slug}/actions/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_action(&state, agreement.id, id).await?;
    ActionRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
