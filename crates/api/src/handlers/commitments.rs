//! Handlers for `/agreements/{slug}/commitments`.
//!
//! Creation and update run through the repository's audit hooks, so every
//! save here leaves ADDITION/REVISION rows behind.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lastmile_core::error::CoreError;
use lastmile_core::types::DbId;
use lastmile_db::models::commitment::{
    Commitment, CommitmentListParams, CreateCommitment, UpdateCommitment,
};
use lastmile_db::repositories::CommitmentRepo;

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a commitment and check it belongs to the resolved agreement.
pub(crate) async fn scoped_commitment(
    state: &AppState,
    agreement_id: DbId,
    id: DbId,
) -> AppResult<Commitment> {
    let commitment = CommitmentRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|c| c.agreement_id == Some(agreement_id))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Commitment",
            id,
        }))?;
    Ok(commitment)
}

/// POST /api/v1/agreements/{slug}/commitments
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<CreateCommitment>,
) -> AppResult<(StatusCode, Json<DataResponse<Commitment>>)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let commitment = CommitmentRepo::create(&state.pool, agreement.id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: commitment })))
}

/// GET /api/v1/agreements/{slug}/commitments
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Query(params): Query<CommitmentListParams>,
) -> AppResult<Json<DataResponse<Vec<Commitment>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let commitments =
        CommitmentRepo::list_for_agreement(&state.pool, agreement.id, &params).await?;
    Ok(Json(DataResponse { data: commitments }))
}

/// GET /api/v1/agreements/{slug}/commitments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<Commitment>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let commitment = scoped_commitment(&state, agreement.id, id).await?;
    Ok(Json(DataResponse { data: commitment }))
}

/// PUT /api/v1/agreements/{slug}/commitments/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateCommitment>,
) -> AppResult<Json<DataResponse<Commitment>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_commitment(&state, agreement.id, id).await?;
    let commitment = CommitmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Commitment",
            id,
        }))?;
    Ok(Json(DataResponse { data: commitment }))
}

/// DELETE /api/v1/agreements/{slug}/commitments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_commitment(&state, agreement.id, id).await?;
    CommitmentRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
