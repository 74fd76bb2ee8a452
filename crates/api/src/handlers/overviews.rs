//! Handlers for `/agreements/{slug}/overview` and its item collections.
//!
//! The overview is the agreement's public narrative. Achievements,
//! challenges, and recommendations are addressed by a kind segment in the
//! path, so one set of handlers serves all three collections.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lastmile_core::error::CoreError;
use lastmile_core::types::DbId;
use lastmile_db::models::overview::{
    CreateOverviewItem, Overview, OverviewItem, OverviewItemKind, UpdateOverviewItem,
    UpsertOverview,
};
use lastmile_db::repositories::OverviewRepo;
use serde::Serialize;

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// An overview item together with the commitments it highlights.
#[derive(Debug, Serialize)]
pub struct OverviewItemResponse {
    #[serde(flatten)]
    pub item: OverviewItem,
    pub commitment_ids: Vec<DbId>,
}

pub(crate) async fn with_commitments(
    state: &AppState,
    item: OverviewItem,
) -> AppResult<OverviewItemResponse> {
    let commitment_ids = OverviewRepo::item_commitment_ids(&state.pool, item.id).await?;
    Ok(OverviewItemResponse {
        item,
        commitment_ids,
    })
}

/// Fetch the agreement's overview or 404.
async fn scoped_overview(state: &AppState, agreement_id: DbId) -> AppResult<Overview> {
    OverviewRepo::find_for_agreement(&state.pool, agreement_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Overview",
            id: agreement_id,
        }))
}

/// Fetch an item and check it belongs to the agreement's overview.
async fn scoped_item(
    state: &AppState,
    overview_id: DbId,
    kind: OverviewItemKind,
    id: DbId,
) -> AppResult<OverviewItem> {
    let item = OverviewRepo::find_item(&state.pool, id)
        .await?
        .filter(|i| i.overview_id == Some(overview_id) && i.kind == kind)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "OverviewItem",
            id,
        }))?;
    Ok(item)
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// PUT /api/v1/agreements/{slug}/overview
///
/// Creates the overview on first call, replaces it afterwards.
pub async fn upsert(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<UpsertOverview>,
) -> AppResult<Json<DataResponse<Overview>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview = OverviewRepo::upsert(&state.pool, agreement.id, &input).await?;
    Ok(Json(DataResponse { data: overview }))
}

/// GET /api/v1/agreements/{slug}/overview
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Overview>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview = scoped_overview(&state, agreement.id).await?;
    Ok(Json(DataResponse { data: overview }))
}

/// DELETE /api/v1/agreements/{slug}/overview
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let deleted = OverviewRepo::delete_for_agreement(&state.pool, agreement.id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Overview",
            id: agreement.id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// POST /api/v1/agreements/{slug}/overview/items/{kind}
pub async fn create_item(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, kind)): Path<(String, OverviewItemKind)>,
    Json(input): Json<CreateOverviewItem>,
) -> AppResult<(StatusCode, Json<DataResponse<OverviewItemResponse>>)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview = scoped_overview(&state, agreement.id).await?;

    for &commitment_id in &input.commitment_ids {
        super::commitments::scoped_commitment(&state, agreement.id, commitment_id).await?;
    }

    let item = OverviewRepo::create_item(&state.pool, overview.id, kind, &input).await?;
    let data = with_commitments(&state, item).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/agreements/{slug}/overview/items/{kind}
pub async fn list_items(
    State(state): State<AppState>,
    user: AuthUser,
    Path((slug, kind)): Path<(String, OverviewItemKind)>,
) -> AppResult<Json<DataResponse<Vec<OverviewItemResponse>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview = scoped_overview(&state, agreement.id).await?;

    let items = OverviewRepo::list_items(&state.pool, overview.id, kind).await?;
    let mut data = Vec::with_capacity(items.len());
    for item in items {
        data.push(with_commitments(&state, item).await?);
    }
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/agreements/{slug}/overview/items/{kind}/{id}
pub async fn update_item(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, kind, id)): Path<(String, OverviewItemKind, DbId)>,
    Json(input): Json<UpdateOverviewItem>,
) -> AppResult<Json<DataResponse<OverviewItemResponse>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview = scoped_overview(&state, agreement.id).await?;
    scoped_item(&state, overview.id, kind, id).await?;

    if let Some(commitment_ids) = &input.commitment_ids {
        for &commitment_id in commitment_ids {
            super::commitments::scoped_commitment(&state, agreement.id, commitment_id).await?;
        }
    }

    let item = OverviewRepo::update_item(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "OverviewItem",
            id,
        }))?;
    let data = with_commitments(&state, item).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/agreements/{slug}/overview/items/{kind}/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, kind, id)): Path<(String, OverviewItemKind, DbId)>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview = scoped_overview(&state, agreement.id).await?;
    scoped_item(&state, overview.id, kind, id).await?;
    OverviewRepo::delete_item(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
