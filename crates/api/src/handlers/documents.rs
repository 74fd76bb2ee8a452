//! Handlers for `/agreements/{slug}/documents` (report files on the overview).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lastmile_core::error::CoreError;
use lastmile_core::types::DbId;
use lastmile_db::models::document::{CreateDocument, Document, UpdateDocument};
use lastmile_db::repositories::{DocumentRepo, OverviewRepo};

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Documents hang off the agreement's overview, so one must exist first.
async fn overview_id_for(state: &AppState, agreement_id: DbId) -> AppResult<DbId> {
    let overview = OverviewRepo::find_for_agreement(&state.pool, agreement_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Overview",
            id: agreement_id,
        }))?;
    Ok(overview.id)
}

async fn scoped_document(state: &AppState, overview_id: DbId, id: DbId) -> AppResult<Document> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|d| d.overview_id == Some(overview_id))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;
    Ok(document)
}

/// POST /api/v1/agreements/{slug}/documents
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<Document>>)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview_id = overview_id_for(&state, agreement.id).await?;
    let document = DocumentRepo::create(&state.pool, overview_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/agreements/{slug}/documents
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview_id = overview_id_for(&state, agreement.id).await?;
    let documents = DocumentRepo::list_for_overview(&state.pool, overview_id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// PUT /api/v1/agreements/{slug}/documents/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateDocument>,
) -> AppResult<Json<DataResponse<Document>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview_id = overview_id_for(&state, agreement.id).await?;
    scoped_document(&state, overview_id, id).await?;
    let document = DocumentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /api/v1/agreements/{slug}/documents/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let overview_id = overview_id_for(&state, agreement.id).await?;
    scoped_document(&state, overview_id, id).await?;
    DocumentRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
