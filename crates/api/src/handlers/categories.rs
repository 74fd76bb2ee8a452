//! Handlers for `/agreements/{slug}/categories`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lastmile_core::error::CoreError;
use lastmile_core::types::DbId;
use lastmile_db::models::category::{CommitmentCategory, CreateCategory, UpdateCategory};
use lastmile_db::repositories::CategoryRepo;

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a category and check it belongs to the resolved agreement.
async fn scoped_category(
    state: &AppState,
    agreement_id: DbId,
    id: DbId,
) -> AppResult<CommitmentCategory> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|c| c.agreement_id == Some(agreement_id))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(category)
}

/// POST /api/v1/agreements/{slug}/categories
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<CommitmentCategory>>)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let category = CategoryRepo::create(&state.pool, agreement.id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/agreements/{slug}/categories
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<CommitmentCategory>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let categories = CategoryRepo::list_for_agreement(&state.pool, agreement.id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/agreements/{slug}/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<CommitmentCategory>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let category = scoped_category(&state, agreement.id, id).await?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/agreements/{slug}/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<CommitmentCategory>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_category(&state, agreement.id, id).await?;
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/agreements/{slug}/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_category(&state, agreement.id, id).await?;
    CategoryRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
