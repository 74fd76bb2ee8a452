//! Handlers for `/agreements/{slug}/actors` (responsible parties).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use lastmile_core::error::CoreError;
use lastmile_core::types::DbId;
use lastmile_db::models::actor::{Actor, ActorWorkload, CreateActor, UpdateActor};
use lastmile_db::repositories::ActorRepo;

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/agreements/{slug}/actors
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<CreateActor>,
) -> AppResult<(StatusCode, Json<DataResponse<Actor>>)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let actor = ActorRepo::create(&state.pool, agreement.id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: actor })))
}

/// GET /api/v1/agreements/{slug}/actors
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Actor>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let actors = ActorRepo::list_for_agreement(&state.pool, agreement.id).await?;
    Ok(Json(DataResponse { data: actors }))
}

/// GET /api/v1/agreements/{slug}/actors/workloads
///
/// Per-actor completed/ongoing/overdue action counts for the dashboard.
pub async fn workloads(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ActorWorkload>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let today = Utc::now().date_naive();
    let workloads = ActorRepo::workloads_for_agreement(&state.pool, agreement.id, today).await?;
    Ok(Json(DataResponse { data: workloads }))
}

/// PUT /api/v1/agreements/{slug}/actors/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateActor>,
) -> AppResult<Json<DataResponse<Actor>>> {
    resolve_scope(&state, &slug, &user).await?;
    let actor = ActorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id,
        }))?;
    Ok(Json(DataResponse { data: actor }))
}

/// DELETE /api/v1/agreements/{slug}/actors/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    resolve_scope(&state, &slug, &user).await?;
    let deleted = ActorRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id,
        }))
    }
}
