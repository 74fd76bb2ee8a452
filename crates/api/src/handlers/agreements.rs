//! Handlers for the `/agreements` resource and tenant scoping.
//!
//! Every scoped route resolves its `{slug}` segment through
//! [`resolve_scope`]: a missing agreement is a 404, and members who are not
//! enrolled in the agreement get a 403. Staff and admins see every agreement.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lastmile_core::error::CoreError;
use lastmile_core::roles::can_edit;
use lastmile_core::types::DbId;
use lastmile_db::models::agreement::{Agreement, CreateAgreement, UpdateAgreement};
use lastmile_db::repositories::AgreementRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::response::DataResponse;
use crate::state::AppState;

/// Resolve an agreement slug into its row, enforcing tenant membership.
///
/// Staff and admins may access any agreement; members only the ones they are
/// enrolled in. A missing slug is a 404, never a 500.
pub(crate) async fn resolve_scope(
    state: &AppState,
    slug: &str,
    user: &AuthUser,
) -> AppResult<Agreement> {
    let agreement = AgreementRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::SlugNotFound {
                entity: "Agreement",
                slug: slug.to_string(),
            })
        })?;

    if !can_edit(&user.role)
        && !AgreementRepo::is_member(&state.pool, agreement.id, user.user_id).await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a member of this agreement".into(),
        )));
    }

    Ok(agreement)
}

/// Request body for membership changes.
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub user_id: DbId,
}

/// POST /api/v1/agreements
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(input): Json<CreateAgreement>,
) -> AppResult<(StatusCode, Json<DataResponse<Agreement>>)> {
    let agreement = AgreementRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: agreement })))
}

/// GET /api/v1/agreements
///
/// Staff and admins see every agreement; members only their own.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Agreement>>>> {
    let agreements = if can_edit(&user.role) {
        AgreementRepo::list_all(&state.pool).await?
    } else {
        AgreementRepo::list_for_user(&state.pool, user.user_id).await?
    };
    Ok(Json(DataResponse { data: agreements }))
}

/// GET /api/v1/agreements/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Agreement>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    Ok(Json(DataResponse { data: agreement }))
}

/// PUT /api/v1/agreements/{slug}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<UpdateAgreement>,
) -> AppResult<Json<DataResponse<Agreement>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let agreement = AgreementRepo::update(&state.pool, agreement.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::SlugNotFound {
            entity: "Agreement",
            slug,
        }))?;
    Ok(Json(DataResponse { data: agreement }))
}

/// DELETE /api/v1/agreements/{slug}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    AgreementRepo::delete(&state.pool, agreement.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/agreements/{slug}/members
pub async fn add_member(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<MemberRequest>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    AgreementRepo::add_member(&state.pool, agreement.id, input.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/agreements/{slug}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, user_id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let removed = AgreementRepo::remove_member(&state.pool, agreement.id, user_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Membership",
            id: user_id,
        }))
    }
}
