//! Handlers for `/agreements/{slug}/attachments`.
//!
//! File contents live outside the API (object storage or a shared volume);
//! rows here carry the path plus the commitment/action links. Saves feed the
//! audit trail with attachment-phrased OTHER updates naming the uploader.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lastmile_core::error::CoreError;
use lastmile_core::types::DbId;
use lastmile_db::models::attachment::{Attachment, CreateAttachment, UpdateAttachment};
use lastmile_db::repositories::{AttachmentRepo, CommitmentRepo, UserRepo};

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch an attachment and check it belongs to the resolved agreement.
async fn scoped_attachment(
    state: &AppState,
    agreement_id: DbId,
    id: DbId,
) -> AppResult<Attachment> {
    let attachment = AttachmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Attachment",
            id,
        }))?;

    let in_scope = match attachment.commitment_id {
        Some(commitment_id) => CommitmentRepo::find_by_id(&state.pool, commitment_id)
            .await?
            .is_some_and(|c| c.agreement_id == Some(agreement_id)),
        None => false,
    };
    if !in_scope {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Attachment",
            id,
        }));
    }

    Ok(attachment)
}

/// Resolve the acting user's username for audit phrasing.
async fn uploader_name(state: &AppState, user_id: DbId) -> AppResult<String> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(user.username)
}

/// POST /api/v1/agreements/{slug}/attachments
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(slug): Path<String>,
    Json(input): Json<CreateAttachment>,
) -> AppResult<(StatusCode, Json<DataResponse<Attachment>>)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    if let Some(commitment_id) = input.commitment_id {
        super::commitments::scoped_commitment(&state, agreement.id, commitment_id).await?;
    }
    let username = uploader_name(&state, user.user_id).await?;
    let attachment = AttachmentRepo::create(&state.pool, &input, user.user_id, &username).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: attachment })))
}

/// GET /api/v1/agreements/{slug}/attachments
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Attachment>>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let attachments = AttachmentRepo::list_for_agreement(&state.pool, agreement.id).await?;
    Ok(Json(DataResponse { data: attachments }))
}

/// GET /api/v1/agreements/{slug}/attachments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<Attachment>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let attachment = scoped_attachment(&state, agreement.id, id).await?;
    Ok(Json(DataResponse { data: attachment }))
}

/// PUT /api/v1/agreements/{slug}/attachments/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateAttachment>,
) -> AppResult<Json<DataResponse<Attachment>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_attachment(&state, agreement.id, id).await?;
    let username = uploader_name(&state, user.user_id).await?;
    let attachment = AttachmentRepo::update(&state.pool, id, &input, &username)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Attachment",
            id,
        }))?;
    Ok(Json(DataResponse { data: attachment }))
}

/// DELETE /api/v1/agreements/{slug}/attachments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path((slug, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    scoped_attachment(&state, agreement.id, id).await?;
    AttachmentRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
