//! Repository for the `attachments` table.
//!
//! An attachment linked only to an action inherits that action's owning
//! commitment on save, so commitment timelines always include the files
//! attached to their actions.

use sqlx::PgPool;

use lastmile_core::audit::UpdateKind;
use lastmile_core::types::DbId;

use crate::audit;
use crate::models::attachment::{Attachment, CreateAttachment, UpdateAttachment};
use crate::models::update::NewUpdate;

/// Column list for `attachments` queries.
const ATTACHMENT_COLUMNS: &str = "\
    id, name, file_path, description, commitment_id, action_id, uploaded_by, \
    date_added, created_at, updated_at";

/// Provides CRUD operations and audit hooks for attachments.
pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Create an attachment and record an OTHER audit entry naming the
    /// uploader. The commitment link is derived from the action when absent.
    pub async fn create(
        pool: &PgPool,
        new: &CreateAttachment,
        uploaded_by: DbId,
        uploader_name: &str,
    ) -> Result<Attachment, sqlx::Error> {
        let commitment_id =
            Self::derive_commitment(pool, new.commitment_id, new.action_id).await?;

        let query = format!(
            "INSERT INTO attachments (name, file_path, description, commitment_id, \
                 action_id, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ATTACHMENT_COLUMNS}"
        );
        let attachment = sqlx::query_as::<_, Attachment>(&query)
            .bind(&new.name)
            .bind(&new.file_path)
            .bind(&new.description)
            .bind(commitment_id)
            .bind(new.action_id)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await?;

        audit::record(
            pool,
            NewUpdate::new(
                UpdateKind::Other,
                format!("Attachment: {} Added by {uploader_name}", attachment.name),
            )
            .commitment(attachment.commitment_id)
            .action(attachment.action_id),
        )
        .await;

        Ok(attachment)
    }

    /// Find an attachment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Attachment>, sqlx::Error> {
        let query = format!("SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE id = $1");
        sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an agreement's attachments via their commitments, newest first.
    pub async fn list_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        sqlx::query_as::<_, Attachment>(
            "SELECT at.id, at.name, at.file_path, at.description, at.commitment_id, \
                    at.action_id, at.uploaded_by, at.date_added, at.created_at, at.updated_at \
             FROM attachments at \
             JOIN commitments c ON c.id = at.commitment_id \
             WHERE c.agreement_id = $1 \
             ORDER BY at.date_added DESC, at.id DESC",
        )
        .bind(agreement_id)
        .fetch_all(pool)
        .await
    }

    /// List the attachments on one commitment, newest first.
    pub async fn list_for_commitment(
        pool: &PgPool,
        commitment_id: DbId,
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        let query = format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments \
             WHERE commitment_id = $1 \
             ORDER BY date_added DESC, id DESC"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(commitment_id)
            .fetch_all(pool)
            .await
    }

    /// Save an attachment, recording one OTHER audit entry per changed field
    /// in the attachment phrasing. The commitment link is re-derived from the
    /// action when the payload leaves it unset.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAttachment,
        uploader_name: &str,
    ) -> Result<Option<Attachment>, sqlx::Error> {
        let Some(old) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let commitment_id =
            Self::derive_commitment(pool, input.commitment_id, input.action_id).await?;
        let effective = UpdateAttachment {
            commitment_id,
            ..input.clone()
        };
        let changes = audit::diff_attachment(&old, &effective);

        let query = format!(
            "UPDATE attachments SET \
                 file_path = $2, \
                 description = $3, \
                 commitment_id = $4, \
                 action_id = $5 \
             WHERE id = $1 \
             RETURNING {ATTACHMENT_COLUMNS}"
        );
        let saved = sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .bind(&effective.file_path)
            .bind(&effective.description)
            .bind(effective.commitment_id)
            .bind(effective.action_id)
            .fetch_optional(pool)
            .await?;

        if let Some(saved) = &saved {
            audit::record_attachment_revisions(pool, saved, uploader_name, &changes).await;
        }

        Ok(saved)
    }

    /// Delete an attachment. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolve the commitment an attachment belongs to: the explicit link
    /// when given, otherwise the owning commitment of the linked action.
    async fn derive_commitment(
        pool: &PgPool,
        commitment_id: Option<DbId>,
        action_id: Option<DbId>,
    ) -> Result<Option<DbId>, sqlx::Error> {
        if commitment_id.is_some() {
            return Ok(commitment_id);
        }
        let Some(action_id) = action_id else {
            return Ok(None);
        };
        sqlx::query_scalar("SELECT commitment_id FROM actions WHERE id = $1")
            .bind(action_id)
            .fetch_optional(pool)
            .await
            .map(Option::flatten)
    }
}
