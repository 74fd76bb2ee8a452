//! Attachment models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::types::{Date, DbId, Timestamp};

/// A row from the `attachments` table.
///
/// When only `action_id` is set, `commitment_id` is derived from the action's
/// owning commitment on save.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attachment {
    pub id: DbId,
    pub name: String,
    pub file_path: String,
    pub description: String,
    pub commitment_id: Option<DbId>,
    pub action_id: Option<DbId>,
    pub uploaded_by: Option<DbId>,
    pub date_added: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttachment {
    pub name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub description: String,
    pub commitment_id: Option<DbId>,
    pub action_id: Option<DbId>,
}

/// DTO for updating an attachment (full-form replacement of the audited
/// fields: file, description, commitment, action).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAttachment {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub description: String,
    pub commitment_id: Option<DbId>,
    pub action_id: Option<DbId>,
}
