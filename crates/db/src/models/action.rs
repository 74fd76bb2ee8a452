//! Action models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::status::WorkStatus;
use lastmile_core::types::{Date, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Action {
    pub id: DbId,
    pub commitment_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub status: WorkStatus,
    pub status_description: String,
    pub expected_completion_date: Option<Date>,
    pub completion_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An action plus the ids of its responsible actors.
#[derive(Debug, Clone, Serialize)]
pub struct ActionWithActors {
    #[serde(flatten)]
    pub action: Action,
    pub responsible_party_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating an action under a commitment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAction {
    pub commitment_id: Option<DbId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<WorkStatus>,
    #[serde(default)]
    pub status_description: String,
    pub expected_completion_date: Option<Date>,
    pub completion_date: Option<Date>,
    /// Responsible parties to link on creation.
    #[serde(default)]
    pub responsible_party_ids: Vec<DbId>,
}

/// DTO for updating an action (full-form replacement, like commitments).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAction {
    pub commitment_id: Option<DbId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: WorkStatus,
    #[serde(default)]
    pub status_description: String,
    pub expected_completion_date: Option<Date>,
    pub completion_date: Option<Date>,
    /// Replaces the responsible-party set when present.
    pub responsible_party_ids: Option<Vec<DbId>>,
}

/// Query parameters for action listing. `status` accepts the five stored
/// statuses plus the derived `overdue` label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionListParams {
    pub status: Option<String>,
    pub commitment_id: Option<DbId>,
}
