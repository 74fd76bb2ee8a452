//! Commitment models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::status::WorkStatus;
use lastmile_core::types::{Date, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `commitments` table.
///
/// The overdue/upcoming/ongoing schedule label is never stored; it is derived
/// from `status` + `expected_completion_date` at read time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Commitment {
    pub id: DbId,
    pub agreement_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub status: WorkStatus,
    pub status_description: String,
    pub expected_completion_date: Option<Date>,
    pub completion_date: Option<Date>,
    pub goal: String,
    pub progress_toward_goal: String,
    pub order_num: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a commitment. The agreement comes from the URL scope.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommitment {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Option<DbId>,
    pub status: Option<WorkStatus>,
    #[serde(default)]
    pub status_description: String,
    pub expected_completion_date: Option<Date>,
    pub completion_date: Option<Date>,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub progress_toward_goal: String,
    pub order_num: Option<i16>,
}

/// DTO for updating a commitment.
///
/// Updates are full-form replacements of the editable fields (the edit form
/// always posts every field); omitted nullable fields clear their values.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommitment {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Option<DbId>,
    pub status: WorkStatus,
    #[serde(default)]
    pub status_description: String,
    pub expected_completion_date: Option<Date>,
    pub completion_date: Option<Date>,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub progress_toward_goal: String,
    pub order_num: Option<i16>,
}

/// Query parameters for commitment listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitmentListParams {
    /// Filter by stored status.
    pub status: Option<String>,
    /// Filter by category.
    pub category_id: Option<DbId>,
}
