//! Agreement (tenant organization) models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `agreements` table.
///
/// `slug` is derived from `name` and recomputed on every save so it stays
/// unique across agreements.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Agreement {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating an agreement.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgreement {
    pub name: String,
    /// Users to enrol as members on creation.
    #[serde(default)]
    pub user_ids: Vec<DbId>,
}

/// DTO for renaming an agreement. The slug is recomputed from the new name.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAgreement {
    pub name: Option<String>,
}
