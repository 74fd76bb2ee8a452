//! Commitment category models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::types::{DbId, Timestamp};

/// A row from the `commitment_categories` table. Ordered by `order_num`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommitmentCategory {
    pub id: DbId,
    pub agreement_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub order_num: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category within an agreement.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub order_num: Option<i16>,
}

/// DTO for updating a category. The slug is recomputed when the name changes.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub order_num: Option<i16>,
}
