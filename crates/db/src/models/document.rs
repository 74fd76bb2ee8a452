//! Document models (report files linked to an overview).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::types::{Date, DbId, Timestamp};

/// A row from the `documents` table. Ordered by `date`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub overview_id: Option<DbId>,
    pub name: String,
    pub document_path: String,
    pub description: String,
    pub date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub name: String,
    #[serde(default)]
    pub document_path: String,
    #[serde(default)]
    pub description: String,
    pub date: Option<Date>,
}

/// DTO for updating a document.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocument {
    pub name: Option<String>,
    pub document_path: Option<String>,
    pub description: Option<String>,
    pub date: Option<Date>,
}
