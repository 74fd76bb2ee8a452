//! Audit update models.
//!
//! Updates are append-only: they are created by the write-path audit helpers
//! and the delay sweep, returned newest-first, and never mutated.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::audit::UpdateKind;
use lastmile_core::types::{DbId, Timestamp};

/// A row from the `updates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Update {
    pub id: DbId,
    pub description: String,
    pub kind: UpdateKind,
    pub commitment_id: Option<DbId>,
    pub action_id: Option<DbId>,
    pub actor_id: Option<DbId>,
    pub progress_toward_goal: String,
    pub date_created: Timestamp,
}

/// Internal payload for inserting an update row.
#[derive(Debug, Clone)]
pub struct NewUpdate {
    pub description: String,
    pub kind: UpdateKind,
    pub commitment_id: Option<DbId>,
    pub action_id: Option<DbId>,
    pub actor_id: Option<DbId>,
}

impl NewUpdate {
    pub fn new(kind: UpdateKind, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            kind,
            commitment_id: None,
            action_id: None,
            actor_id: None,
        }
    }

    pub fn commitment(mut self, id: Option<DbId>) -> Self {
        self.commitment_id = id;
        self
    }

    pub fn action(mut self, id: Option<DbId>) -> Self {
        self.action_id = id;
        self
    }

    pub fn actor(mut self, id: Option<DbId>) -> Self {
        self.actor_id = id;
        self
    }
}

/// Query parameters for listing updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateListParams {
    pub kind: Option<UpdateKind>,
    pub commitment_id: Option<DbId>,
    pub action_id: Option<DbId>,
    pub actor_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
