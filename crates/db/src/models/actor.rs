//! Actor (responsible party) models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::types::{DbId, Timestamp};

/// A row from the `actors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Per-actor workload summary for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ActorWorkload {
    #[serde(flatten)]
    pub actor: Actor,
    pub completed: i64,
    pub ongoing: i64,
    /// Derived at read time from expected completion dates.
    pub overdue: i64,
}

/// DTO for creating an actor within an agreement.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActor {
    pub name: String,
    pub user_id: Option<DbId>,
    /// Additional agreements to link beyond the URL scope.
    #[serde(default)]
    pub agreement_ids: Vec<DbId>,
}

/// DTO for updating an actor.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateActor {
    pub name: Option<String>,
    pub user_id: Option<DbId>,
}
