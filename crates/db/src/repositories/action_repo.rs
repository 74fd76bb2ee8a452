//! Repository for the `actions` table and the responsible-party link table.
//!
//! Audit entries for actions are re-parented: revisions carry both the
//! action id and its owning commitment id, so commitment timelines include
//! the work done under them.

use sqlx::PgPool;

use lastmile_core::audit::UpdateKind;
use lastmile_core::status::{schedule_status, ScheduleStatus, WorkStatus};
use lastmile_core::types::{Date, DbId};

use crate::audit;
use crate::models::action::{
    Action, ActionListParams, ActionWithActors, CreateAction, UpdateAction,
};
use crate::models::update::NewUpdate;

/// Column list for `actions` queries.
const ACTION_COLUMNS: &str = "\
    id, commitment_id, name, description, status, status_description, \
    expected_completion_date, completion_date, created_at, updated_at";

/// Status filter value for the derived overdue bucket.
const OVERDUE_FILTER: &str = "overdue";

/// Provides CRUD, linking, and sweep queries for actions.
pub struct ActionRepo;

impl ActionRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Create an action, link its responsible parties, and record its
    /// ADDITION audit entry against both the action and its commitment.
    pub async fn create(pool: &PgPool, new: &CreateAction) -> Result<Action, sqlx::Error> {
        let query = format!(
            "INSERT INTO actions (commitment_id, name, description, status, \
                 status_description, expected_completion_date, completion_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ACTION_COLUMNS}"
        );
        let action = sqlx::query_as::<_, Action>(&query)
            .bind(new.commitment_id)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.status.unwrap_or(WorkStatus::Pending))
            .bind(&new.status_description)
            .bind(new.expected_completion_date)
            .bind(new.completion_date)
            .fetch_one(pool)
            .await?;

        for &actor_id in &new.responsible_party_ids {
            Self::add_responsible_party(pool, action.id, actor_id).await?;
        }

        audit::record(
            pool,
            NewUpdate::new(UpdateKind::Addition, "Action Added")
                .commitment(action.commitment_id)
                .action(Some(action.id)),
        )
        .await;

        Ok(action)
    }

    /// Find an action by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Action>, sqlx::Error> {
        let query = format!("SELECT {ACTION_COLUMNS} FROM actions WHERE id = $1");
        sqlx::query_as::<_, Action>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an action together with its responsible-party ids.
    pub async fn find_with_actors(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ActionWithActors>, sqlx::Error> {
        let Some(action) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let responsible_party_ids = Self::responsible_party_ids(pool, id).await?;
        Ok(Some(ActionWithActors {
            action,
            responsible_party_ids,
        }))
    }

    /// List an agreement's actions via their owning commitments, with
    /// optional filters. The `overdue` status is derived from expected
    /// completion dates, so it is filtered after the fetch.
    pub async fn list_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
        params: &ActionListParams,
        today: Date,
    ) -> Result<Vec<Action>, sqlx::Error> {
        let overdue_only = params.status.as_deref() == Some(OVERDUE_FILTER);
        let stored_status = params.status.as_deref().filter(|s| *s != OVERDUE_FILTER);

        let mut actions = sqlx::query_as::<_, Action>(
            "SELECT a.id, a.commitment_id, a.name, a.description, a.status, \
                    a.status_description, a.expected_completion_date, a.completion_date, \
                    a.created_at, a.updated_at \
             FROM actions a \
             JOIN commitments c ON c.id = a.commitment_id \
             WHERE c.agreement_id = $1 \
               AND ($2::TEXT IS NULL OR a.status = $2) \
               AND ($3::BIGINT IS NULL OR a.commitment_id = $3) \
             ORDER BY a.expected_completion_date NULLS LAST, a.id",
        )
            .bind(agreement_id)
            .bind(stored_status)
            .bind(params.commitment_id)
            .fetch_all(pool)
            .await?;

        if overdue_only {
            actions.retain(|a| {
                schedule_status(a.status, a.expected_completion_date, today)
                    == Some(ScheduleStatus::Overdue)
            });
        }

        Ok(actions)
    }

    /// List the actions under one commitment.
    pub async fn list_for_commitment(
        pool: &PgPool,
        commitment_id: DbId,
    ) -> Result<Vec<Action>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTION_COLUMNS} FROM actions \
             WHERE commitment_id = $1 \
             ORDER BY expected_completion_date NULLS LAST, id"
        );
        sqlx::query_as::<_, Action>(&query)
            .bind(commitment_id)
            .fetch_all(pool)
            .await
    }

    /// Save an action, recording one REVISION update per changed field.
    ///
    /// Revisions carry both the action id and the commitment id the action
    /// belongs to after the save. When the payload carries a responsible
    /// party list, it replaces the linked set.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAction,
    ) -> Result<Option<Action>, sqlx::Error> {
        let Some(old) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let changes = audit::diff_action(&old, input);

        let query = format!(
            "UPDATE actions SET \
                 commitment_id = $2, \
                 name = $3, \
                 description = $4, \
                 status = $5, \
                 status_description = $6, \
                 expected_completion_date = $7, \
                 completion_date = $8 \
             WHERE id = $1 \
             RETURNING {ACTION_COLUMNS}"
        );
        let saved = sqlx::query_as::<_, Action>(&query)
            .bind(id)
            .bind(input.commitment_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status)
            .bind(&input.status_description)
            .bind(input.expected_completion_date)
            .bind(input.completion_date)
            .fetch_optional(pool)
            .await?;

        if let Some(saved) = &saved {
            if let Some(actor_ids) = &input.responsible_party_ids {
                Self::set_responsible_parties(pool, id, actor_ids).await?;
            }
            audit::record_revisions(pool, &changes, saved.commitment_id, Some(id)).await;
        }

        Ok(saved)
    }

    /// Delete an action. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Responsible parties
    // -----------------------------------------------------------------------

    /// Link a responsible party to an action. Idempotent.
    pub async fn add_responsible_party(
        pool: &PgPool,
        action_id: DbId,
        actor_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO action_actors (action_id, actor_id) VALUES ($1, $2) \
             ON CONFLICT (action_id, actor_id) DO NOTHING",
        )
        .bind(action_id)
        .bind(actor_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace an action's responsible-party set.
    pub async fn set_responsible_parties(
        pool: &PgPool,
        action_id: DbId,
        actor_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM action_actors WHERE action_id = $1")
            .bind(action_id)
            .execute(pool)
            .await?;
        for &actor_id in actor_ids {
            Self::add_responsible_party(pool, action_id, actor_id).await?;
        }
        Ok(())
    }

    /// The ids of an action's responsible parties, in link order.
    pub async fn responsible_party_ids(
        pool: &PgPool,
        action_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT actor_id FROM action_actors WHERE action_id = $1 ORDER BY actor_id",
        )
        .bind(action_id)
        .fetch_all(pool)
        .await
    }

    /// The first responsible party of an action, if any. Used by the delay
    /// sweep to attribute DELAY updates.
    pub async fn first_responsible_party(
        pool: &PgPool,
        action_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT actor_id FROM action_actors WHERE action_id = $1 ORDER BY actor_id LIMIT 1",
        )
        .bind(action_id)
        .fetch_optional(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Delay sweep
    // -----------------------------------------------------------------------

    /// Active actions that have an expected completion date. The sweep
    /// examines each of these and decides per item whether it is past due.
    pub async fn list_active_dated(pool: &PgPool) -> Result<Vec<Action>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTION_COLUMNS} FROM actions \
             WHERE status = 'active' AND expected_completion_date IS NOT NULL \
             ORDER BY expected_completion_date, id"
        );
        sqlx::query_as::<_, Action>(&query).fetch_all(pool).await
    }
}
