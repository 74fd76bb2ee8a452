//! Repository for the append-only `updates` table.
//!
//! Rows are inserted by the audit helpers and the delay sweep, listed
//! newest-first, and never modified.

use sqlx::PgPool;

use lastmile_core::audit::{delay_description, UpdateKind};
use lastmile_core::types::{Date, DbId};

use crate::models::action::Action;
use crate::models::update::{NewUpdate, Update, UpdateListParams};

/// Column list for `updates` queries.
const UPDATE_COLUMNS: &str = "\
    id, description, kind, commitment_id, action_id, actor_id, \
    progress_toward_goal, date_created";

/// Default page size for update listing.
const DEFAULT_LIMIT: i64 = 100;

/// Maximum page size for update listing.
const MAX_LIMIT: i64 = 500;

/// Provides insert and list operations for audit updates.
pub struct UpdateRepo;

impl UpdateRepo {
    /// Insert one audit update.
    pub async fn insert(pool: &PgPool, new: &NewUpdate) -> Result<Update, sqlx::Error> {
        let query = format!(
            "INSERT INTO updates (description, kind, commitment_id, action_id, actor_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {UPDATE_COLUMNS}"
        );
        sqlx::query_as::<_, Update>(&query)
            .bind(&new.description)
            .bind(new.kind)
            .bind(new.commitment_id)
            .bind(new.action_id)
            .bind(new.actor_id)
            .fetch_one(pool)
            .await
    }

    /// Record a DELAY update for an action past its expected completion date.
    ///
    /// Links the entry to the action, its owning commitment, and the first
    /// responsible party when one exists.
    pub async fn add_delay(
        pool: &PgPool,
        action: &Action,
        responsible_actor_id: Option<DbId>,
        today: Date,
    ) -> Result<Update, sqlx::Error> {
        // Callers guarantee an expected date; fall back to today so a bad
        // call degrades to a zero-day delay instead of a panic.
        let expected = action.expected_completion_date.unwrap_or(today);
        let new = NewUpdate::new(UpdateKind::Delay, delay_description(expected, today))
            .commitment(action.commitment_id)
            .action(Some(action.id))
            .actor(responsible_actor_id);
        Self::insert(pool, &new).await
    }

    /// List updates newest-first with optional filters.
    pub async fn list(
        pool: &PgPool,
        params: &UpdateListParams,
    ) -> Result<Vec<Update>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let query = format!(
            "SELECT {UPDATE_COLUMNS} FROM updates \
             WHERE ($1::TEXT IS NULL OR kind = $1) \
               AND ($2::BIGINT IS NULL OR commitment_id = $2) \
               AND ($3::BIGINT IS NULL OR action_id = $3) \
               AND ($4::BIGINT IS NULL OR actor_id = $4) \
             ORDER BY date_created DESC, id DESC \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Update>(&query)
            .bind(params.kind.map(|k| k.as_str()))
            .bind(params.commitment_id)
            .bind(params.action_id)
            .bind(params.actor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List updates on one agreement's commitments, newest-first, with
    /// optional filters. The agreement join is the tenant boundary: rows
    /// whose commitment link was cleared fall outside every timeline.
    pub async fn list_scoped(
        pool: &PgPool,
        agreement_id: DbId,
        params: &UpdateListParams,
    ) -> Result<Vec<Update>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        sqlx::query_as::<_, Update>(
            "SELECT u.id, u.description, u.kind, u.commitment_id, u.action_id, u.actor_id, \
                    u.progress_toward_goal, u.date_created \
             FROM updates u \
             JOIN commitments c ON c.id = u.commitment_id AND c.agreement_id = $1 \
             WHERE ($2::TEXT IS NULL OR u.kind = $2) \
               AND ($3::BIGINT IS NULL OR u.commitment_id = $3) \
               AND ($4::BIGINT IS NULL OR u.action_id = $4) \
               AND ($5::BIGINT IS NULL OR u.actor_id = $5) \
             ORDER BY u.date_created DESC, u.id DESC \
             LIMIT $6 OFFSET $7",
        )
        .bind(agreement_id)
        .bind(params.kind.map(|k| k.as_str()))
        .bind(params.commitment_id)
        .bind(params.action_id)
        .bind(params.actor_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// List every update touching an agreement's commitments, newest-first.
    pub async fn list_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<Update>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        sqlx::query_as::<_, Update>(
            "SELECT u.id, u.description, u.kind, u.commitment_id, u.action_id, u.actor_id, \
                    u.progress_toward_goal, u.date_created \
             FROM updates u \
             JOIN commitments c ON c.id = u.commitment_id \
             WHERE c.agreement_id = $1 \
             ORDER BY u.date_created DESC, u.id DESC \
             LIMIT $2",
        )
            .bind(agreement_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
