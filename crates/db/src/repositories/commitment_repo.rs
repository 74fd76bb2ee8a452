//! Repository for the `commitments` table.
//!
//! Creation and revision both feed the audit trail: a new commitment records
//! one ADDITION update, and every changed field on save records one REVISION
//! update. Audit inserts are tolerant and never fail the save.

use sqlx::PgPool;

use lastmile_core::audit::UpdateKind;
use lastmile_core::status::WorkStatus;
use lastmile_core::types::DbId;

use crate::audit;
use crate::models::commitment::{
    Commitment, CommitmentListParams, CreateCommitment, UpdateCommitment,
};
use crate::models::update::NewUpdate;

/// Column list for `commitments` queries.
const COMMITMENT_COLUMNS: &str = "\
    id, agreement_id, category_id, name, description, status, status_description, \
    expected_completion_date, completion_date, goal, progress_toward_goal, order_num, \
    created_at, updated_at";

/// Provides CRUD operations and audit hooks for commitments.
pub struct CommitmentRepo;

impl CommitmentRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Create a commitment and record its ADDITION audit entry.
    pub async fn create(
        pool: &PgPool,
        agreement_id: DbId,
        new: &CreateCommitment,
    ) -> Result<Commitment, sqlx::Error> {
        let query = format!(
            "INSERT INTO commitments (agreement_id, category_id, name, description, status, \
                 status_description, expected_completion_date, completion_date, goal, \
                 progress_toward_goal, order_num) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COMMITMENT_COLUMNS}"
        );
        let commitment = sqlx::query_as::<_, Commitment>(&query)
            .bind(agreement_id)
            .bind(new.category_id)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.status.unwrap_or(WorkStatus::Pending))
            .bind(&new.status_description)
            .bind(new.expected_completion_date)
            .bind(new.completion_date)
            .bind(&new.goal)
            .bind(&new.progress_toward_goal)
            .bind(new.order_num.unwrap_or(0))
            .fetch_one(pool)
            .await?;

        audit::record(
            pool,
            NewUpdate::new(UpdateKind::Addition, "Commitment Added")
                .commitment(Some(commitment.id)),
        )
        .await;

        Ok(commitment)
    }

    /// Find a commitment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Commitment>, sqlx::Error> {
        let query = format!("SELECT {COMMITMENT_COLUMNS} FROM commitments WHERE id = $1");
        sqlx::query_as::<_, Commitment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an agreement's commitments in display order (category, then
    /// order_num), with optional status/category filters.
    pub async fn list_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
        params: &CommitmentListParams,
    ) -> Result<Vec<Commitment>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMITMENT_COLUMNS} FROM commitments \
             WHERE agreement_id = $1 \
               AND ($2::TEXT IS NULL OR status = $2) \
               AND ($3::BIGINT IS NULL OR category_id = $3) \
             ORDER BY category_id NULLS LAST, order_num, id"
        );
        sqlx::query_as::<_, Commitment>(&query)
            .bind(agreement_id)
            .bind(params.status.as_deref())
            .bind(params.category_id)
            .fetch_all(pool)
            .await
    }

    /// Save a commitment, recording one REVISION update per changed field.
    ///
    /// The prior row is re-fetched by primary key and diffed against the
    /// incoming payload; a missing prior row means nothing to diff.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCommitment,
    ) -> Result<Option<Commitment>, sqlx::Error> {
        let Some(old) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let changes = audit::diff_commitment(&old, input);

        let query = format!(
            "UPDATE commitments SET \
                 category_id = $2, \
                 name = $3, \
                 description = $4, \
                 status = $5, \
                 status_description = $6, \
                 expected_completion_date = $7, \
                 completion_date = $8, \
                 goal = $9, \
                 progress_toward_goal = $10, \
                 order_num = COALESCE($11, order_num) \
             WHERE id = $1 \
             RETURNING {COMMITMENT_COLUMNS}"
        );
        let saved = sqlx::query_as::<_, Commitment>(&query)
            .bind(id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status)
            .bind(&input.status_description)
            .bind(input.expected_completion_date)
            .bind(input.completion_date)
            .bind(&input.goal)
            .bind(&input.progress_toward_goal)
            .bind(input.order_num)
            .fetch_optional(pool)
            .await?;

        if saved.is_some() {
            audit::record_revisions(pool, &changes, Some(id), None).await;
        }

        Ok(saved)
    }

    /// Delete a commitment. Cascade removes its actions; audit entries keep
    /// their text but lose the link (SET NULL).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM commitments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
