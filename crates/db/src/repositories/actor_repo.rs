//! Repository for the `actors` table (responsible parties).

use sqlx::PgPool;

use lastmile_core::types::{Date, DbId};

use crate::models::actor::{Actor, ActorWorkload, CreateActor, UpdateActor};

/// Column list for `actors` queries.
const ACTOR_COLUMNS: &str = "id, name, user_id, created_at, updated_at";

/// Provides CRUD and workload queries for actors.
pub struct ActorRepo;

impl ActorRepo {
    /// Create an actor and link it to the given agreements.
    pub async fn create(
        pool: &PgPool,
        agreement_id: DbId,
        new: &CreateActor,
    ) -> Result<Actor, sqlx::Error> {
        let query = format!(
            "INSERT INTO actors (name, user_id) VALUES ($1, $2) RETURNING {ACTOR_COLUMNS}"
        );
        let actor = sqlx::query_as::<_, Actor>(&query)
            .bind(&new.name)
            .bind(new.user_id)
            .fetch_one(pool)
            .await?;

        Self::link_agreement(pool, actor.id, agreement_id).await?;
        for &extra in &new.agreement_ids {
            Self::link_agreement(pool, actor.id, extra).await?;
        }

        Ok(actor)
    }

    /// Find an actor by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {ACTOR_COLUMNS} FROM actors WHERE id = $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the actors linked to an agreement, by name.
    pub async fn list_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
    ) -> Result<Vec<Actor>, sqlx::Error> {
        sqlx::query_as::<_, Actor>(
            "SELECT ac.id, ac.name, ac.user_id, ac.created_at, ac.updated_at \
             FROM actors ac \
             JOIN actor_agreements aa ON aa.actor_id = ac.id \
             WHERE aa.agreement_id = $1 \
             ORDER BY ac.name",
        )
        .bind(agreement_id)
        .fetch_all(pool)
        .await
    }

    /// Update an actor's name or user link.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActor,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!(
            "UPDATE actors SET \
                 name = COALESCE($2, name), \
                 user_id = COALESCE($3, user_id) \
             WHERE id = $1 \
             RETURNING {ACTOR_COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an actor. Audit updates naming it keep their text (SET NULL).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether an actor is linked to an agreement.
    pub async fn is_linked(
        pool: &PgPool,
        actor_id: DbId,
        agreement_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                 SELECT 1 FROM actor_agreements \
                 WHERE actor_id = $1 AND agreement_id = $2 \
             )",
        )
        .bind(actor_id)
        .bind(agreement_id)
        .fetch_one(pool)
        .await
    }

    /// Link an actor to an agreement. Idempotent.
    pub async fn link_agreement(
        pool: &PgPool,
        actor_id: DbId,
        agreement_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO actor_agreements (actor_id, agreement_id) VALUES ($1, $2) \
             ON CONFLICT (actor_id, agreement_id) DO NOTHING",
        )
        .bind(actor_id)
        .bind(agreement_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Per-actor action counts for an agreement's dashboard: completed,
    /// ongoing (active), and overdue (active past the expected date).
    pub async fn workloads_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
        today: Date,
    ) -> Result<Vec<ActorWorkload>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkloadRow>(
            "SELECT ac.id, ac.name, ac.user_id, ac.created_at, ac.updated_at, \
                    COUNT(*) FILTER (WHERE a.status = 'complete') AS completed, \
                    COUNT(*) FILTER (WHERE a.status = 'active') AS ongoing, \
                    COUNT(*) FILTER (WHERE a.status = 'active' \
                        AND a.expected_completion_date < $2) AS overdue \
             FROM actors ac \
             JOIN actor_agreements ag ON ag.actor_id = ac.id AND ag.agreement_id = $1 \
             LEFT JOIN action_actors al ON al.actor_id = ac.id \
             LEFT JOIN actions a ON a.id = al.action_id \
             GROUP BY ac.id \
             ORDER BY ac.name",
        )
        .bind(agreement_id)
        .bind(today)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ActorWorkload {
                actor: Actor {
                    id: row.id,
                    name: row.name,
                    user_id: row.user_id,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
                completed: row.completed,
                ongoing: row.ongoing,
                overdue: row.overdue,
            })
            .collect())
    }
}

/// Flat row for the workload aggregate query.
#[derive(sqlx::FromRow)]
struct WorkloadRow {
    id: DbId,
    name: String,
    user_id: Option<DbId>,
    created_at: lastmile_core::types::Timestamp,
    updated_at: lastmile_core::types::Timestamp,
    completed: i64,
    ongoing: i64,
    overdue: i64,
}
