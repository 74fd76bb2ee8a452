//! Repository for the `agreements` table and tenant membership.

use sqlx::PgPool;

use lastmile_core::slug::{slug_candidate, slugify};
use lastmile_core::types::DbId;

use crate::models::agreement::{Agreement, CreateAgreement, UpdateAgreement};

/// Column list for `agreements` queries.
const AGREEMENT_COLUMNS: &str = "id, name, slug, created_at, updated_at";

/// Provides CRUD and membership operations for agreements.
pub struct AgreementRepo;

impl AgreementRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Create an agreement with a unique slug and enrol the initial members.
    pub async fn create(pool: &PgPool, new: &CreateAgreement) -> Result<Agreement, sqlx::Error> {
        let slug = Self::unique_slug(pool, &new.name, None).await?;

        let query = format!(
            "INSERT INTO agreements (name, slug) VALUES ($1, $2) RETURNING {AGREEMENT_COLUMNS}"
        );
        let agreement = sqlx::query_as::<_, Agreement>(&query)
            .bind(&new.name)
            .bind(&slug)
            .fetch_one(pool)
            .await?;

        for &user_id in &new.user_ids {
            Self::add_member(pool, agreement.id, user_id).await?;
        }

        Ok(agreement)
    }

    /// Find an agreement by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Agreement>, sqlx::Error> {
        let query = format!("SELECT {AGREEMENT_COLUMNS} FROM agreements WHERE id = $1");
        sqlx::query_as::<_, Agreement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an agreement by its slug (the tenant key in every scoped URL).
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Agreement>, sqlx::Error> {
        let query = format!("SELECT {AGREEMENT_COLUMNS} FROM agreements WHERE slug = $1");
        sqlx::query_as::<_, Agreement>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List the agreements a user belongs to.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Agreement>, sqlx::Error> {
        sqlx::query_as::<_, Agreement>(
            "SELECT a.id, a.name, a.slug, a.created_at, a.updated_at \
             FROM agreements a \
             JOIN agreement_users au ON au.agreement_id = a.id \
             WHERE au.user_id = $1 \
             ORDER BY a.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// List all agreements (staff view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Agreement>, sqlx::Error> {
        let query = format!("SELECT {AGREEMENT_COLUMNS} FROM agreements ORDER BY name");
        sqlx::query_as::<_, Agreement>(&query).fetch_all(pool).await
    }

    /// Rename an agreement. The slug is always recomputed from the saved
    /// name, so renames keep slugs unique and in sync.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAgreement,
    ) -> Result<Option<Agreement>, sqlx::Error> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let name = input.name.clone().unwrap_or(existing.name);
        let slug = Self::unique_slug(pool, &name, Some(id)).await?;

        let query = format!(
            "UPDATE agreements SET name = $2, slug = $3 WHERE id = $1 \
             RETURNING {AGREEMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Agreement>(&query)
            .bind(id)
            .bind(&name)
            .bind(&slug)
            .fetch_optional(pool)
            .await
    }

    /// Delete an agreement. Cascade removes its commitments and membership.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM agreements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Enrol a user in an agreement. Idempotent.
    pub async fn add_member(
        pool: &PgPool,
        agreement_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO agreement_users (agreement_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (agreement_id, user_id) DO NOTHING",
        )
        .bind(agreement_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a user from an agreement. Returns `true` if a row was removed.
    pub async fn remove_member(
        pool: &PgPool,
        agreement_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM agreement_users WHERE agreement_id = $1 AND user_id = $2")
                .bind(agreement_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a user is a member of an agreement.
    pub async fn is_member(
        pool: &PgPool,
        agreement_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM agreement_users WHERE agreement_id = $1 AND user_id = $2",
        )
        .bind(agreement_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Compute a slug unique among agreements, excluding the row being saved:
    /// the slugified name, then `{slug}2`, `{slug}3`, ... until free.
    async fn unique_slug(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<String, sqlx::Error> {
        let base = slugify(name);
        let mut attempt = 1u32;
        loop {
            let candidate = slug_candidate(&base, attempt);
            let taken: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM agreements \
                 WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)",
            )
            .bind(&candidate)
            .bind(exclude_id)
            .fetch_one(pool)
            .await?;
            if taken == 0 {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}
