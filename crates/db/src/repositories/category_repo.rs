//! Repository for the `commitment_categories` table.

use sqlx::PgPool;

use lastmile_core::slug::{slug_candidate, slugify};
use lastmile_core::types::DbId;

use crate::models::category::{CommitmentCategory, CreateCategory, UpdateCategory};

/// Column list for `commitment_categories` queries.
const CATEGORY_COLUMNS: &str = "\
    id, agreement_id, name, slug, description, order_num, created_at, updated_at";

/// Provides CRUD operations for commitment categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Create a category within an agreement, with a unique slug.
    pub async fn create(
        pool: &PgPool,
        agreement_id: DbId,
        new: &CreateCategory,
    ) -> Result<CommitmentCategory, sqlx::Error> {
        let slug = Self::unique_slug(pool, &new.name, None).await?;
        let query = format!(
            "INSERT INTO commitment_categories (agreement_id, name, slug, description, order_num) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, CommitmentCategory>(&query)
            .bind(agreement_id)
            .bind(&new.name)
            .bind(&slug)
            .bind(&new.description)
            .bind(new.order_num.unwrap_or(0))
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CommitmentCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM commitment_categories WHERE id = $1");
        sqlx::query_as::<_, CommitmentCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by slug within an agreement.
    pub async fn find_by_slug(
        pool: &PgPool,
        agreement_id: DbId,
        slug: &str,
    ) -> Result<Option<CommitmentCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM commitment_categories \
             WHERE agreement_id = $1 AND slug = $2"
        );
        sqlx::query_as::<_, CommitmentCategory>(&query)
            .bind(agreement_id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List an agreement's categories in display order.
    pub async fn list_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
    ) -> Result<Vec<CommitmentCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM commitment_categories \
             WHERE agreement_id = $1 \
             ORDER BY order_num, name"
        );
        sqlx::query_as::<_, CommitmentCategory>(&query)
            .bind(agreement_id)
            .fetch_all(pool)
            .await
    }

    /// Update a category. The slug is recomputed from the saved name.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<CommitmentCategory>, sqlx::Error> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let name = input.name.clone().unwrap_or(existing.name);
        let slug = Self::unique_slug(pool, &name, Some(id)).await?;

        let query = format!(
            "UPDATE commitment_categories SET \
                 name = $2, \
                 slug = $3, \
                 description = COALESCE($4, description), \
                 order_num = COALESCE($5, order_num) \
             WHERE id = $1 \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, CommitmentCategory>(&query)
            .bind(id)
            .bind(&name)
            .bind(&slug)
            .bind(input.description.as_deref())
            .bind(input.order_num)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Commitments referencing it fall back to NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM commitment_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Compute a slug unique among categories, excluding the row being saved.
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
                "SELECT COUNT(*) FROM commitment_categories \
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
