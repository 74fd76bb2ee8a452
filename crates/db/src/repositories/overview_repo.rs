//! Repository for the `overviews` and `overview_items` tables.
//!
//! Each agreement carries at most one overview (the public microsite
//! narrative); achievements, challenges, and recommendations are rows in
//! `overview_items` discriminated by kind.

use sqlx::PgPool;

use lastmile_core::types::DbId;

use crate::models::overview::{
    CreateOverviewItem, Overview, OverviewItem, OverviewItemKind, UpdateOverviewItem,
    UpsertOverview,
};

/// Column list for `overviews` queries.
const OVERVIEW_COLUMNS: &str = "\
    id, agreement_id, name, subtitle, hero_video, hero_image_path, story_image_path, \
    story_part1, story_part2, story_part3, achievements_text, challenges_text, \
    commitment_chart_text, commitments_image_path, about_us, methodology, report_name, \
    report_url, case_page_url, highlight_color, special_text_color, bg_color, \
    bg_color_2, bg_color_3, created_at, updated_at";

/// Column list for `overview_items` queries.
const ITEM_COLUMNS: &str = "\
    id, overview_id, kind, name, description, image_path, order_id, is_featured, \
    created_at, updated_at";

/// Provides overview and overview item operations.
pub struct OverviewRepo;

impl OverviewRepo {
    // -----------------------------------------------------------------------
    // Overview
    // -----------------------------------------------------------------------

    /// Create or replace an agreement's overview.
    pub async fn upsert(
        pool: &PgPool,
        agreement_id: DbId,
        input: &UpsertOverview,
    ) -> Result<Overview, sqlx::Error> {
        let query = format!(
            "INSERT INTO overviews (agreement_id, name, subtitle, hero_video, \
                 hero_image_path, story_image_path, story_part1, story_part2, story_part3, \
                 achievements_text, challenges_text, commitment_chart_text, \
                 commitments_image_path, about_us, methodology, report_name, report_url, \
                 case_page_url, highlight_color, special_text_color, bg_color, bg_color_2, \
                 bg_color_3) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                 $16, $17, $18, $19, $20, $21, $22, $23) \
             ON CONFLICT (agreement_id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 subtitle = EXCLUDED.subtitle, \
                 hero_video = EXCLUDED.hero_video, \
                 hero_image_path = EXCLUDED.hero_image_path, \
                 story_image_path = EXCLUDED.story_image_path, \
                 story_part1 = EXCLUDED.story_part1, \
                 story_part2 = EXCLUDED.story_part2, \
                 story_part3 = EXCLUDED.story_part3, \
                 achievements_text = EXCLUDED.achievements_text, \
                 challenges_text = EXCLUDED.challenges_text, \
                 commitment_chart_text = EXCLUDED.commitment_chart_text, \
                 commitments_image_path = EXCLUDED.commitments_image_path, \
                 about_us = EXCLUDED.about_us, \
                 methodology = EXCLUDED.methodology, \
                 report_name = EXCLUDED.report_name, \
                 report_url = EXCLUDED.report_url, \
                 case_page_url = EXCLUDED.case_page_url, \
                 highlight_color = EXCLUDED.highlight_color, \
                 special_text_color = EXCLUDED.special_text_color, \
                 bg_color = EXCLUDED.bg_color, \
                 bg_color_2 = EXCLUDED.bg_color_2, \
                 bg_color_3 = EXCLUDED.bg_color_3 \
             RETURNING {OVERVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, Overview>(&query)
            .bind(agreement_id)
            .bind(&input.name)
            .bind(&input.subtitle)
            .bind(&input.hero_video)
            .bind(&input.hero_image_path)
            .bind(&input.story_image_path)
            .bind(&input.story_part1)
            .bind(&input.story_part2)
            .bind(&input.story_part3)
            .bind(&input.achievements_text)
            .bind(&input.challenges_text)
            .bind(&input.commitment_chart_text)
            .bind(&input.commitments_image_path)
            .bind(&input.about_us)
            .bind(&input.methodology)
            .bind(&input.report_name)
            .bind(&input.report_url)
            .bind(&input.case_page_url)
            .bind(input.highlight_color.as_deref())
            .bind(input.special_text_color.as_deref())
            .bind(input.bg_color.as_deref())
            .bind(input.bg_color_2.as_deref())
            .bind(input.bg_color_3.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find an agreement's overview, if it has one.
    pub async fn find_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
    ) -> Result<Option<Overview>, sqlx::Error> {
        let query = format!("SELECT {OVERVIEW_COLUMNS} FROM overviews WHERE agreement_id = $1");
        sqlx::query_as::<_, Overview>(&query)
            .bind(agreement_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an agreement's overview (its items cascade).
    pub async fn delete_for_agreement(
        pool: &PgPool,
        agreement_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM overviews WHERE agreement_id = $1")
            .bind(agreement_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    /// Create an overview item of the given kind and link its commitments.
    pub async fn create_item(
        pool: &PgPool,
        overview_id: DbId,
        kind: OverviewItemKind,
        new: &CreateOverviewItem,
    ) -> Result<OverviewItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO overview_items (overview_id, kind, name, description, image_path, \
                 order_id, is_featured) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, OverviewItem>(&query)
            .bind(overview_id)
            .bind(kind)
            .bind(&new.name)
            .bind(&new.description)
            .bind(&new.image_path)
            .bind(new.order_id.unwrap_or(0))
            .bind(new.is_featured)
            .fetch_one(pool)
            .await?;

        Self::set_item_commitments(pool, item.id, &new.commitment_ids).await?;

        Ok(item)
    }

    /// Find an overview item by ID.
    pub async fn find_item(pool: &PgPool, id: DbId) -> Result<Option<OverviewItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM overview_items WHERE id = $1");
        sqlx::query_as::<_, OverviewItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an overview's items of one kind, in display order.
    pub async fn list_items(
        pool: &PgPool,
        overview_id: DbId,
        kind: OverviewItemKind,
    ) -> Result<Vec<OverviewItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM overview_items \
             WHERE overview_id = $1 AND kind = $2 \
             ORDER BY order_id, id"
        );
        sqlx::query_as::<_, OverviewItem>(&query)
            .bind(overview_id)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    /// Update an overview item; a commitment list in the payload replaces
    /// the linked set.
    pub async fn update_item(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOverviewItem,
    ) -> Result<Option<OverviewItem>, sqlx::Error> {
        let query = format!(
            "UPDATE overview_items SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 image_path = COALESCE($4, image_path), \
                 order_id = COALESCE($5, order_id), \
                 is_featured = COALESCE($6, is_featured) \
             WHERE id = $1 \
             RETURNING {ITEM_COLUMNS}"
        );
        let saved = sqlx::query_as::<_, OverviewItem>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.image_path.as_deref())
            .bind(input.order_id)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await?;

        if saved.is_some() {
            if let Some(commitment_ids) = &input.commitment_ids {
                Self::set_item_commitments(pool, id, commitment_ids).await?;
            }
        }

        Ok(saved)
    }

    /// Delete an overview item. Returns `true` if a row was deleted.
    pub async fn delete_item(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM overview_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The ids of the commitments an item highlights.
    pub async fn item_commitment_ids(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT commitment_id FROM overview_item_commitments \
             WHERE overview_item_id = $1 ORDER BY commitment_id",
        )
        .bind(item_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the set of commitments an item highlights.
    async fn set_item_commitments(
        pool: &PgPool,
        item_id: DbId,
        commitment_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM overview_item_commitments WHERE overview_item_id = $1")
            .bind(item_id)
            .execute(pool)
            .await?;
        for &commitment_id in commitment_ids {
            sqlx::query(
                "INSERT INTO overview_item_commitments (overview_item_id, commitment_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (overview_item_id, commitment_id) DO NOTHING",
            )
            .bind(item_id)
            .bind(commitment_id)
            .execute(pool)
            .await?;
        }
        Ok(())
    }
}
