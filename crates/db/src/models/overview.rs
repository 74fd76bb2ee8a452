//! Overview (microsite narrative) and overview item models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lastmile_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// A row from the `overviews` table. One per agreement.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Overview {
    pub id: DbId,
    pub agreement_id: Option<DbId>,
    pub name: String,
    pub subtitle: String,
    pub hero_video: String,
    pub hero_image_path: String,
    pub story_image_path: String,
    pub story_part1: String,
    pub story_part2: String,
    pub story_part3: String,
    pub achievements_text: String,
    pub challenges_text: String,
    pub commitment_chart_text: String,
    pub commitments_image_path: String,
    pub about_us: String,
    pub methodology: String,
    pub report_name: String,
    pub report_url: String,
    pub case_page_url: String,
    pub highlight_color: Option<String>,
    pub special_text_color: Option<String>,
    pub bg_color: Option<String>,
    pub bg_color_2: Option<String>,
    pub bg_color_3: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing an agreement's overview.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertOverview {
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub hero_video: String,
    #[serde(default)]
    pub hero_image_path: String,
    #[serde(default)]
    pub story_image_path: String,
    #[serde(default)]
    pub story_part1: String,
    #[serde(default)]
    pub story_part2: String,
    #[serde(default)]
    pub story_part3: String,
    #[serde(default)]
    pub achievements_text: String,
    #[serde(default)]
    pub challenges_text: String,
    #[serde(default)]
    pub commitment_chart_text: String,
    #[serde(default)]
    pub commitments_image_path: String,
    #[serde(default)]
    pub about_us: String,
    #[serde(default)]
    pub methodology: String,
    #[serde(default)]
    pub report_name: String,
    #[serde(default)]
    pub report_url: String,
    #[serde(default)]
    pub case_page_url: String,
    pub highlight_color: Option<String>,
    pub special_text_color: Option<String>,
    pub bg_color: Option<String>,
    pub bg_color_2: Option<String>,
    pub bg_color_3: Option<String>,
}

// ---------------------------------------------------------------------------
// Overview items (achievements / challenges / recommendations)
// ---------------------------------------------------------------------------

/// Discriminator for the three overview item collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum OverviewItemKind {
    Achievement,
    Challenge,
    Recommendation,
}

impl OverviewItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverviewItemKind::Achievement => "achievement",
            OverviewItemKind::Challenge => "challenge",
            OverviewItemKind::Recommendation => "recommendation",
        }
    }
}

/// A row from the `overview_items` table. Ordered by `order_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OverviewItem {
    pub id: DbId,
    pub overview_id: Option<DbId>,
    pub kind: OverviewItemKind,
    pub name: String,
    pub description: String,
    pub image_path: String,
    pub order_id: i16,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an overview item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOverviewItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_path: String,
    pub order_id: Option<i16>,
    #[serde(default)]
    pub is_featured: bool,
    /// Commitments this item highlights.
    #[serde(default)]
    pub commitment_ids: Vec<DbId>,
}

/// DTO for updating an overview item.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOverviewItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub order_id: Option<i16>,
    pub is_featured: Option<bool>,
    pub commitment_ids: Option<Vec<DbId>>,
}
