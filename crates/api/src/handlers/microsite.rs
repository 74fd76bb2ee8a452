//! Handler for the public microsite payload.
//!
//! `/microsite/{slug}` is the one unauthenticated read in the API: it serves
//! everything the public agreement page renders in a single response. Only
//! agreements with a published overview are visible here.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use lastmile_core::error::CoreError;
use lastmile_core::progress::percent_progress;
use lastmile_core::status::{schedule_label, status_color, text_color};
use lastmile_db::models::agreement::Agreement;
use lastmile_db::models::commitment::{Commitment, CommitmentListParams};
use lastmile_db::models::document::Document;
use lastmile_db::models::overview::{Overview, OverviewItemKind};
use lastmile_db::repositories::{AgreementRepo, CommitmentRepo, DocumentRepo, OverviewRepo};
use serde::Serialize;

use super::overviews::{with_commitments, OverviewItemResponse};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A commitment with the derived presentation fields the microsite renders.
#[derive(Debug, Serialize)]
pub struct MicrositeCommitment {
    #[serde(flatten)]
    pub commitment: Commitment,
    /// Fraction of a numeric goal reached, if chartable.
    pub percent_progress: Option<f64>,
    /// Empty unless the commitment is active with a deadline.
    pub schedule_label: &'static str,
    pub status_color: &'static str,
    pub text_color: &'static str,
}

/// The full public page payload.
#[derive(Debug, Serialize)]
pub struct Microsite {
    pub agreement: Agreement,
    pub overview: Overview,
    pub achievements: Vec<OverviewItemResponse>,
    pub challenges: Vec<OverviewItemResponse>,
    pub recommendations: Vec<OverviewItemResponse>,
    pub documents: Vec<Document>,
    pub commitments: Vec<MicrositeCommitment>,
}

async fn items_of(
    state: &AppState,
    overview_id: lastmile_core::types::DbId,
    kind: OverviewItemKind,
) -> AppResult<Vec<OverviewItemResponse>> {
    let items = OverviewRepo::list_items(&state.pool, overview_id, kind).await?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(with_commitments(state, item).await?);
    }
    Ok(out)
}

/// GET /api/v1/microsite/{slug}
pub async fn get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Microsite>>> {
    let agreement = AgreementRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::SlugNotFound {
                entity: "Agreement",
                slug: slug.clone(),
            })
        })?;

    // No overview means the agreement has not published a microsite.
    let overview = OverviewRepo::find_for_agreement(&state.pool, agreement.id)
        .await?
        .ok_or(AppError::Core(CoreError::SlugNotFound {
            entity: "Microsite",
            slug,
        }))?;

    let achievements = items_of(&state, overview.id, OverviewItemKind::Achievement).await?;
    let challenges = items_of(&state, overview.id, OverviewItemKind::Challenge).await?;
    let recommendations = items_of(&state, overview.id, OverviewItemKind::Recommendation).await?;
    let documents = DocumentRepo::list_for_overview(&state.pool, overview.id).await?;

    let today = Utc::now().date_naive();
    let commitments = CommitmentRepo::list_for_agreement(
        &state.pool,
        agreement.id,
        &CommitmentListParams::default(),
    )
    .await?
    .into_iter()
    .map(|c| {
        let color = status_color(c.status, c.expected_completion_date, today);
        MicrositeCommitment {
            percent_progress: percent_progress(&c.goal, &c.progress_toward_goal),
            schedule_label: schedule_label(c.status, c.expected_completion_date, today),
            status_color: color,
            text_color: text_color(color),
            commitment: c,
        }
    })
    .collect();

    Ok(Json(DataResponse {
        data: Microsite {
            agreement,
            overview,
            achievements,
            challenges,
            recommendations,
            documents,
            commitments,
        },
    }))
}
