//! CSV export handlers.
//!
//! Exports serve the whole agreement's commitments or actions as a CSV
//! download. Cell values mirror what the dashboard shows: status labels
//! rather than wire values, names resolved from ids, derived schedule labels
//! where the stored status alone is not enough.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use chrono::Utc;
use lastmile_core::export::{csv_document, export_filename};
use lastmile_core::status::schedule_label;
use lastmile_core::types::{Date, DbId};
use lastmile_db::models::action::ActionListParams;
use lastmile_db::models::commitment::CommitmentListParams;
use lastmile_db::repositories::{ActionRepo, ActorRepo, CategoryRepo, CommitmentRepo};

use super::agreements::resolve_scope;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const COMMITMENT_HEADER: [&str; 10] = [
    "name",
    "category",
    "description",
    "status",
    "schedule",
    "status_description",
    "expected_completion_date",
    "completion_date",
    "goal",
    "progress_toward_goal",
];

const ACTION_HEADER: [&str; 8] = [
    "name",
    "commitment",
    "responsible_parties",
    "description",
    "status",
    "schedule",
    "expected_completion_date",
    "completion_date",
];

fn date_cell(date: Option<Date>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

fn csv_response(body: String, today: Date) -> AppResult<(HeaderMap, String)> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8"));
    let disposition = format!("attachment; filename=\"{}\"", export_filename(today));
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::InternalError(format!("Invalid header value: {e}")))?,
    );
    Ok((headers, body))
}

/// GET /api/v1/agreements/{slug}/commitments/export
pub async fn commitments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<(HeaderMap, String)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let today = Utc::now().date_naive();

    let categories: HashMap<DbId, String> =
        CategoryRepo::list_for_agreement(&state.pool, agreement.id)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

    let rows: Vec<Vec<String>> = CommitmentRepo::list_for_agreement(
        &state.pool,
        agreement.id,
        &CommitmentListParams::default(),
    )
    .await?
    .into_iter()
    .map(|c| {
        vec![
            c.name.clone(),
            c.category_id
                .and_then(|id| categories.get(&id).cloned())
                .unwrap_or_default(),
            c.description.clone(),
            c.status.label().to_string(),
            schedule_label(c.status, c.expected_completion_date, today).to_string(),
            c.status_description.clone(),
            date_cell(c.expected_completion_date),
            date_cell(c.completion_date),
            c.goal.clone(),
            c.progress_toward_goal.clone(),
        ]
    })
    .collect();

    csv_response(csv_document(&COMMITMENT_HEADER, &rows), today)
}

/// GET /api/v1/agreements/{slug}/actions/export
pub async fn actions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<(HeaderMap, String)> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let today = Utc::now().date_naive();

    let commitments: HashMap<DbId, String> = CommitmentRepo::list_for_agreement(
        &state.pool,
        agreement.id,
        &CommitmentListParams::default(),
    )
    .await?
    .into_iter()
    .map(|c| (c.id, c.name))
    .collect();

    let actors: HashMap<DbId, String> = ActorRepo::list_for_agreement(&state.pool, agreement.id)
        .await?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();

    let listed = ActionRepo::list_for_agreement(
        &state.pool,
        agreement.id,
        &ActionListParams::default(),
        today,
    )
    .await?;

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(listed.len());
    for action in listed {
        let party_names: Vec<String> = ActionRepo::responsible_party_ids(&state.pool, action.id)
            .await?
            .into_iter()
            .filter_map(|id| actors.get(&id).cloned())
            .collect();
        rows.push(vec![
            action.name.clone(),
            action
                .commitment_id
                .and_then(|id| commitments.get(&id).cloned())
                .unwrap_or_default(),
            party_names.join("; "),
            action.description.clone(),
            action.status.label().to_string(),
            schedule_label(action.status, action.expected_completion_date, today).to_string(),
            date_cell(action.expected_completion_date),
            date_cell(action.completion_date),
        ]);
    }

    csv_response(csv_document(&ACTION_HEADER, &rows), today)
}
