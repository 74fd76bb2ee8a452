//! Handler for `/agreements/{slug}/dashboard`.
//!
//! One round-trip payload for the staff dashboard: commitment and action
//! counts per status bucket, per-actor workloads, and the most recent
//! timeline entries. The active bucket is split at read time into
//! "Active (not overdue)" and "Overdue".

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use lastmile_core::status::{schedule_status, ScheduleStatus, WorkStatus};
use lastmile_core::types::Date;
use lastmile_db::models::action::ActionListParams;
use lastmile_db::models::actor::ActorWorkload;
use lastmile_db::models::commitment::CommitmentListParams;
use lastmile_db::models::update::Update;
use lastmile_db::repositories::{ActionRepo, ActorRepo, CommitmentRepo, UpdateRepo};
use serde::Serialize;

use super::agreements::resolve_scope;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const RECENT_UPDATES: i64 = 10;

/// One slice of a status chart.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub key: &'static str,
    pub label: &'static str,
    pub count: i64,
}

/// The dashboard payload.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub commitment_counts: Vec<StatusCount>,
    pub action_counts: Vec<StatusCount>,
    pub actor_workloads: Vec<ActorWorkload>,
    pub recent_updates: Vec<Update>,
}

/// Bucket items by status, splitting the active bucket into on-schedule and
/// overdue halves. Every bucket appears, zero counts included.
fn status_buckets(items: &[(WorkStatus, Option<Date>)], today: Date) -> Vec<StatusCount> {
    let mut buckets = Vec::with_capacity(WorkStatus::ALL.len() + 1);
    for status in WorkStatus::ALL {
        if status == WorkStatus::Active {
            let overdue = items
                .iter()
                .filter(|(s, date)| {
                    *s == WorkStatus::Active
                        && schedule_status(*s, *date, today) == Some(ScheduleStatus::Overdue)
                })
                .count() as i64;
            let active = items
                .iter()
                .filter(|(s, _)| *s == WorkStatus::Active)
                .count() as i64
                - overdue;
            buckets.push(StatusCount {
                key: "active",
                label: "Active (not overdue)",
                count: active,
            });
            buckets.push(StatusCount {
                key: "overdue",
                label: "Overdue",
                count: overdue,
            });
        } else {
            buckets.push(StatusCount {
                key: status.as_str(),
                label: status.label(),
                count: items.iter().filter(|(s, _)| *s == status).count() as i64,
            });
        }
    }
    buckets
}

/// GET /api/v1/agreements/{slug}/dashboard
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let agreement = resolve_scope(&state, &slug, &user).await?;
    let today = Utc::now().date_naive();

    let commitments = CommitmentRepo::list_for_agreement(
        &state.pool,
        agreement.id,
        &CommitmentListParams::default(),
    )
    .await?;
    let commitment_counts = status_buckets(
        &commitments
            .iter()
            .map(|c| (c.status, c.expected_completion_date))
            .collect::<Vec<_>>(),
        today,
    );

    let actions = ActionRepo::list_for_agreement(
        &state.pool,
        agreement.id,
        &ActionListParams::default(),
        today,
    )
    .await?;
    let action_counts = status_buckets(
        &actions
            .iter()
            .map(|a| (a.status, a.expected_completion_date))
            .collect::<Vec<_>>(),
        today,
    );

    let actor_workloads =
        ActorRepo::workloads_for_agreement(&state.pool, agreement.id, today).await?;
    let recent_updates =
        UpdateRepo::list_for_agreement(&state.pool, agreement.id, Some(RECENT_UPDATES)).await?;

    Ok(Json(DataResponse {
        data: Dashboard {
            commitment_counts,
            action_counts,
            actor_workloads,
            recent_updates,
        },
    }))
}
