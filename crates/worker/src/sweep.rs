//! The delay sweep.
//!
//! Walks every active action that has an expected completion date and records
//! a DELAY update for each one past due, linked to the action, its owning
//! commitment, and the first responsible party. The sweep is not idempotent:
//! running it again adds another entry with a larger day count, which is how
//! the timeline shows a delay growing week over week.

use sqlx::PgPool;

use lastmile_core::types::Date;
use lastmile_db::repositories::{ActionRepo, UpdateRepo};

/// Outcome of one sweep run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DelaySweepReport {
    /// Dated active actions examined.
    pub checked: usize,
    /// DELAY updates written.
    pub delayed: usize,
}

/// Run the delay sweep for the given day.
pub async fn run_delay_sweep(pool: &PgPool, today: Date) -> Result<DelaySweepReport, sqlx::Error> {
    let candidates = ActionRepo::list_active_dated(pool).await?;
    let mut report = DelaySweepReport {
        checked: candidates.len(),
        delayed: 0,
    };

    for action in &candidates {
        if !action.expected_completion_date.is_some_and(|date| date < today) {
            continue;
        }
        let responsible = ActionRepo::first_responsible_party(pool, action.id).await?;
        let update = UpdateRepo::add_delay(pool, action, responsible, today).await?;
        tracing::info!(
            action_id = action.id,
            update_id = update.id,
            description = %update.description,
            "Recorded delay"
        );
        report.delayed += 1;
    }

    Ok(report)
}
