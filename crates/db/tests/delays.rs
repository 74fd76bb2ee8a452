//! Integration tests for delay bookkeeping:
//! - Only dated active actions are sweep candidates
//! - DELAY updates carry the day count and links
//! - Recording is append-only, so repeat sweeps add repeat rows

use chrono::NaiveDate;
use sqlx::PgPool;

use lastmile_core::audit::UpdateKind;
use lastmile_core::status::WorkStatus;
use lastmile_core::types::Date;
use lastmile_db::models::action::CreateAction;
use lastmile_db::models::agreement::CreateAgreement;
use lastmile_db::models::commitment::CreateCommitment;
use lastmile_db::models::update::UpdateListParams;
use lastmile_db::repositories::{ActionRepo, AgreementRepo, CommitmentRepo, UpdateRepo};

fn d(y: i32, m: u32, day: u32) -> Date {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

async fn seed_action(
    pool: &PgPool,
    status: WorkStatus,
    expected: Option<Date>,
) -> lastmile_db::models::action::Action {
    let agreement = AgreementRepo::create(
        pool,
        &CreateAgreement {
            name: format!("Delay {status:?} {expected:?}"),
            user_ids: Vec::new(),
        },
    )
    .await
    .unwrap();
    let commitment = CommitmentRepo::create(
        pool,
        agreement.id,
        &CreateCommitment {
            name: "Host commitment".to_string(),
            description: String::new(),
            category_id: None,
            status: None,
            status_description: String::new(),
            expected_completion_date: None,
            completion_date: None,
            goal: String::new(),
            progress_toward_goal: String::new(),
            order_num: None,
        },
    )
    .await
    .unwrap();
    ActionRepo::create(
        pool,
        &CreateAction {
            commitment_id: Some(commitment.id),
            name: "Tracked action".to_string(),
            description: String::new(),
            status: Some(status),
            status_description: String::new(),
            expected_completion_date: expected,
            completion_date: None,
            responsible_party_ids: Vec::new(),
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_active_dated_actions_listed(pool: PgPool) {
    let past_due = seed_action(&pool, WorkStatus::Active, Some(d(2026, 6, 1))).await;
    let future = seed_action(&pool, WorkStatus::Active, Some(d(2026, 7, 1))).await;
    // Dated but not active; active with no date.
    seed_action(&pool, WorkStatus::Pending, Some(d(2026, 6, 1))).await;
    seed_action(&pool, WorkStatus::Active, None).await;

    // Both dated active actions are sweep candidates, earliest deadline
    // first; the past-due comparison happens in the sweep itself.
    let listed = ActionRepo::list_active_dated(&pool).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![past_due.id, future.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delay_update_text_and_links(pool: PgPool) {
    let today = d(2026, 6, 15);
    let action = seed_action(&pool, WorkStatus::Active, Some(d(2026, 6, 3))).await;

    let delay = UpdateRepo::add_delay(&pool, &action, None, today)
        .await
        .unwrap();
    assert_eq!(delay.kind, UpdateKind::Delay);
    assert_eq!(delay.description, "12 Days Past Deadline - 2026-06-03");
    assert_eq!(delay.action_id, Some(action.id));
    assert_eq!(delay.commitment_id, action.commitment_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeat_delays_accumulate(pool: PgPool) {
    let action = seed_action(&pool, WorkStatus::Active, Some(d(2026, 6, 1))).await;

    UpdateRepo::add_delay(&pool, &action, None, d(2026, 6, 8))
        .await
        .unwrap();
    UpdateRepo::add_delay(&pool, &action, None, d(2026, 6, 15))
        .await
        .unwrap();

    let delays = UpdateRepo::list(
        &pool,
        &UpdateListParams {
            kind: Some(UpdateKind::Delay),
            action_id: Some(action.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(delays.len(), 2);
    // Newest first.
    assert_eq!(delays[0].description, "14 Days Past Deadline - 2026-06-01");
    assert_eq!(delays[1].description, "7 Days Past Deadline - 2026-06-01");
}
