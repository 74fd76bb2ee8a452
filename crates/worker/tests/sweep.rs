//! Integration tests for the delay sweep.

use chrono::NaiveDate;
use sqlx::PgPool;

use lastmile_core::audit::UpdateKind;
use lastmile_core::status::WorkStatus;
use lastmile_core::types::{Date, DbId};
use lastmile_db::models::action::CreateAction;
use lastmile_db::models::agreement::CreateAgreement;
use lastmile_db::models::commitment::CreateCommitment;
use lastmile_db::models::update::UpdateListParams;
use lastmile_db::repositories::{ActionRepo, AgreementRepo, CommitmentRepo, UpdateRepo};
use lastmile_worker::sweep::run_delay_sweep;

fn d(y: i32, m: u32, day: u32) -> Date {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

async fn seed_commitment(pool: &PgPool) -> DbId {
    let agreement = AgreementRepo::create(
        pool,
        &CreateAgreement {
            name: "Sweep Pact".into(),
            user_ids: vec![],
        },
    )
    .await
    .expect("agreement should create");

    let commitment = CommitmentRepo::create(
        pool,
        agreement.id,
        &CreateCommitment {
            name: "Deliver supplies".into(),
            description: String::new(),
            category_id: None,
            status: Some(WorkStatus::Active),
            status_description: String::new(),
            expected_completion_date: None,
            completion_date: None,
            goal: String::new(),
            progress_toward_goal: String::new(),
            order_num: None,
        },
    )
    .await
    .expect("commitment should create");

    commitment.id
}

async fn seed_action(
    pool: &PgPool,
    commitment_id: DbId,
    name: &str,
    status: WorkStatus,
    expected: Option<Date>,
) -> DbId {
    let action = ActionRepo::create(
        pool,
        &CreateAction {
            commitment_id: Some(commitment_id),
            name: name.into(),
            description: String::new(),
            status: Some(status),
            status_description: String::new(),
            expected_completion_date: expected,
            completion_date: None,
            responsible_party_ids: vec![],
        },
    )
    .await
    .expect("action should create");
    action.id
}

async fn delay_updates(pool: &PgPool, action_id: DbId) -> Vec<String> {
    UpdateRepo::list(
        pool,
        &UpdateListParams {
            kind: Some(UpdateKind::Delay),
            action_id: Some(action_id),
            ..Default::default()
        },
    )
    .await
    .expect("listing should succeed")
    .into_iter()
    .map(|u| u.description)
    .collect()
}

/// Only active actions past their deadline get a delay entry.
#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_targets_only_overdue_active_actions(pool: PgPool) {
    let commitment_id = seed_commitment(&pool).await;
    let today = d(2026, 6, 15);

    let overdue = seed_action(
        &pool,
        commitment_id,
        "Late",
        WorkStatus::Active,
        Some(d(2026, 6, 3)),
    )
    .await;
    let on_time = seed_action(
        &pool,
        commitment_id,
        "On time",
        WorkStatus::Active,
        Some(d(2026, 7, 1)),
    )
    .await;
    let complete = seed_action(
        &pool,
        commitment_id,
        "Done late but done",
        WorkStatus::Complete,
        Some(d(2026, 6, 3)),
    )
    .await;
    let undated = seed_action(&pool, commitment_id, "No deadline", WorkStatus::Active, None).await;

    // Both dated active actions are examined; only the past-due one is
    // stamped.
    let report = run_delay_sweep(&pool, today).await.expect("sweep should run");
    assert_eq!(report.checked, 2);
    assert_eq!(report.delayed, 1);

    assert_eq!(
        delay_updates(&pool, overdue).await,
        vec!["12 Days Past Deadline - 2026-06-03".to_string()],
    );
    assert!(delay_updates(&pool, on_time).await.is_empty());
    assert!(delay_updates(&pool, complete).await.is_empty());
    assert!(delay_updates(&pool, undated).await.is_empty());
}

/// Repeat sweeps accumulate entries with growing day counts, newest first.
#[sqlx::test(migrations = "../../db/migrations")]
async fn repeat_sweeps_accumulate(pool: PgPool) {
    let commitment_id = seed_commitment(&pool).await;
    let action_id = seed_action(
        &pool,
        commitment_id,
        "Slipping",
        WorkStatus::Active,
        Some(d(2026, 6, 1)),
    )
    .await;

    run_delay_sweep(&pool, d(2026, 6, 8)).await.expect("first sweep");
    run_delay_sweep(&pool, d(2026, 6, 15)).await.expect("second sweep");

    assert_eq!(
        delay_updates(&pool, action_id).await,
        vec![
            "14 Days Past Deadline - 2026-06-01".to_string(),
            "7 Days Past Deadline - 2026-06-01".to_string(),
        ],
    );
}

/// The delay entry links the action's owning commitment and first
/// responsible party.
#[sqlx::test(migrations = "../../db/migrations")]
async fn delay_entry_carries_links(pool: PgPool) {
    let commitment_id = seed_commitment(&pool).await;
    let action_id = seed_action(
        &pool,
        commitment_id,
        "Linked",
        WorkStatus::Active,
        Some(d(2026, 6, 10)),
    )
    .await;

    run_delay_sweep(&pool, d(2026, 6, 15)).await.expect("sweep should run");

    let updates = UpdateRepo::list(
        &pool,
        &UpdateListParams {
            kind: Some(UpdateKind::Delay),
            action_id: Some(action_id),
            ..Default::default()
        },
    )
    .await
    .expect("listing should succeed");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].commitment_id, Some(commitment_id));
    assert_eq!(updates[0].action_id, Some(action_id));
}
