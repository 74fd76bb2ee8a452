//! Integration tests for the write-path audit trail:
//! - Creations record one ADDITION update
//! - Each changed field on save records one REVISION update
//! - Action revisions are re-parented onto the owning commitment
//! - Attachments derive their commitment link and use their own phrasing
//! - Deleting linked entities unlinks updates without losing their text

use chrono::NaiveDate;
use sqlx::PgPool;

use lastmile_core::audit::UpdateKind;
use lastmile_core::status::WorkStatus;
use lastmile_db::models::action::{CreateAction, UpdateAction};
use lastmile_db::models::agreement::CreateAgreement;
use lastmile_db::models::attachment::{CreateAttachment, UpdateAttachment};
use lastmile_db::models::commitment::{Commitment, CreateCommitment, UpdateCommitment};
use lastmile_db::models::update::UpdateListParams;
use lastmile_db::repositories::{
    ActionRepo, AgreementRepo, AttachmentRepo, CommitmentRepo, UpdateRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_commitment(pool: &PgPool, name: &str) -> Commitment {
    let agreement = AgreementRepo::create(
        pool,
        &CreateAgreement {
            name: format!("{name} Agreement"),
            user_ids: Vec::new(),
        },
    )
    .await
    .unwrap();
    CommitmentRepo::create(
        pool,
        agreement.id,
        &CreateCommitment {
            name: name.to_string(),
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
    .unwrap()
}

fn unchanged_update(commitment: &Commitment) -> UpdateCommitment {
    UpdateCommitment {
        name: commitment.name.clone(),
        description: commitment.description.clone(),
        category_id: commitment.category_id,
        status: commitment.status,
        status_description: commitment.status_description.clone(),
        expected_completion_date: commitment.expected_completion_date,
        completion_date: commitment.completion_date,
        goal: commitment.goal.clone(),
        progress_toward_goal: commitment.progress_toward_goal.clone(),
        order_num: None,
    }
}

fn commitment_filter(commitment_id: i64) -> UpdateListParams {
    UpdateListParams {
        commitment_id: Some(commitment_id),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test: Creation records an ADDITION
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commitment_creation_records_addition(pool: PgPool) {
    let commitment = seed_commitment(&pool, "Audited Creation").await;

    let updates = UpdateRepo::list(&pool, &commitment_filter(commitment.id))
        .await
        .unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].kind, UpdateKind::Addition);
    assert_eq!(updates[0].description, "Commitment Added");
    assert_eq!(updates[0].commitment_id, Some(commitment.id));
}

// ---------------------------------------------------------------------------
// Test: N changed fields record N REVISIONs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commitment_save_records_one_revision_per_field(pool: PgPool) {
    let commitment = seed_commitment(&pool, "Audited Edit").await;

    let mut input = unchanged_update(&commitment);
    input.status = WorkStatus::Active;
    input.goal = "100".to_string();
    input.expected_completion_date = NaiveDate::from_ymd_opt(2027, 3, 1);
    CommitmentRepo::update(&pool, commitment.id, &input)
        .await
        .unwrap()
        .unwrap();

    let revisions = UpdateRepo::list(
        &pool,
        &UpdateListParams {
            kind: Some(UpdateKind::Revision),
            commitment_id: Some(commitment.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(revisions.len(), 3);

    let descriptions: Vec<&str> = revisions.iter().map(|u| u.description.as_str()).collect();
    assert!(descriptions.contains(&"Status changed from pending to active"));
    assert!(descriptions.contains(&"Goal changed from  to 100"));
    assert!(descriptions
        .contains(&"Expected Completion Date changed from  to 2027-03-01"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unchanged_save_records_nothing(pool: PgPool) {
    let commitment = seed_commitment(&pool, "No-op Edit").await;

    CommitmentRepo::update(&pool, commitment.id, &unchanged_update(&commitment))
        .await
        .unwrap()
        .unwrap();

    let updates = UpdateRepo::list(&pool, &commitment_filter(commitment.id))
        .await
        .unwrap();
    // Only the creation ADDITION.
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].kind, UpdateKind::Addition);
}

// ---------------------------------------------------------------------------
// Test: Action revisions are re-parented onto the commitment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_action_revision_links_commitment(pool: PgPool) {
    let commitment = seed_commitment(&pool, "Re-parenting").await;
    let action = ActionRepo::create(
        &pool,
        &CreateAction {
            commitment_id: Some(commitment.id),
            name: "Survey site".to_string(),
            description: String::new(),
            status: None,
            status_description: String::new(),
            expected_completion_date: None,
            completion_date: None,
            responsible_party_ids: Vec::new(),
        },
    )
    .await
    .unwrap();

    ActionRepo::update(
        &pool,
        action.id,
        &UpdateAction {
            commitment_id: Some(commitment.id),
            name: "Survey entire site".to_string(),
            description: String::new(),
            status: action.status,
            status_description: String::new(),
            expected_completion_date: None,
            completion_date: None,
            responsible_party_ids: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    // Both the action ADDITION and its revision appear on the commitment's
    // timeline.
    let updates = UpdateRepo::list(&pool, &commitment_filter(commitment.id))
        .await
        .unwrap();
    let revision = updates
        .iter()
        .find(|u| u.kind == UpdateKind::Revision)
        .unwrap();
    assert_eq!(revision.commitment_id, Some(commitment.id));
    assert_eq!(revision.action_id, Some(action.id));
    assert_eq!(
        revision.description,
        "Name changed from Survey site to Survey entire site",
    );
    assert!(updates
        .iter()
        .any(|u| u.kind == UpdateKind::Addition && u.description == "Action Added"));
}

// ---------------------------------------------------------------------------
// Test: Attachments derive their commitment and phrase their own updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attachment_derives_commitment_from_action(pool: PgPool) {
    let commitment = seed_commitment(&pool, "Attachments").await;
    let action = ActionRepo::create(
        &pool,
        &CreateAction {
            commitment_id: Some(commitment.id),
            name: "Publish report".to_string(),
            description: String::new(),
            status: None,
            status_description: String::new(),
            expected_completion_date: None,
            completion_date: None,
            responsible_party_ids: Vec::new(),
        },
    )
    .await
    .unwrap();
    let uploader = UserRepo::create(&pool, "amara", "not-a-real-hash", "staff")
        .await
        .unwrap();

    // Linked only to the action; the commitment comes from the action.
    let attachment = AttachmentRepo::create(
        &pool,
        &CreateAttachment {
            name: "Report.pdf".to_string(),
            file_path: "attachments/report-v1.pdf".to_string(),
            description: String::new(),
            commitment_id: None,
            action_id: Some(action.id),
        },
        uploader.id,
        &uploader.username,
    )
    .await
    .unwrap();
    assert_eq!(attachment.commitment_id, Some(commitment.id));

    let others = UpdateRepo::list(
        &pool,
        &UpdateListParams {
            kind: Some(UpdateKind::Other),
            commitment_id: Some(commitment.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].description, "Attachment: Report.pdf Added by amara");

    // Changing the file records an attachment-phrased OTHER update.
    AttachmentRepo::update(
        &pool,
        attachment.id,
        &UpdateAttachment {
            file_path: "attachments/report-v2.pdf".to_string(),
            description: String::new(),
            commitment_id: Some(commitment.id),
            action_id: Some(action.id),
        },
        &uploader.username,
    )
    .await
    .unwrap()
    .unwrap();

    let others = UpdateRepo::list(
        &pool,
        &UpdateListParams {
            kind: Some(UpdateKind::Other),
            commitment_id: Some(commitment.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(others.len(), 2);
    assert!(others.iter().any(|u| u.description
        == "Attachment: Report.pdf File changed from attachments/report-v1.pdf \
            to attachments/report-v2.pdf"));
}

// ---------------------------------------------------------------------------
// Test: Deleting a commitment unlinks its updates but keeps the text
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_unlinks_updates(pool: PgPool) {
    let commitment = seed_commitment(&pool, "Unlink Test").await;
    CommitmentRepo::delete(&pool, commitment.id).await.unwrap();

    // The ADDITION row survives with its link cleared.
    let all = UpdateRepo::list(&pool, &UpdateListParams::default())
        .await
        .unwrap();
    let addition = all
        .iter()
        .find(|u| u.description == "Commitment Added")
        .unwrap();
    assert_eq!(addition.commitment_id, None);
}
