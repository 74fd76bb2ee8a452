//! Write-path change auditing.
//!
//! Before a commitment, action, or attachment row is overwritten, the prior
//! row is diffed against the incoming payload over an enumerated field list,
//! and one REVISION (or, for attachments, OTHER) update is recorded per
//! changed field. Audit failures are logged and skipped; they never block
//! the save itself.

use sqlx::PgPool;

use lastmile_core::audit::{
    attachment_revision_description, diff_field, render_opt, revision_description, FieldChange,
    UpdateKind,
};

use crate::models::action::{Action, UpdateAction};
use crate::models::attachment::{Attachment, UpdateAttachment};
use crate::models::commitment::{Commitment, UpdateCommitment};
use crate::models::update::NewUpdate;
use crate::repositories::UpdateRepo;

// ---------------------------------------------------------------------------
// Field diffs (enumerated per entity)
// ---------------------------------------------------------------------------

/// Changed fields between a stored commitment and its incoming payload.
pub fn diff_commitment(old: &Commitment, new: &UpdateCommitment) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let checks = [
        diff_field("name", old.name.clone(), new.name.clone()),
        diff_field("description", old.description.clone(), new.description.clone()),
        diff_field(
            "category",
            render_opt(old.category_id),
            render_opt(new.category_id),
        ),
        diff_field(
            "status",
            old.status.as_str().to_string(),
            new.status.as_str().to_string(),
        ),
        diff_field(
            "status_description",
            old.status_description.clone(),
            new.status_description.clone(),
        ),
        diff_field(
            "expected_completion_date",
            render_opt(old.expected_completion_date),
            render_opt(new.expected_completion_date),
        ),
        diff_field(
            "completion_date",
            render_opt(old.completion_date),
            render_opt(new.completion_date),
        ),
        diff_field("goal", old.goal.clone(), new.goal.clone()),
        diff_field(
            "progress_toward_goal",
            old.progress_toward_goal.clone(),
            new.progress_toward_goal.clone(),
        ),
    ];
    changes.extend(checks.into_iter().flatten());

    // order_num is only audited when the payload carries it.
    if let Some(order_num) = new.order_num {
        if let Some(change) =
            diff_field("order_num", old.order_num.to_string(), order_num.to_string())
        {
            changes.push(change);
        }
    }

    changes
}

/// Changed fields between a stored action and its incoming payload.
pub fn diff_action(old: &Action, new: &UpdateAction) -> Vec<FieldChange> {
    [
        diff_field(
            "commitment",
            render_opt(old.commitment_id),
            render_opt(new.commitment_id),
        ),
        diff_field("name", old.name.clone(), new.name.clone()),
        diff_field("description", old.description.clone(), new.description.clone()),
        diff_field(
            "status",
            old.status.as_str().to_string(),
            new.status.as_str().to_string(),
        ),
        diff_field(
            "status_description",
            old.status_description.clone(),
            new.status_description.clone(),
        ),
        diff_field(
            "expected_completion_date",
            render_opt(old.expected_completion_date),
            render_opt(new.expected_completion_date),
        ),
        diff_field(
            "completion_date",
            render_opt(old.completion_date),
            render_opt(new.completion_date),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Changed fields between a stored attachment and its incoming payload.
/// Only file, description, commitment, and action are audited.
pub fn diff_attachment(old: &Attachment, new: &UpdateAttachment) -> Vec<FieldChange> {
    [
        diff_field("file", old.file_path.clone(), new.file_path.clone()),
        diff_field("description", old.description.clone(), new.description.clone()),
        diff_field(
            "commitment",
            render_opt(old.commitment_id),
            render_opt(new.commitment_id),
        ),
        diff_field("action", render_opt(old.action_id), render_opt(new.action_id)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// ---------------------------------------------------------------------------
// Tolerant recording
// ---------------------------------------------------------------------------

/// Insert an audit update, tolerating failure.
///
/// Partial audit failure is acceptable; losing the entity save is not, so
/// insert errors are logged at WARN and swallowed.
pub async fn record(pool: &PgPool, update: NewUpdate) {
    if let Err(error) = UpdateRepo::insert(pool, &update).await {
        tracing::warn!(%error, kind = update.kind.as_str(), "Skipping failed audit update");
    }
}

/// Record one REVISION update per changed commitment/action field.
///
/// `commitment_id`/`action_id` link the updates to their owning entities;
/// action revisions pass both so the entry is re-parented to the commitment.
pub async fn record_revisions(
    pool: &PgPool,
    changes: &[FieldChange],
    commitment_id: Option<i64>,
    action_id: Option<i64>,
) {
    for change in changes {
        let update = NewUpdate::new(UpdateKind::Revision, revision_description(change))
            .commitment(commitment_id)
            .action(action_id);
        record(pool, update).await;
    }
}

/// Record one OTHER update per changed attachment field, linked to the
/// attachment's commitment/action.
pub async fn record_attachment_revisions(
    pool: &PgPool,
    attachment: &Attachment,
    uploaded_by: &str,
    changes: &[FieldChange],
) {
    for change in changes {
        let description = attachment_revision_description(&attachment.name, uploaded_by, change);
        let update = NewUpdate::new(UpdateKind::Other, description)
            .commitment(attachment.commitment_id)
            .action(attachment.action_id);
        record(pool, update).await;
    }
}
