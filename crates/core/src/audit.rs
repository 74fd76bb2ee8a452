//! Audit-trail vocabulary and description builders.
//!
//! Every material change to a commitment, action, or attachment is recorded
//! as an immutable update row. The repositories diff an enumerated field
//! list on the write path and use these helpers to phrase the entries.

use serde::{Deserialize, Serialize};

use crate::types::Date;

// ---------------------------------------------------------------------------
// Update kinds
// ---------------------------------------------------------------------------

/// Classification of an audit update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum UpdateKind {
    /// An active action has passed its expected completion date.
    Delay,
    /// An edit to an existing commitment or action field.
    Revision,
    /// Creation of a new commitment or action.
    Addition,
    /// A change to a commitment/action status.
    #[serde(rename = "status")]
    #[sqlx(rename = "status")]
    StatusChange,
    /// Catch-all, including attachment changes.
    Other,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateKind::Delay => "delay",
            UpdateKind::Revision => "revision",
            UpdateKind::Addition => "addition",
            UpdateKind::StatusChange => "status",
            UpdateKind::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpdateKind::Delay => "Delay",
            UpdateKind::Revision => "Revision",
            UpdateKind::Addition => "Addition",
            UpdateKind::StatusChange => "Status Change",
            UpdateKind::Other => "Other",
        }
    }
}

// ---------------------------------------------------------------------------
// Field diffs
// ---------------------------------------------------------------------------

/// One changed field, captured before the row is overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Snake_case field name from the entity's enumerated field list.
    pub field: &'static str,
    pub old: String,
    pub new: String,
}

/// Compare one field's old and new rendered values.
///
/// Returns a [`FieldChange`] when they differ, `None` otherwise.
pub fn diff_field(field: &'static str, old: String, new: String) -> Option<FieldChange> {
    if old != new {
        Some(FieldChange { field, old, new })
    } else {
        None
    }
}

/// Render an optional value for diffing; `None` becomes the empty string so
/// that set/unset transitions read naturally.
pub fn render_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Descriptions
// ---------------------------------------------------------------------------

/// `"Expected Completion Date changed from 2026-01-01 to 2026-02-01"`.
pub fn revision_description(change: &FieldChange) -> String {
    format!(
        "{} changed from {} to {}",
        field_title(change.field),
        change.old,
        change.new,
    )
}

/// Attachment revisions get their own phrasing, prefixed with the entity
/// name. A previously empty field reads as an addition.
pub fn attachment_revision_description(
    attachment_name: &str,
    uploaded_by: &str,
    change: &FieldChange,
) -> String {
    let description = if change.old.is_empty() {
        if change.field == "commitment" || change.field == "action" {
            format!("{attachment_name} Added by {uploaded_by}")
        } else {
            format!(
                "{attachment_name} {} Added by {uploaded_by}",
                field_title(change.field),
            )
        }
    } else {
        format!(
            "{attachment_name} {} changed from {} to {}",
            field_title(change.field),
            change.old,
            change.new,
        )
    };
    format!("Attachment: {description}")
}

/// `"12 Days Past Deadline - 2026-06-03"`.
pub fn delay_description(expected_completion_date: Date, today: Date) -> String {
    let days = (today - expected_completion_date).num_days();
    format!("{days} Days Past Deadline - {expected_completion_date}")
}

/// Title-case a snake_case field name: `expected_completion_date` ->
/// `Expected Completion Date`.
pub fn field_title(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
