//! Commitment/action status enum and the derived schedule label.
//!
//! The stored status is one of five values chosen by the user. The schedule
//! label (ongoing / upcoming / overdue) is derived from the expected
//! completion date at read time and is never persisted.

use serde::{Deserialize, Serialize};

use crate::types::Date;

/// How many days of slack the `upcoming` window allows.
const UPCOMING_WINDOW_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Stored status
// ---------------------------------------------------------------------------

/// Stored lifecycle status shared by commitments and actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum WorkStatus {
    Pending,
    Active,
    Complete,
    Failed,
    Unknown,
}

impl WorkStatus {
    /// The wire/database value.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "pending",
            WorkStatus::Active => "active",
            WorkStatus::Complete => "complete",
            WorkStatus::Failed => "failed",
            WorkStatus::Unknown => "unknown",
        }
    }

    /// Human-readable label shown in dashboards and exports.
    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "Not Started",
            WorkStatus::Active => "Active",
            WorkStatus::Complete => "Complete",
            WorkStatus::Failed => "Failed",
            WorkStatus::Unknown => "Unknown",
        }
    }

    /// All statuses in dashboard display order.
    pub const ALL: [WorkStatus; 5] = [
        WorkStatus::Pending,
        WorkStatus::Active,
        WorkStatus::Complete,
        WorkStatus::Failed,
        WorkStatus::Unknown,
    ];

    /// Parse a wire value. Returns `None` for unrecognised input.
    pub fn parse(s: &str) -> Option<WorkStatus> {
        match s {
            "pending" => Some(WorkStatus::Pending),
            "active" => Some(WorkStatus::Active),
            "complete" => Some(WorkStatus::Complete),
            "failed" => Some(WorkStatus::Failed),
            "unknown" => Some(WorkStatus::Unknown),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived schedule label
// ---------------------------------------------------------------------------

/// Derived (never persisted) schedule label for an active item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Ongoing,
    Upcoming,
    Overdue,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Ongoing => "ongoing",
            ScheduleStatus::Upcoming => "upcoming",
            ScheduleStatus::Overdue => "overdue",
        }
    }
}

/// Derive the schedule label for an item.
///
/// Returns `None` (rendered as an empty label) unless the item is active and
/// has an expected completion date.
pub fn schedule_status(
    status: WorkStatus,
    expected_completion_date: Option<Date>,
    today: Date,
) -> Option<ScheduleStatus> {
    let date = expected_completion_date?;
    if status != WorkStatus::Active {
        return None;
    }
    if date < today {
        Some(ScheduleStatus::Overdue)
    } else if date + chrono::Duration::days(UPCOMING_WINDOW_DAYS) < today {
        // Currently unreachable: the overdue arm above claims every past
        // date, and only a past date can be more than the window behind
        // today. Preserved deliberately rather than corrected.
        Some(ScheduleStatus::Upcoming)
    } else {
        Some(ScheduleStatus::Ongoing)
    }
}

/// The empty-or-label string form used in API payloads and exports.
pub fn schedule_label(
    status: WorkStatus,
    expected_completion_date: Option<Date>,
    today: Date,
) -> &'static str {
    schedule_status(status, expected_completion_date, today)
        .map(|s| s.as_str())
        .unwrap_or("")
}

// ---------------------------------------------------------------------------
// Display colors (microsite presentation buckets)
// ---------------------------------------------------------------------------

/// Map a status plus its derived schedule label to a display color bucket.
pub fn status_color(
    status: WorkStatus,
    expected_completion_date: Option<Date>,
    today: Date,
) -> &'static str {
    match status {
        WorkStatus::Pending => "light",
        WorkStatus::Complete => "success",
        WorkStatus::Failed => "dark",
        _ => match schedule_status(status, expected_completion_date, today) {
            Some(ScheduleStatus::Overdue) => "danger",
            Some(ScheduleStatus::Upcoming) => "warning",
            _ => "primary",
        },
    }
}

/// Text color paired with a status color bucket.
pub fn text_color(status_color: &str) -> &'static str {
    match status_color {
        "light" | "warning" | "primary" => "text-dark",
        _ => "text-white",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TODAY: fn() -> Date = || d(2026, 6, 15);

    #[test]
    fn inactive_status_has_no_label() {
        for status in [
            WorkStatus::Pending,
            WorkStatus::Complete,
            WorkStatus::Failed,
            WorkStatus::Unknown,
        ] {
            assert_eq!(
                schedule_status(status, Some(d(2026, 1, 1)), TODAY()),
                None,
                "{status:?} must not derive a schedule label",
            );
        }
    }

    #[test]
    fn missing_date_has_no_label() {
        assert_eq!(schedule_status(WorkStatus::Active, None, TODAY()), None);
        assert_eq!(schedule_label(WorkStatus::Active, None, TODAY()), "");
    }

    #[test]
    fn past_date_is_overdue() {
        assert_eq!(
            schedule_status(WorkStatus::Active, Some(d(2026, 6, 14)), TODAY()),
            Some(ScheduleStatus::Overdue),
        );
    }

    #[test]
    fn far_past_date_is_still_overdue() {
        // The overdue arm always wins for past dates, regardless of how far
        // past the upcoming window they are.
        assert_eq!(
            schedule_status(WorkStatus::Active, Some(d(2020, 1, 1)), TODAY()),
            Some(ScheduleStatus::Overdue),
        );
    }

    #[test]
    fn today_is_ongoing() {
        assert_eq!(
            schedule_status(WorkStatus::Active, Some(TODAY()), TODAY()),
            Some(ScheduleStatus::Ongoing),
        );
    }

    #[test]
    fn future_date_is_ongoing() {
        assert_eq!(
            schedule_status(WorkStatus::Active, Some(d(2026, 12, 31)), TODAY()),
            Some(ScheduleStatus::Ongoing),
        );
    }

    #[test]
    fn overdue_color_is_danger() {
        assert_eq!(
            status_color(WorkStatus::Active, Some(d(2026, 1, 1)), TODAY()),
            "danger",
        );
        assert_eq!(text_color("danger"), "text-white");
    }

    #[test]
    fn fixed_bucket_colors() {
        assert_eq!(status_color(WorkStatus::Pending, None, TODAY()), "light");
        assert_eq!(status_color(WorkStatus::Complete, None, TODAY()), "success");
        assert_eq!(status_color(WorkStatus::Failed, None, TODAY()), "dark");
        assert_eq!(status_color(WorkStatus::Unknown, None, TODAY()), "primary");
        assert_eq!(text_color("light"), "text-dark");
        assert_eq!(text_color("success"), "text-white");
    }

    #[test]
    fn parse_round_trips() {
        for status in WorkStatus::ALL {
            assert_eq!(WorkStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(WorkStatus::parse("overdue"), None);
    }
}
