//! Goal progress computation.
//!
//! Goals and progress are free-text fields; a percentage is only computed
//! when the goal parses as an integer. Parse failures degrade to zero rather
//! than surfacing an error.

/// Whether a goal string is numeric (and therefore chartable).
pub fn is_numeric_goal(goal: &str) -> bool {
    goal.trim().parse::<i64>().is_ok()
}

/// Fraction of the goal reached, as `progress / goal`.
///
/// - Non-numeric goal or empty progress: `None` (nothing to chart).
/// - Numeric goal with unparsable progress, or a zero goal: `Some(0.0)`.
pub fn percent_progress(goal: &str, progress: &str) -> Option<f64> {
    let goal_num: i64 = goal.trim().parse().ok()?;
    if progress.is_empty() {
        return None;
    }
    match progress.trim().parse::<i64>() {
        Ok(progress_num) if goal_num != 0 => Some(progress_num as f64 / goal_num as f64),
        _ => Some(0.0),
    }
}
