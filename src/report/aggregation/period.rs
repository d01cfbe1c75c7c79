//! Today's activity and progress toward the weekly submission goal.

use super::{CategoryTotals, count_as_f64, sum_by_category};
use crate::report::domain::TaskSubmission;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

/// Submissions per week the team aims for unless configured otherwise.
pub const DEFAULT_WEEKLY_GOAL: u32 = 50;

/// Number of recent submissions listed in [`TodaySummary`].
const RECENT_LIMIT: usize = 3;

/// Who reported most recently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentSubmission {
    /// Reporting user.
    pub user_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Activity on one report date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodaySummary {
    /// Report date.
    pub date: NaiveDate,
    /// Number of submissions.
    pub submission_count: usize,
    /// Completed work per category.
    pub totals: CategoryTotals,
    /// Hours including overtime.
    pub total_hours: f64,
    /// Most recent submissions, newest first.
    pub recent: Vec<RecentSubmission>,
}

/// Summarizes the submissions dated `date`.
#[must_use]
pub fn today_summary(records: &[TaskSubmission], date: NaiveDate) -> TodaySummary {
    let mut todays: Vec<TaskSubmission> = records
        .iter()
        .filter(|record| record.submission_date() == date)
        .cloned()
        .collect();
    todays.sort_by(|left, right| {
        right
            .created_at()
            .cmp(&left.created_at())
            .then_with(|| right.id().cmp(&left.id()))
    });
    TodaySummary {
        date,
        submission_count: todays.len(),
        totals: sum_by_category(&todays),
        total_hours: todays.iter().map(TaskSubmission::total_hours).sum(),
        recent: todays
            .iter()
            .take(RECENT_LIMIT)
            .map(|record| RecentSubmission {
                user_name: record.user_name().to_owned(),
                created_at: record.created_at(),
            })
            .collect(),
    }
}

/// Submissions so far this week against the goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyProgress {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Submissions dated on or after `week_start`.
    pub submission_count: usize,
    /// Weekly goal.
    pub goal: u32,
    /// Fraction of the goal reached, capped at 1.
    pub progress: f64,
}

/// Returns the Monday of the week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Measures progress toward `goal` for the week starting `week_start`.
///
/// A zero goal counts as reached.
#[must_use]
pub fn weekly_progress(
    records: &[TaskSubmission],
    week_start: NaiveDate,
    goal: u32,
) -> WeeklyProgress {
    let submission_count = records
        .iter()
        .filter(|record| record.submission_date() >= week_start)
        .count();
    let progress = if goal == 0 {
        1.0
    } else {
        (count_as_f64(submission_count) / f64::from(goal)).min(1.0)
    };
    WeeklyProgress {
        week_start,
        submission_count,
        goal,
        progress,
    }
}
