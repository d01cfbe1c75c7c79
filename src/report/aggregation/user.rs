//! Per-user grouping and efficiency.

use super::CategoryTotals;
use crate::report::domain::TaskSubmission;
use serde::Serialize;
use std::collections::BTreeMap;

/// Added to hours before dividing so a zero-hour group never divides by zero.
pub const EFFICIENCY_EPSILON: f64 = 0.01;

/// Tasks per hour with [`EFFICIENCY_EPSILON`] added to the hours.
#[must_use]
pub fn efficiency_ratio(total_tasks: f64, total_hours: f64) -> f64 {
    total_tasks / (total_hours + EFFICIENCY_EPSILON)
}

/// Totals for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    /// Completed work per category.
    pub totals: CategoryTotals,
    /// Hours including overtime.
    pub total_hours: f64,
    /// Completed work across categories.
    pub total_tasks: f64,
    /// Number of submissions.
    pub submission_count: usize,
    /// Tasks per hour.
    pub efficiency_ratio: f64,
}

/// Groups records by user name.
#[must_use]
pub fn group_by_user(records: &[TaskSubmission]) -> BTreeMap<String, UserSummary> {
    let mut users: BTreeMap<String, UserSummary> = BTreeMap::new();
    for record in records {
        let summary = users
            .entry(record.user_name().to_owned())
            .or_insert_with(|| UserSummary {
                totals: CategoryTotals::zero(),
                total_hours: 0.0,
                total_tasks: 0.0,
                submission_count: 0,
                efficiency_ratio: 0.0,
            });
        summary.totals.add_blocks(record.blocks());
        summary.total_hours += record.total_hours();
        summary.total_tasks += record.total_tasks();
        summary.submission_count += 1;
    }
    for summary in users.values_mut() {
        summary.efficiency_ratio = efficiency_ratio(summary.total_tasks, summary.total_hours);
    }
    users
}
