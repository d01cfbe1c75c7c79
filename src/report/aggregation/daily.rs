//! Per-day grouping.

use super::CategoryTotals;
use crate::report::domain::TaskSubmission;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals for one report date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// Report date.
    pub date: NaiveDate,
    /// Completed work per category.
    pub totals: CategoryTotals,
    /// Completed work across categories.
    pub total_tasks: f64,
    /// Hours including overtime.
    pub total_hours: f64,
    /// Number of submissions.
    pub submission_count: usize,
}

impl DailySummary {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            totals: CategoryTotals::zero(),
            total_tasks: 0.0,
            total_hours: 0.0,
            submission_count: 0,
        }
    }
}

/// Groups records by report date, ascending.
#[must_use]
pub fn group_by_day(records: &[TaskSubmission]) -> Vec<DailySummary> {
    let mut days: BTreeMap<NaiveDate, DailySummary> = BTreeMap::new();
    for record in records {
        let date = record.submission_date();
        let day = days
            .entry(date)
            .or_insert_with(|| DailySummary::empty(date));
        day.totals.add_blocks(record.blocks());
        day.total_tasks += record.total_tasks();
        day.total_hours += record.total_hours();
        day.submission_count += 1;
    }
    days.into_values().collect()
}
