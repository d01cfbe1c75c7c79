//! Per-batch breakdowns.

use super::CategoryTotals;
use crate::report::domain::{TaskCategory, TaskSubmission};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One batch named by one category of one submission.
///
/// Completed and hours are the category's full values; they are not split
/// between the batches of a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    /// Batch name.
    pub batch: String,
    /// Category that named the batch.
    pub task_type: TaskCategory,
    /// Report date.
    pub date: NaiveDate,
    /// Reporting user.
    pub user: String,
    /// Category completed value.
    pub completed: f64,
    /// Category hours.
    pub hours: f64,
}

/// Expands records into one row per batch per category.
///
/// Blocks with no batches, including stored lists that failed to parse,
/// contribute no rows.
#[must_use]
pub fn explode_by_batch(records: &[TaskSubmission]) -> Vec<BatchRow> {
    records
        .iter()
        .flat_map(|record| {
            record.blocks().iter().flat_map(move |(category, block)| {
                block.batches.iter().map(move |batch| BatchRow {
                    batch: batch.to_owned(),
                    task_type: category,
                    date: record.submission_date(),
                    user: record.user_name().to_owned(),
                    completed: block.completed,
                    hours: block.hours,
                })
            })
        })
        .collect()
}

/// Completed and hours summed for one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchTotal {
    /// Batch name.
    pub batch: String,
    /// Completed work.
    pub completed: f64,
    /// Hours.
    pub hours: f64,
}

/// Sums rows per batch, largest completed first; ties by batch name.
#[must_use]
pub fn batch_totals(rows: &[BatchRow]) -> Vec<BatchTotal> {
    let mut sums: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for row in rows {
        let entry = sums.entry(row.batch.as_str()).or_insert((0.0, 0.0));
        entry.0 += row.completed;
        entry.1 += row.hours;
    }
    let mut totals: Vec<BatchTotal> = sums
        .into_iter()
        .map(|(batch, (completed, hours))| BatchTotal {
            batch: batch.to_owned(),
            completed,
            hours,
        })
        .collect();
    totals.sort_by(|left, right| {
        right
            .completed
            .total_cmp(&left.completed)
            .then_with(|| left.batch.cmp(&right.batch))
    });
    totals
}

/// Completed work per batch and category, zero-filled.
#[must_use]
pub fn batch_task_pivot(rows: &[BatchRow]) -> BTreeMap<String, CategoryTotals> {
    let mut pivot: BTreeMap<String, CategoryTotals> = BTreeMap::new();
    for row in rows {
        pivot
            .entry(row.batch.clone())
            .or_default()
            .add(row.task_type, row.completed);
    }
    pivot
}
