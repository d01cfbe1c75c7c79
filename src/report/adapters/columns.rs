//! Conversion between stored submission columns and domain submissions.
//!
//! Both relational dialects share the legacy flat column layout: three
//! columns per category plus the normalized `submission_batches` child
//! table. Rows are read into [`StoredSubmission`] and rebuilt here.

use crate::report::domain::{
    BatchList, NewSubmission, PersistedSubmissionData, SubmissionId, TaskBlock, TaskBlocks,
    TaskCategory, TaskSubmission,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Child batch rows grouped by submission and category, in position order.
pub(super) type ChildBatches = BTreeMap<(i64, TaskCategory), Vec<String>>;

/// The three legacy columns of one category.
#[derive(Debug, Clone, Default)]
pub(super) struct StoredBlock {
    pub completed: Option<f64>,
    pub hours: Option<f64>,
    pub batches: Option<String>,
}

/// One `task_submissions` row as read from either dialect.
#[derive(Debug, Clone)]
pub(super) struct StoredSubmission {
    pub id: i64,
    pub submission_date: NaiveDate,
    pub user_name: String,
    pub blocks: [StoredBlock; 6],
    pub overtime_hours: Option<f64>,
    pub total_hours: Option<f64>,
    pub note: Option<String>,
    pub submitted_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Rebuilds a submission, preferring child batch rows over the JSON column.
///
/// Legacy rows carry no selection flag; a block counts as selected when it
/// has completed work or hours.
pub(super) fn into_submission(stored: StoredSubmission, children: &ChildBatches) -> TaskSubmission {
    let mut blocks = TaskBlocks::default();
    for (category, columns) in TaskCategory::ALL.into_iter().zip(stored.blocks) {
        let completed = columns.completed.unwrap_or(0.0);
        let hours = columns.hours.unwrap_or(0.0);
        let batches = children.get(&(stored.id, category)).map_or_else(
            || BatchList::from_stored(columns.batches.as_deref()),
            |rows| BatchList::new(rows.iter().cloned()),
        );
        *blocks.get_mut(category) = TaskBlock {
            selected: completed > 0.0 || hours > 0.0,
            completed,
            hours,
            batches,
        };
    }

    let overtime_hours = stored.overtime_hours.unwrap_or(0.0);
    let total_hours = stored
        .total_hours
        .unwrap_or_else(|| crate::report::domain::total_hours(&blocks, overtime_hours));
    let submitted_by = stored
        .submitted_by
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| stored.user_name.clone());

    TaskSubmission::from_persisted(PersistedSubmissionData {
        id: SubmissionId::new(stored.id),
        submission_date: stored.submission_date,
        user_name: stored.user_name,
        blocks,
        overtime_hours,
        total_hours,
        note: stored.note,
        submitted_by,
        created_at: stored.created_at,
    })
}

/// Batch rows to insert for a new submission: `(category, position, batch)`.
pub(super) fn child_batch_rows(submission: &NewSubmission) -> Vec<(TaskCategory, i32, String)> {
    submission
        .blocks()
        .iter()
        .flat_map(|(category, block)| {
            block
                .batches
                .iter()
                .zip(0_i32..)
                .map(move |(batch, position)| (category, position, batch.to_owned()))
        })
        .collect()
}
