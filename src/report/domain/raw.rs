//! Raw field values as collected from the entry surface.

use super::TaskCategory;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Values entered for one task category.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTaskBlock {
    /// Completed count or automation progress.
    pub completed: f64,
    /// Hours spent.
    pub hours: f64,
    /// Batches picked for the block.
    pub batches: Vec<String>,
}

impl RawTaskBlock {
    /// Creates a raw block.
    #[must_use]
    pub fn new<I, S>(completed: f64, hours: f64, batches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            completed,
            hours,
            batches: batches.into_iter().map(Into::into).collect(),
        }
    }
}

/// Unvalidated daily report.
///
/// A category is considered selected exactly when a block was supplied for
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSubmission {
    submission_date: NaiveDate,
    user_name: String,
    blocks: BTreeMap<TaskCategory, RawTaskBlock>,
    overtime_hours: f64,
    note: Option<String>,
    submitted_by: Option<String>,
}

impl RawSubmission {
    /// Creates a raw report with no categories selected.
    #[must_use]
    pub fn new(submission_date: NaiveDate, user_name: impl Into<String>) -> Self {
        Self {
            submission_date,
            user_name: user_name.into(),
            blocks: BTreeMap::new(),
            overtime_hours: 0.0,
            note: None,
            submitted_by: None,
        }
    }

    /// Selects a category with the given values.
    #[must_use]
    pub fn with_block(mut self, category: TaskCategory, block: RawTaskBlock) -> Self {
        self.blocks.insert(category, block);
        self
    }

    /// Sets overtime hours.
    #[must_use]
    pub const fn with_overtime(mut self, overtime_hours: f64) -> Self {
        self.overtime_hours = overtime_hours;
        self
    }

    /// Sets the free-text note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Records who entered the report when it differs from the user.
    #[must_use]
    pub fn with_submitted_by(mut self, submitted_by: impl Into<String>) -> Self {
        self.submitted_by = Some(submitted_by.into());
        self
    }

    /// Returns the report date.
    #[must_use]
    pub const fn submission_date(&self) -> NaiveDate {
        self.submission_date
    }

    /// Returns the user name as entered.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns the block entered for a category, if selected.
    #[must_use]
    pub fn block(&self, category: TaskCategory) -> Option<&RawTaskBlock> {
        self.blocks.get(&category)
    }

    /// Returns `true` when at least one category is selected.
    #[must_use]
    pub fn any_selected(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// Returns overtime hours.
    #[must_use]
    pub const fn overtime_hours(&self) -> f64 {
        self.overtime_hours
    }

    /// Returns the note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the explicit submitter, if any.
    #[must_use]
    pub fn submitted_by(&self) -> Option<&str> {
        self.submitted_by.as_deref()
    }
}
