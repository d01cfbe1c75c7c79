//! Submission aggregate and its query/edit parameter types.

use super::{ReportDomainError, TaskBlocks, total_hours};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned submission identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(i64);

impl SubmissionId {
    /// Wraps a stored identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated report that has not been stored yet.
///
/// Only the validator constructs values of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubmission {
    submission_date: NaiveDate,
    user_name: String,
    blocks: TaskBlocks,
    overtime_hours: f64,
    total_hours: f64,
    note: Option<String>,
    submitted_by: String,
}

impl NewSubmission {
    pub(crate) fn from_validated(
        submission_date: NaiveDate,
        user_name: String,
        blocks: TaskBlocks,
        overtime_hours: f64,
        note: Option<String>,
        submitted_by: String,
    ) -> Self {
        let total = total_hours(&blocks, overtime_hours);
        Self {
            submission_date,
            user_name,
            blocks,
            overtime_hours,
            total_hours: total,
            note,
            submitted_by,
        }
    }

    /// Returns the report date.
    #[must_use]
    pub const fn submission_date(&self) -> NaiveDate {
        self.submission_date
    }

    /// Returns the reporting user.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns the task blocks.
    #[must_use]
    pub const fn blocks(&self) -> &TaskBlocks {
        &self.blocks
    }

    /// Returns overtime hours.
    #[must_use]
    pub const fn overtime_hours(&self) -> f64 {
        self.overtime_hours
    }

    /// Returns total hours derived at validation time.
    #[must_use]
    pub const fn total_hours(&self) -> f64 {
        self.total_hours
    }

    /// Returns the note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns who entered the report.
    #[must_use]
    pub fn submitted_by(&self) -> &str {
        &self.submitted_by
    }
}

/// Parameter object for reconstructing a stored submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSubmissionData {
    /// Stored identifier.
    pub id: SubmissionId,
    /// Report date.
    pub submission_date: NaiveDate,
    /// Reporting user.
    pub user_name: String,
    /// Task blocks with batch lists already parsed.
    pub blocks: TaskBlocks,
    /// Overtime hours.
    pub overtime_hours: f64,
    /// Total hours as stored.
    pub total_hours: f64,
    /// Optional note.
    pub note: Option<String>,
    /// Who entered the report.
    pub submitted_by: String,
    /// Store-assigned creation time.
    pub created_at: DateTime<Utc>,
}

/// A stored daily report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSubmission {
    id: SubmissionId,
    submission_date: NaiveDate,
    user_name: String,
    blocks: TaskBlocks,
    overtime_hours: f64,
    total_hours: f64,
    note: Option<String>,
    submitted_by: String,
    created_at: DateTime<Utc>,
}

impl TaskSubmission {
    /// Reconstructs a submission from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSubmissionData) -> Self {
        Self {
            id: data.id,
            submission_date: data.submission_date,
            user_name: data.user_name,
            blocks: data.blocks,
            overtime_hours: data.overtime_hours,
            total_hours: data.total_hours,
            note: data.note,
            submitted_by: data.submitted_by,
            created_at: data.created_at,
        }
    }

    /// Builds the stored form of a new submission.
    #[must_use]
    pub fn from_new(id: SubmissionId, submission: &NewSubmission, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            submission_date: submission.submission_date,
            user_name: submission.user_name.clone(),
            blocks: submission.blocks.clone(),
            overtime_hours: submission.overtime_hours,
            total_hours: submission.total_hours,
            note: submission.note.clone(),
            submitted_by: submission.submitted_by.clone(),
            created_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> SubmissionId {
        self.id
    }

    /// Returns the report date.
    #[must_use]
    pub const fn submission_date(&self) -> NaiveDate {
        self.submission_date
    }

    /// Returns the reporting user.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns the task blocks.
    #[must_use]
    pub const fn blocks(&self) -> &TaskBlocks {
        &self.blocks
    }

    /// Returns overtime hours.
    #[must_use]
    pub const fn overtime_hours(&self) -> f64 {
        self.overtime_hours
    }

    /// Returns total hours as stored.
    #[must_use]
    pub const fn stored_total_hours(&self) -> f64 {
        self.total_hours
    }

    /// Returns total hours recomputed from the blocks.
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        total_hours(&self.blocks, self.overtime_hours)
    }

    /// Returns the sum of completed values across categories.
    #[must_use]
    pub fn total_tasks(&self) -> f64 {
        self.blocks.total_completed()
    }

    /// Returns the note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns who entered the report.
    #[must_use]
    pub fn submitted_by(&self) -> &str {
        &self.submitted_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies an admin edit to the mutable fields.
    pub fn apply_edit(&mut self, edit: &SubmissionEdit) {
        if let Some(date) = edit.submission_date {
            self.submission_date = date;
        }
        if let Some(note) = edit.note.as_ref() {
            self.note = normalize_note(note);
        }
    }
}

/// Partial update of the two mutable submission fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionEdit {
    /// New report date.
    pub submission_date: Option<NaiveDate>,
    /// New note; an empty string clears the note.
    pub note: Option<String>,
}

impl SubmissionEdit {
    /// Creates an empty edit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            submission_date: None,
            note: None,
        }
    }

    /// Sets the new report date.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.submission_date = Some(date);
        self
    }

    /// Sets the new note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns `true` when the edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.submission_date.is_none() && self.note.is_none()
    }

    /// Returns the note value to store, `None` clearing the column.
    #[must_use]
    pub fn stored_note(&self) -> Option<Option<String>> {
        self.note.as_deref().map(normalize_note)
    }
}

pub(crate) fn normalize_note(note: &str) -> Option<String> {
    let trimmed = note.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Inclusive range of report dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates an inclusive range.
    ///
    /// # Errors
    ///
    /// Returns [`ReportDomainError::InvalidDateRange`] when `end` precedes
    /// `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportDomainError> {
        if end < start {
            return Err(ReportDomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns `true` when the date falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Filter for submission queries; all set criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SubmissionFilter {
    /// Exact report date.
    pub date_equals: Option<NaiveDate>,
    /// Inclusive report date range.
    pub date_range: Option<DateRange>,
    /// Earliest report date, with no upper bound.
    pub date_from: Option<NaiveDate>,
    /// Exact user name.
    pub user_equals: Option<String>,
}

impl SubmissionFilter {
    /// Creates a filter matching every submission.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            date_equals: None,
            date_range: None,
            date_from: None,
            user_equals: None,
        }
    }

    /// Restricts to one report date.
    #[must_use]
    pub const fn on(mut self, date: NaiveDate) -> Self {
        self.date_equals = Some(date);
        self
    }

    /// Restricts to an inclusive date range.
    #[must_use]
    pub const fn within(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Restricts to reports dated on or after `date`.
    #[must_use]
    pub const fn since(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    /// Restricts to one user.
    #[must_use]
    pub fn for_user(mut self, user_name: impl Into<String>) -> Self {
        self.user_equals = Some(user_name.into());
        self
    }

    /// Returns `true` when the submission satisfies every criterion.
    #[must_use]
    pub fn matches(&self, submission: &TaskSubmission) -> bool {
        let date = submission.submission_date();
        self.date_equals.is_none_or(|expected| expected == date)
            && self.date_range.is_none_or(|range| range.contains(date))
            && self.date_from.is_none_or(|first| date >= first)
            && self
                .user_equals
                .as_deref()
                .is_none_or(|user| user == submission.user_name())
    }
}
