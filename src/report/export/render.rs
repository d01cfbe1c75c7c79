//! CSV, JSON and tabular renderings of export rows.

use super::{ExportError, ExportRow};
use crate::report::domain::TaskSubmission;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Pretty-printed JSON array of rows.
    Json,
    /// Rows plus a summary sheet, as JSON.
    Table,
}

impl ExportFormat {
    /// Returns the file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::Table => "json",
        }
    }

    /// Returns the conventional download name for an export made on `date`.
    #[must_use]
    pub fn file_name(self, date: NaiveDate) -> String {
        let stem = match self {
            Self::Csv | Self::Json => "task_submissions",
            Self::Table => "task_submissions_table",
        };
        format!("{stem}_{}.{}", date.format("%Y%m%d"), self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Table => "table",
        };
        f.write_str(label)
    }
}

/// Renders rows as CSV with a header row, which is written even when
/// `rows` is empty.
///
/// # Errors
///
/// Returns [`ExportError`] when a row cannot be serialized.
pub fn to_csv(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(ExportRow::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::CsvFlush(Arc::new(err.into_error())))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}

/// Renders rows as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`ExportError::Json`] when serialization fails.
pub fn to_json(rows: &[ExportRow]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Summary sheet of a tabular export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    /// Number of rows.
    pub total_submissions: usize,
    /// Completed work across rows.
    pub total_tasks: f64,
    /// Hours across rows.
    pub total_hours: f64,
    /// `"<first> to <last>"` over the report dates.
    pub date_range: String,
    /// Distinct reporting users.
    pub unique_users: usize,
}

/// Tabular export: a submissions sheet and, when non-empty, a summary
/// sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTable {
    /// Submission rows.
    pub task_submissions: Vec<ExportRow>,
    /// Summary sheet.
    pub summary: Option<ExportSummary>,
}

impl ExportTable {
    /// Builds the table from stored submissions.
    #[must_use]
    pub fn from_submissions(submissions: &[TaskSubmission]) -> Self {
        let rows: Vec<ExportRow> = submissions.iter().map(ExportRow::from).collect();
        let summary = summarize(submissions);
        Self {
            task_submissions: rows,
            summary,
        }
    }

    /// Renders the table as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] when serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn summarize(submissions: &[TaskSubmission]) -> Option<ExportSummary> {
    let first = submissions.iter().map(TaskSubmission::submission_date).min()?;
    let last = submissions.iter().map(TaskSubmission::submission_date).max()?;
    Some(ExportSummary {
        total_submissions: submissions.len(),
        total_tasks: submissions.iter().map(TaskSubmission::total_tasks).sum(),
        total_hours: submissions.iter().map(TaskSubmission::total_hours).sum(),
        date_range: format!("{first} to {last}"),
        unique_users: submissions
            .iter()
            .map(TaskSubmission::user_name)
            .collect::<BTreeSet<_>>()
            .len(),
    })
}
