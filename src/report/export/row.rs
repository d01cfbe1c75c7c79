//! Flat export row mirroring the stored column layout.

use crate::report::domain::TaskSubmission;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One submission flattened to the stored column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    /// Identifier.
    pub id: i64,
    /// Report date.
    pub submission_date: NaiveDate,
    /// Reporting user.
    pub user_names: String,
    /// Spatial completed count.
    pub spatial_completed: i64,
    /// Spatial hours.
    pub spatial_hours: f64,
    /// Spatial batches, comma-joined.
    pub spatial_batches: String,
    /// Textual completed count.
    pub textual_completed: i64,
    /// Textual hours.
    pub textual_hours: f64,
    /// Textual batches, comma-joined.
    pub textual_batches: String,
    /// QA completed count.
    pub qa_completed: i64,
    /// QA hours.
    pub qa_hours: f64,
    /// QA batches, comma-joined.
    pub qa_batches: String,
    /// QC completed count.
    pub qc_completed: i64,
    /// QC hours.
    pub qc_hours: f64,
    /// QC batches, comma-joined.
    pub qc_batches: String,
    /// Automation progress percentage.
    pub automation_completed: f64,
    /// Automation hours.
    pub automation_hours: f64,
    /// Automation batches, comma-joined.
    pub automation_batches: String,
    /// Other completed count.
    pub other_completed: i64,
    /// Other hours.
    pub other_hours: f64,
    /// Other batches, comma-joined.
    pub other_batches: String,
    /// Overtime hours.
    pub overtime_hours: f64,
    /// Total hours.
    pub total_hours: f64,
    /// Note.
    pub note: Option<String>,
    /// Who entered the report.
    pub submitted_by: String,
    /// Creation timestamp.
    pub submit_time: DateTime<Utc>,
}

impl ExportRow {
    /// Column names in field order, as written in the CSV header.
    pub const HEADERS: [&'static str; 26] = [
        "id",
        "submission_date",
        "user_names",
        "spatial_completed",
        "spatial_hours",
        "spatial_batches",
        "textual_completed",
        "textual_hours",
        "textual_batches",
        "qa_completed",
        "qa_hours",
        "qa_batches",
        "qc_completed",
        "qc_hours",
        "qc_batches",
        "automation_completed",
        "automation_hours",
        "automation_batches",
        "other_completed",
        "other_hours",
        "other_batches",
        "overtime_hours",
        "total_hours",
        "note",
        "submitted_by",
        "submit_time",
    ];
}

impl From<&TaskSubmission> for ExportRow {
    fn from(submission: &TaskSubmission) -> Self {
        let blocks = submission.blocks();
        Self {
            id: submission.id().value(),
            submission_date: submission.submission_date(),
            user_names: submission.user_name().to_owned(),
            spatial_completed: blocks.spatial.completed_count(),
            spatial_hours: blocks.spatial.hours,
            spatial_batches: blocks.spatial.batches.joined(),
            textual_completed: blocks.textual.completed_count(),
            textual_hours: blocks.textual.hours,
            textual_batches: blocks.textual.batches.joined(),
            qa_completed: blocks.qa.completed_count(),
            qa_hours: blocks.qa.hours,
            qa_batches: blocks.qa.batches.joined(),
            qc_completed: blocks.qc.completed_count(),
            qc_hours: blocks.qc.hours,
            qc_batches: blocks.qc.batches.joined(),
            automation_completed: blocks.automation.completed,
            automation_hours: blocks.automation.hours,
            automation_batches: blocks.automation.batches.joined(),
            other_completed: blocks.other.completed_count(),
            other_hours: blocks.other.hours,
            other_batches: blocks.other.batches.joined(),
            overtime_hours: submission.overtime_hours(),
            total_hours: submission.total_hours(),
            note: submission.note().map(str::to_owned),
            submitted_by: submission.submitted_by().to_owned(),
            submit_time: submission.created_at(),
        }
    }
}
