//! Diesel row models for report persistence.

use super::schema::{submission_batches, task_submissions};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Date, Double, Integer, Nullable, Text, Timestamptz};

/// Query result row for submissions.
///
/// Read through `float8` and `timestamptz` casts, so tables created by the
/// dashboard with `REAL` hours and a nullable `TIMESTAMP` decode too.
#[derive(Debug, Clone, QueryableByName)]
pub struct SubmissionRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Date)]
    pub submission_date: NaiveDate,
    #[diesel(sql_type = Text)]
    pub user_names: String,
    #[diesel(sql_type = Nullable<Integer>)]
    pub spatial_completed: Option<i32>,
    #[diesel(sql_type = Nullable<Double>)]
    pub spatial_hours: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub spatial_batches: Option<String>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub textual_completed: Option<i32>,
    #[diesel(sql_type = Nullable<Double>)]
    pub textual_hours: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub textual_batches: Option<String>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub qa_completed: Option<i32>,
    #[diesel(sql_type = Nullable<Double>)]
    pub qa_hours: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub qa_batches: Option<String>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub qc_completed: Option<i32>,
    #[diesel(sql_type = Nullable<Double>)]
    pub qc_hours: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub qc_batches: Option<String>,
    #[diesel(sql_type = Nullable<Double>)]
    pub automation_completed: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub automation_hours: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub automation_batches: Option<String>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub other_completed: Option<i32>,
    #[diesel(sql_type = Nullable<Double>)]
    pub other_hours: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub other_batches: Option<String>,
    #[diesel(sql_type = Nullable<Double>)]
    pub overtime_hours: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub total_hours: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub note: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub submitted_by: Option<String>,
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub submit_time: Option<DateTime<Utc>>,
}

/// Insert model for submissions; `id` and `submit_time` are assigned by
/// the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_submissions)]
pub struct NewSubmissionRow {
    pub submission_date: NaiveDate,
    pub user_names: String,
    pub spatial_completed: i32,
    pub spatial_hours: f64,
    pub spatial_batches: String,
    pub textual_completed: i32,
    pub textual_hours: f64,
    pub textual_batches: String,
    pub qa_completed: i32,
    pub qa_hours: f64,
    pub qa_batches: String,
    pub qc_completed: i32,
    pub qc_hours: f64,
    pub qc_batches: String,
    pub automation_completed: f64,
    pub automation_hours: f64,
    pub automation_batches: String,
    pub other_completed: i32,
    pub other_hours: f64,
    pub other_batches: String,
    pub overtime_hours: f64,
    pub total_hours: f64,
    pub note: Option<String>,
    pub submitted_by: String,
}

/// Partial update of the two editable submission columns.
///
/// `None` leaves a column untouched; `Some(None)` clears the note.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = task_submissions)]
pub struct SubmissionEditChangeset {
    pub submission_date: Option<NaiveDate>,
    pub note: Option<Option<String>>,
}

/// Query and insert model for normalized batch rows.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submission_batches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BatchRow {
    pub submission_id: i32,
    pub category: String,
    pub position: i32,
    pub batch: String,
}
