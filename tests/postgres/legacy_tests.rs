//! Tables created by earlier dashboards use `REAL` hours and a nullable
//! `TIMESTAMP` creation time.

use super::helpers::{grant, mixed_submission, temporary_store_after};
use chrono::{DateTime, NaiveDate, Utc};
use taskboard::report::{
    aggregation::explode_by_batch,
    domain::{SubmissionEdit, SubmissionFilter, TaskCategory},
    ports::SubmissionRepository,
};

const LEGACY_SCHEMA: &str = r#"
CREATE TABLE task_submissions (
    id SERIAL PRIMARY KEY,
    submission_date DATE NOT NULL,
    user_names TEXT NOT NULL,
    spatial_completed INTEGER DEFAULT 0,
    spatial_hours REAL DEFAULT 0.0,
    spatial_batches TEXT,
    textual_completed INTEGER DEFAULT 0,
    textual_hours REAL DEFAULT 0.0,
    textual_batches TEXT,
    qa_completed INTEGER DEFAULT 0,
    qa_hours REAL DEFAULT 0.0,
    qa_batches TEXT,
    qc_completed INTEGER DEFAULT 0,
    qc_hours REAL DEFAULT 0.0,
    qc_batches TEXT,
    automation_completed REAL DEFAULT 0.0,
    automation_hours REAL DEFAULT 0.0,
    automation_batches TEXT,
    other_completed INTEGER DEFAULT 0,
    other_hours REAL DEFAULT 0.0,
    other_batches TEXT,
    overtime_hours REAL DEFAULT 0.0,
    total_hours REAL DEFAULT 0.0,
    note TEXT,
    submitted_by TEXT,
    submit_time TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

INSERT INTO task_submissions
    (submission_date, user_names, spatial_completed, spatial_hours, spatial_batches,
     qa_completed, qa_hours, qa_batches, overtime_hours, total_hours, submitted_by, submit_time)
VALUES
    ('2024-01-10', 'Alice', 4, 4.5, '["OLD_1","OLD_2"]', 2, 3.5, 'not json', 0.0, 8.0, '',
     '2024-01-10 08:30:00'),
    ('2024-01-09', 'Bob', 6, 8.0, '["OLD_1"]', 0, 0.0, NULL, 0.5, 8.5, 'Bob', NULL);
"#;

fn day(year: i32, month: u32, date: u32) -> eyre::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, date).ok_or_else(|| eyre::eyre!("invalid date"))
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_tables_are_read_and_extended() -> eyre::Result<()> {
    let Some(temporary) = temporary_store_after(LEGACY_SCHEMA).await? else {
        return Ok(());
    };
    let store = &temporary.store;

    let records = store.query_submissions(&SubmissionFilter::all()).await?;
    let [alice, bob] = records.as_slice() else {
        eyre::bail!("expected two legacy rows, found {}", records.len());
    };

    assert_eq!(alice.submission_date(), day(2024, 1, 10)?);
    assert_eq!(alice.submitted_by(), "Alice");
    let spatial = alice.blocks().get(TaskCategory::Spatial);
    assert!((spatial.hours - 4.5).abs() < f64::EPSILON);
    assert_eq!(spatial.batches.iter().collect::<Vec<_>>(), ["OLD_1", "OLD_2"]);
    let qa = alice.blocks().get(TaskCategory::Qa);
    assert!(qa.selected);
    assert!(qa.batches.is_empty());

    assert_eq!(bob.created_at(), DateTime::<Utc>::UNIX_EPOCH);
    assert!((bob.total_hours() - 8.5).abs() < f64::EPSILON);
    assert_eq!(explode_by_batch(&records).len(), 3);

    let admin = grant()?;
    let added = store
        .insert_submission(&mixed_submission(day(2026, 10, 5)?, "Alice")?)
        .await?;
    store
        .update_submission(&admin, bob.id(), &SubmissionEdit::new().with_note("moved"))
        .await?;

    let records = store.query_submissions(&SubmissionFilter::all()).await?;
    let ids: Vec<_> = records.iter().map(|record| record.id()).collect();
    assert_eq!(ids, [added, alice.id(), bob.id()]);
    let automation = records
        .first()
        .map(|record| record.blocks().get(TaskCategory::Automation).completed)
        .ok_or_else(|| eyre::eyre!("inserted row missing"))?;
    assert!((automation - 37.5).abs() < f64::EPSILON);
    assert_eq!(records.last().and_then(|record| record.note()), Some("moved"));

    temporary.drop_database()
}
