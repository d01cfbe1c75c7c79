//! Rows written by earlier dashboards keep their batches in JSON columns
//! only.

use super::helpers::{day, open_fixture};
use rusqlite::{Connection, params};
use taskboard::report::{
    aggregation::explode_by_batch,
    domain::{SubmissionFilter, TaskCategory},
    ports::SubmissionRepository,
};

const LEGACY_INSERT: &str = "INSERT INTO task_submissions \
    (submission_date, user_names, spatial_completed, spatial_hours, spatial_batches, \
     qa_completed, qa_hours, qa_batches, overtime_hours, total_hours, submitted_by, submit_time) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0.0, ?9, ?10, '2024-01-10 08:30:00')";

#[tokio::test]
async fn legacy_json_batches_are_read() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    let connection = Connection::open(fixture.store.path())?;
    connection.execute(
        LEGACY_INSERT,
        params![
            "2024-01-10",
            "Alice",
            4,
            4.0,
            r#"["OLD_1","OLD_2"]"#,
            2,
            4.0,
            "not json",
            8.0,
            ""
        ],
    )?;
    drop(connection);

    let records = fixture
        .store
        .query_submissions(&SubmissionFilter::all())
        .await?;
    let record = records
        .first()
        .ok_or_else(|| eyre::eyre!("legacy row missing"))?;

    assert_eq!(record.submission_date(), day("2024-01-10")?);
    assert_eq!(record.submitted_by(), "Alice");
    let spatial = record.blocks().get(TaskCategory::Spatial);
    assert!(spatial.selected);
    assert_eq!(spatial.batches.iter().collect::<Vec<_>>(), ["OLD_1", "OLD_2"]);

    let qa = record.blocks().get(TaskCategory::Qa);
    assert!(qa.selected);
    assert!(qa.batches.is_empty());

    let rows = explode_by_batch(&records);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.task_type == TaskCategory::Spatial));
    Ok(())
}
