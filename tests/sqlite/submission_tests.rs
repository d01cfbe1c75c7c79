//! Submission persistence against a `SQLite` file.

use super::helpers::{day, grant, open_fixture, two_category_submission};
use taskboard::report::{
    adapters::{
        StoreConfig, open_store,
        sqlite::{DEFAULT_BUSY_TIMEOUT, SqliteReportStore},
    },
    domain::{DateRange, SubmissionEdit, SubmissionFilter, SubmissionId, TaskCategory},
    ports::{ReportRepositoryError, SubmissionRepository},
};

#[tokio::test]
async fn inserted_submissions_read_back_unchanged() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    let submission = two_category_submission(day("2026-10-05")?, "Alice")?;

    let id = fixture.store.insert_submission(&submission).await?;
    let records = fixture
        .store
        .query_submissions(&SubmissionFilter::all())
        .await?;

    let [record] = records.as_slice() else {
        eyre::bail!("expected one record, found {}", records.len());
    };
    assert_eq!(record.id(), id);
    assert_eq!(record.user_name(), "Alice");
    assert_eq!(record.blocks(), submission.blocks());
    assert!((record.total_hours() - 8.0).abs() < f64::EPSILON);
    assert!((record.stored_total_hours() - submission.total_hours()).abs() < f64::EPSILON);
    assert_eq!(record.note(), Some("double shift"));
    assert_eq!(record.submitted_by(), "Alice");

    let spatial: Vec<&str> = record
        .blocks()
        .get(TaskCategory::Spatial)
        .batches
        .iter()
        .collect();
    assert_eq!(spatial, ["B1", "B2"]);
    Ok(())
}

#[tokio::test]
async fn queries_filter_and_order_newest_first() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    let first = fixture
        .store
        .insert_submission(&two_category_submission(day("2026-10-05")?, "Alice")?)
        .await?;
    let second = fixture
        .store
        .insert_submission(&two_category_submission(day("2026-10-06")?, "Bob")?)
        .await?;
    let third = fixture
        .store
        .insert_submission(&two_category_submission(day("2026-10-07")?, "Alice")?)
        .await?;

    let all = fixture
        .store
        .query_submissions(&SubmissionFilter::all())
        .await?;
    let ids: Vec<_> = all.iter().map(|record| record.id()).collect();
    assert_eq!(ids, [third, second, first]);

    let alice = fixture
        .store
        .query_submissions(&SubmissionFilter::all().for_user("Alice"))
        .await?;
    assert_eq!(alice.len(), 2);

    let range = DateRange::new(day("2026-10-06")?, day("2026-10-07")?)?;
    let ranged = fixture
        .store
        .query_submissions(&SubmissionFilter::all().within(range).for_user("Alice"))
        .await?;
    assert_eq!(ranged.iter().map(|record| record.id()).collect::<Vec<_>>(), [third]);

    let exact = fixture
        .store
        .query_submissions(&SubmissionFilter::all().on(day("2026-10-06")?))
        .await?;
    assert_eq!(exact.iter().map(|record| record.id()).collect::<Vec<_>>(), [second]);

    let open_ended = fixture
        .store
        .query_submissions(&SubmissionFilter::all().since(day("2026-10-06")?))
        .await?;
    assert_eq!(
        open_ended.iter().map(|record| record.id()).collect::<Vec<_>>(),
        [third, second]
    );
    Ok(())
}

#[tokio::test]
async fn edits_change_date_and_clear_notes() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    let admin = grant()?;
    let id = fixture
        .store
        .insert_submission(&two_category_submission(day("2026-10-05")?, "Alice")?)
        .await?;

    fixture
        .store
        .update_submission(
            &admin,
            id,
            &SubmissionEdit::new().with_date(day("2026-10-04")?).with_note(""),
        )
        .await?;

    let records = fixture
        .store
        .query_submissions(&SubmissionFilter::all().on(day("2026-10-04")?))
        .await?;
    let record = records
        .first()
        .ok_or_else(|| eyre::eyre!("edited record missing"))?;
    assert_eq!(record.note(), None);
    assert!((record.blocks().get(TaskCategory::Qa).completed - 3.0).abs() < f64::EPSILON);

    let missing = fixture
        .store
        .update_submission(&admin, SubmissionId::new(999), &SubmissionEdit::new().with_note("x"))
        .await;
    assert!(matches!(missing, Err(ReportRepositoryError::NotFound(_))));

    fixture
        .store
        .update_submission(&admin, id, &SubmissionEdit::new())
        .await?;
    let empty_missing = fixture
        .store
        .update_submission(&admin, SubmissionId::new(999), &SubmissionEdit::new())
        .await;
    assert!(matches!(empty_missing, Err(ReportRepositoryError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn retention_deletes_strictly_before_the_cutoff() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    let admin = grant()?;
    for date in ["2026-09-01", "2026-09-10", "2026-09-11", "2026-09-12"] {
        fixture
            .store
            .insert_submission(&two_category_submission(day(date)?, "Alice")?)
            .await?;
    }

    let removed = fixture
        .store
        .delete_submissions_older_than(&admin, day("2026-09-11")?)
        .await?;
    assert_eq!(removed, 2);

    let remaining = fixture
        .store
        .query_submissions(&SubmissionFilter::all())
        .await?;
    let mut dates: Vec<String> = remaining
        .iter()
        .map(|record| record.submission_date().to_string())
        .collect();
    dates.sort();
    assert_eq!(dates, ["2026-09-11", "2026-09-12"]);

    let cleared = fixture.store.delete_all_submissions(&admin).await?;
    assert_eq!(cleared, 2);
    Ok(())
}

#[tokio::test]
async fn reopening_keeps_stored_rows() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    fixture
        .store
        .insert_submission(&two_category_submission(day("2026-10-05")?, "Alice")?)
        .await?;

    let reopened =
        SqliteReportStore::open(fixture.dir.path().join("reports.db"), DEFAULT_BUSY_TIMEOUT)
            .await?;
    let records = reopened
        .query_submissions(&SubmissionFilter::all())
        .await?;
    assert_eq!(records.len(), 1);
    Ok(())
}

#[tokio::test]
async fn open_store_selects_the_embedded_file() -> eyre::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = StoreConfig::Sqlite {
        path: dir.path().join("selected.db"),
        busy_timeout: DEFAULT_BUSY_TIMEOUT,
    };

    let store = open_store(&config).await?;
    store
        .insert_submission(&two_category_submission(day("2026-10-05")?, "Alice")?)
        .await?;

    assert_eq!(store.query_submissions(&SubmissionFilter::all()).await?.len(), 1);
    assert!(dir.path().join("selected.db").exists());
    Ok(())
}
