//! Shared helpers for `SQLite` store tests.

use chrono::NaiveDate;
use eyre::WrapErr;
use taskboard::report::{
    adapters::sqlite::{DEFAULT_BUSY_TIMEOUT, SqliteReportStore},
    domain::{AdminGate, AdminGrant, NewSubmission, RawSubmission, RawTaskBlock, TaskCategory},
    validation::{ValidationContext, build_submission},
};
use tempfile::TempDir;

/// A store backed by a file inside a temporary directory.
pub struct SqliteFixture {
    /// Keeps the directory alive for the duration of the test.
    pub dir: TempDir,
    /// Store under test.
    pub store: SqliteReportStore,
}

/// Opens a fresh store in a new temporary directory.
pub async fn open_fixture() -> eyre::Result<SqliteFixture> {
    let dir = TempDir::new().wrap_err("create temp dir")?;
    let store = SqliteReportStore::open(dir.path().join("reports.db"), DEFAULT_BUSY_TIMEOUT)
        .await
        .wrap_err("open sqlite store")?;
    Ok(SqliteFixture { dir, store })
}

/// Returns an admin grant for mutating calls.
pub fn grant() -> eyre::Result<AdminGrant> {
    AdminGate::new(Some("PM_ADMIN"))
        .unlock("PM_ADMIN")
        .wrap_err("unlock admin gate")
}

/// Parses an ISO date.
pub fn day(text: &str) -> eyre::Result<NaiveDate> {
    text.parse().wrap_err_with(|| format!("parse date {text}"))
}

/// Builds a validated submission with spatial and QA work on two batches.
pub fn two_category_submission(date: NaiveDate, user: &str) -> eyre::Result<NewSubmission> {
    let raw = RawSubmission::new(date, user)
        .with_block(TaskCategory::Spatial, RawTaskBlock::new(5.0, 4.0, ["B1", "B2"]))
        .with_block(TaskCategory::Qa, RawTaskBlock::new(3.0, 3.5, ["B2"]))
        .with_overtime(0.5)
        .with_note("double shift");
    let context = ValidationContext::new([user], ["B1", "B2"]);
    build_submission(&raw, &context).map_err(|errors| eyre::eyre!("invalid fixture: {errors}"))
}
