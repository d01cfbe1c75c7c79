//! `SQLite` repository implementation for report storage.
//!
//! Every call opens its own connection on the blocking pool, runs its
//! statements, and drops the connection again.

use super::schema::{INSERT_SUBMISSION, SQLITE_SCHEMA, SUBMISSION_COLUMNS, SUBMISSION_FILTER};
use crate::report::{
    adapters::columns::{
        ChildBatches, StoredBlock, StoredSubmission, child_batch_rows, into_submission,
    },
    domain::{
        AdminGrant, AppSettings, BatchName, NewSubmission, SubmissionEdit, SubmissionFilter,
        SubmissionId, TaskCategory, TaskSubmission, TeamMember,
    },
    ports::{
        CatalogRepository, ReportRepositoryError, ReportRepositoryResult, SubmissionRepository,
        UnavailableCause,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, Transaction, params};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Busy timeout applied to every connection unless configured otherwise.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// `SQLite`-backed report store.
#[derive(Debug, Clone)]
pub struct SqliteReportStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteReportStore {
    /// Opens the database file, creating it and installing the schema when
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::StorageUnavailable`] when the file
    /// cannot be opened, or a persistence error when schema installation
    /// fails.
    pub async fn open(
        path: impl Into<PathBuf>,
        busy_timeout: Duration,
    ) -> ReportRepositoryResult<Self> {
        let store = Self {
            path: path.into(),
            busy_timeout,
        };
        store
            .run_blocking(|connection| {
                connection
                    .execute_batch(SQLITE_SCHEMA)
                    .map_err(map_sqlite_error)
            })
            .await?;
        tracing::info!(path = %store.path.display(), "opened SQLite report store");
        Ok(store)
    }

    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReportRepositoryResult<T>
    where
        F: FnOnce(&mut Connection) -> ReportRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        let busy_timeout = self.busy_timeout;
        tokio::task::spawn_blocking(move || {
            let mut connection = connect(&path, busy_timeout)?;
            f(&mut connection)
        })
        .await
        .map_err(ReportRepositoryError::persistence)?
    }
}

fn connect(path: &Path, busy_timeout: Duration) -> ReportRepositoryResult<Connection> {
    let connection =
        Connection::open(path).map_err(|err| ReportRepositoryError::StorageUnavailable {
            cause: UnavailableCause::Other,
            message: err.to_string(),
        })?;
    connection
        .busy_timeout(busy_timeout)
        .map_err(map_sqlite_error)?;
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(map_sqlite_error)?;
    Ok(connection)
}

fn map_sqlite_error(err: rusqlite::Error) -> ReportRepositoryError {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            ReportRepositoryError::StorageUnavailable {
                cause: UnavailableCause::Timeout,
                message: err.to_string(),
            }
        }
        Some(ErrorCode::CannotOpen | ErrorCode::NotADatabase) => {
            ReportRepositoryError::StorageUnavailable {
                cause: UnavailableCause::Other,
                message: err.to_string(),
            }
        }
        _ => ReportRepositoryError::persistence(err),
    }
}

fn rows_to_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

#[async_trait]
impl SubmissionRepository for SqliteReportStore {
    async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> ReportRepositoryResult<SubmissionId> {
        let owned = submission.clone();
        let id = self
            .run_blocking(move |connection| {
                let tx = connection.transaction().map_err(map_sqlite_error)?;
                let id = insert_submission_row(&tx, &owned)?;
                insert_child_batches(&tx, id, &owned)?;
                tx.commit().map_err(map_sqlite_error)?;
                Ok(id)
            })
            .await?;
        Ok(SubmissionId::new(id))
    }

    async fn update_submission(
        &self,
        _grant: &AdminGrant,
        id: SubmissionId,
        edit: &SubmissionEdit,
    ) -> ReportRepositoryResult<()> {
        let date = edit.submission_date.map(|value| value.to_string());
        let note = edit.stored_note();
        let changed = self
            .run_blocking(move |connection| {
                connection
                    .execute(
                        "UPDATE task_submissions \
                         SET submission_date = COALESCE(?1, submission_date), \
                             note = CASE WHEN ?2 THEN ?3 ELSE note END \
                         WHERE id = ?4",
                        params![date, note.is_some(), note.flatten(), id.value()],
                    )
                    .map_err(map_sqlite_error)
            })
            .await?;
        if changed == 0 {
            return Err(ReportRepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn query_submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> ReportRepositoryResult<Vec<TaskSubmission>> {
        let bound = FilterParams::from(filter);
        self.run_blocking(move |connection| {
            let stored = select_submissions(connection, &bound)?;
            let children = select_child_batches(connection, &bound)?;
            Ok(stored
                .into_iter()
                .map(|row| into_submission(row, &children))
                .collect())
        })
        .await
    }

    async fn delete_submissions_older_than(
        &self,
        _grant: &AdminGrant,
        cutoff: NaiveDate,
    ) -> ReportRepositoryResult<u64> {
        let cutoff_text = cutoff.to_string();
        self.run_blocking(move |connection| {
            connection
                .execute(
                    "DELETE FROM task_submissions WHERE submission_date < ?1",
                    params![cutoff_text],
                )
                .map(rows_to_u64)
                .map_err(map_sqlite_error)
        })
        .await
    }

    async fn delete_all_submissions(&self, _grant: &AdminGrant) -> ReportRepositoryResult<u64> {
        self.run_blocking(|connection| {
            let tx = connection.transaction().map_err(map_sqlite_error)?;
            tx.execute("DELETE FROM submission_batches", [])
                .map_err(map_sqlite_error)?;
            let removed = tx
                .execute("DELETE FROM task_submissions", [])
                .map_err(map_sqlite_error)?;
            tx.commit().map_err(map_sqlite_error)?;
            Ok(rows_to_u64(removed))
        })
        .await
    }
}

#[async_trait]
impl CatalogRepository for SqliteReportStore {
    async fn settings(&self) -> ReportRepositoryResult<AppSettings> {
        self.run_blocking(|connection| {
            let targets = connection
                .query_row(
                    "SELECT spatial_target, textual_target FROM app_settings WHERE id = ?1",
                    params![AppSettings::SINGLETON_ID],
                    |row| Ok((row.get::<_, Option<i64>>(0)?, row.get::<_, Option<i64>>(1)?)),
                )
                .optional()
                .map_err(map_sqlite_error)?;
            Ok(targets.map_or_else(AppSettings::default, |(spatial, textual)| {
                AppSettings::new(spatial.unwrap_or(0), textual.unwrap_or(0))
            }))
        })
        .await
    }

    async fn update_settings(
        &self,
        _grant: &AdminGrant,
        settings: AppSettings,
    ) -> ReportRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection
                .execute(
                    "INSERT INTO app_settings (id, spatial_target, textual_target) \
                     VALUES (?1, ?2, ?3) \
                     ON CONFLICT (id) DO UPDATE SET \
                         spatial_target = excluded.spatial_target, \
                         textual_target = excluded.textual_target",
                    params![
                        AppSettings::SINGLETON_ID,
                        settings.spatial_target,
                        settings.textual_target
                    ],
                )
                .map_err(map_sqlite_error)?;
            Ok(())
        })
        .await
    }

    async fn list_batch_options(&self) -> ReportRepositoryResult<Vec<String>> {
        self.run_blocking(|connection| {
            let mut statement = connection
                .prepare("SELECT name FROM batch_options ORDER BY name")
                .map_err(map_sqlite_error)?;
            let names = statement
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(map_sqlite_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_sqlite_error)?;
            Ok(names)
        })
        .await
    }

    async fn add_batch_option(
        &self,
        _grant: &AdminGrant,
        name: &BatchName,
    ) -> ReportRepositoryResult<()> {
        let owned = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            connection
                .execute(
                    "INSERT OR IGNORE INTO batch_options (name) VALUES (?1)",
                    params![owned],
                )
                .map_err(map_sqlite_error)?;
            Ok(())
        })
        .await
    }

    async fn remove_batch_option(
        &self,
        _grant: &AdminGrant,
        name: &str,
    ) -> ReportRepositoryResult<()> {
        let owned = name.to_owned();
        self.run_blocking(move |connection| {
            connection
                .execute("DELETE FROM batch_options WHERE name = ?1", params![owned])
                .map_err(map_sqlite_error)?;
            Ok(())
        })
        .await
    }

    async fn seed_batch_options(&self, defaults: &[BatchName]) -> ReportRepositoryResult<usize> {
        let names: Vec<String> = defaults.iter().map(|name| name.as_str().to_owned()).collect();
        self.run_blocking(move |connection| {
            let tx = connection.transaction().map_err(map_sqlite_error)?;
            if table_has_rows(&tx, "SELECT EXISTS (SELECT 1 FROM batch_options)")? {
                return Ok(0);
            }
            let mut inserted = 0;
            for name in &names {
                inserted += tx
                    .execute(
                        "INSERT OR IGNORE INTO batch_options (name) VALUES (?1)",
                        params![name],
                    )
                    .map_err(map_sqlite_error)?;
            }
            tx.commit().map_err(map_sqlite_error)?;
            Ok(inserted)
        })
        .await
    }

    async fn upsert_team_member(
        &self,
        _grant: &AdminGrant,
        member: &TeamMember,
    ) -> ReportRepositoryResult<()> {
        let owned = member.clone();
        self.run_blocking(move |connection| {
            upsert_member(connection, &owned)?;
            Ok(())
        })
        .await
    }

    async fn list_team_members(&self) -> ReportRepositoryResult<BTreeMap<String, String>> {
        self.run_blocking(|connection| {
            let mut statement = connection
                .prepare("SELECT name, team_function FROM team_members")
                .map_err(map_sqlite_error)?;
            let pairs = statement
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    ))
                })
                .map_err(map_sqlite_error)?
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map_err(map_sqlite_error)?;
            Ok(pairs)
        })
        .await
    }

    async fn seed_team_members(&self, members: &[TeamMember]) -> ReportRepositoryResult<usize> {
        let owned = members.to_vec();
        self.run_blocking(move |connection| {
            let tx = connection.transaction().map_err(map_sqlite_error)?;
            if table_has_rows(&tx, "SELECT EXISTS (SELECT 1 FROM team_members)")? {
                return Ok(0);
            }
            let mut inserted = 0;
            for member in &owned {
                inserted += upsert_member(&tx, member)?;
            }
            tx.commit().map_err(map_sqlite_error)?;
            Ok(inserted)
        })
        .await
    }
}

fn table_has_rows(tx: &Transaction<'_>, sql: &str) -> ReportRepositoryResult<bool> {
    tx.query_row(sql, [], |row| row.get::<_, bool>(0))
        .map_err(map_sqlite_error)
}

fn upsert_member(connection: &Connection, member: &TeamMember) -> ReportRepositoryResult<usize> {
    connection
        .execute(
            "INSERT INTO team_members (name, team_function) VALUES (?1, ?2) \
             ON CONFLICT (name) DO UPDATE SET team_function = excluded.team_function",
            params![member.name(), member.team_function()],
        )
        .map_err(map_sqlite_error)
}

fn insert_submission_row(
    tx: &Transaction<'_>,
    submission: &NewSubmission,
) -> ReportRepositoryResult<i64> {
    let blocks = submission.blocks();
    let stored = |category: TaskCategory| {
        blocks
            .get(category)
            .batches
            .to_stored()
            .map_err(ReportRepositoryError::persistence)
    };
    let spatial_batches = stored(TaskCategory::Spatial)?;
    let textual_batches = stored(TaskCategory::Textual)?;
    let qa_batches = stored(TaskCategory::Qa)?;
    let qc_batches = stored(TaskCategory::Qc)?;
    let automation_batches = stored(TaskCategory::Automation)?;
    let other_batches = stored(TaskCategory::Other)?;

    tx.execute(
        INSERT_SUBMISSION,
        params![
            submission.submission_date().to_string(),
            submission.user_name(),
            blocks.spatial.completed_count(),
            blocks.spatial.hours,
            spatial_batches,
            blocks.textual.completed_count(),
            blocks.textual.hours,
            textual_batches,
            blocks.qa.completed_count(),
            blocks.qa.hours,
            qa_batches,
            blocks.qc.completed_count(),
            blocks.qc.hours,
            qc_batches,
            blocks.automation.completed,
            blocks.automation.hours,
            automation_batches,
            blocks.other.completed_count(),
            blocks.other.hours,
            other_batches,
            submission.overtime_hours(),
            submission.total_hours(),
            submission.note(),
            submission.submitted_by(),
        ],
    )
    .map_err(map_sqlite_error)?;
    Ok(tx.last_insert_rowid())
}

fn insert_child_batches(
    tx: &Transaction<'_>,
    id: i64,
    submission: &NewSubmission,
) -> ReportRepositoryResult<()> {
    let mut statement = tx
        .prepare_cached(
            "INSERT INTO submission_batches (submission_id, category, position, batch) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(map_sqlite_error)?;
    for (category, position, batch) in child_batch_rows(submission) {
        statement
            .execute(params![id, category.as_str(), position, batch])
            .map_err(map_sqlite_error)?;
    }
    Ok(())
}

/// Filter values bound as `?1`..`?5` of [`SUBMISSION_FILTER`].
#[derive(Debug, Clone)]
struct FilterParams {
    date_equals: Option<String>,
    range_start: Option<String>,
    range_end: Option<String>,
    user_equals: Option<String>,
    date_from: Option<String>,
}

impl From<&SubmissionFilter> for FilterParams {
    fn from(filter: &SubmissionFilter) -> Self {
        Self {
            date_equals: filter.date_equals.map(|date| date.to_string()),
            range_start: filter.date_range.map(|range| range.start().to_string()),
            range_end: filter.date_range.map(|range| range.end().to_string()),
            user_equals: filter.user_equals.clone(),
            date_from: filter.date_from.map(|date| date.to_string()),
        }
    }
}

fn select_submissions(
    connection: &Connection,
    bound: &FilterParams,
) -> ReportRepositoryResult<Vec<StoredSubmission>> {
    let sql = format!(
        "SELECT {SUBMISSION_COLUMNS} FROM task_submissions WHERE {SUBMISSION_FILTER} \
         ORDER BY submit_time DESC, id DESC"
    );
    let mut statement = connection.prepare(&sql).map_err(map_sqlite_error)?;
    let rows = statement
        .query_map(
            params![
                bound.date_equals,
                bound.range_start,
                bound.range_end,
                bound.user_equals,
                bound.date_from
            ],
            SqliteSubmissionRow::read,
        )
        .map_err(map_sqlite_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_sqlite_error)?;
    rows.into_iter().map(SqliteSubmissionRow::into_stored).collect()
}

fn select_child_batches(
    connection: &Connection,
    bound: &FilterParams,
) -> ReportRepositoryResult<ChildBatches> {
    let sql = format!(
        "SELECT b.submission_id, b.category, b.batch FROM submission_batches b \
         WHERE b.submission_id IN (SELECT id FROM task_submissions WHERE {SUBMISSION_FILTER}) \
         ORDER BY b.submission_id, b.category, b.position"
    );
    let mut statement = connection.prepare(&sql).map_err(map_sqlite_error)?;
    let rows = statement
        .query_map(
            params![
                bound.date_equals,
                bound.range_start,
                bound.range_end,
                bound.user_equals,
                bound.date_from
            ],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .map_err(map_sqlite_error)?;

    let mut children = ChildBatches::new();
    for row in rows {
        let (submission_id, category_text, batch) = row.map_err(map_sqlite_error)?;
        let Ok(category) = TaskCategory::try_from(category_text.as_str()) else {
            tracing::warn!(submission_id, category = %category_text, "skipping batch row with unknown category");
            continue;
        };
        children
            .entry((submission_id, category))
            .or_default()
            .push(batch);
    }
    Ok(children)
}

/// Raw column values of one submission row before date parsing.
struct SqliteSubmissionRow {
    id: i64,
    submission_date: String,
    user_name: String,
    blocks: [StoredBlock; 6],
    overtime_hours: Option<f64>,
    total_hours: Option<f64>,
    note: Option<String>,
    submitted_by: Option<String>,
    submit_time: Option<String>,
}

impl SqliteSubmissionRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            submission_date: row.get(1)?,
            user_name: row.get(2)?,
            blocks: [
                read_block(row, 3)?,
                read_block(row, 6)?,
                read_block(row, 9)?,
                read_block(row, 12)?,
                read_block(row, 15)?,
                read_block(row, 18)?,
            ],
            overtime_hours: row.get(21)?,
            total_hours: row.get(22)?,
            note: row.get(23)?,
            submitted_by: row.get(24)?,
            submit_time: row.get(25)?,
        })
    }

    fn into_stored(self) -> ReportRepositoryResult<StoredSubmission> {
        let submission_date = parse_date(&self.submission_date)?;
        let created_at = self
            .submit_time
            .as_deref()
            .map_or(Ok(DateTime::<Utc>::UNIX_EPOCH), parse_timestamp)?;
        Ok(StoredSubmission {
            id: self.id,
            submission_date,
            user_name: self.user_name,
            blocks: self.blocks,
            overtime_hours: self.overtime_hours,
            total_hours: self.total_hours,
            note: self.note,
            submitted_by: self.submitted_by,
            created_at,
        })
    }
}

fn read_block(row: &Row<'_>, first: usize) -> rusqlite::Result<StoredBlock> {
    Ok(StoredBlock {
        completed: row.get(first)?,
        hours: row.get(first + 1)?,
        batches: row.get(first + 2)?,
    })
}

fn parse_date(text: &str) -> ReportRepositoryResult<NaiveDate> {
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(ReportRepositoryError::persistence)
}

fn parse_timestamp(text: &str) -> ReportRepositoryResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|stamp| stamp.with_timezone(&Utc)))
        .map_err(ReportRepositoryError::persistence)
}
