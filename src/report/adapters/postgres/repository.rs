//! `PostgreSQL` repository implementation for report storage.

use super::{
    models::{BatchRow, NewSubmissionRow, SubmissionEditChangeset, SubmissionRow},
    schema::{app_settings, batch_options, submission_batches, task_submissions, team_members},
};
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
    },
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sql_types::{Date, Nullable, Text};
use diesel::upsert::excluded;
use std::collections::BTreeMap;
use std::time::Duration;

/// `PostgreSQL` connection pool type used by report adapters.
pub type ReportPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema installation script, also usable as a Diesel migration.
const POSTGRES_SCHEMA: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_report_tables/up.sql");

/// Filtered submission read, newest first.
///
/// Numeric and timestamp columns are cast so dashboard tables with `REAL`
/// hours and a `TIMESTAMP` creation time read like freshly created ones.
/// Rows without a creation time sort last.
const SELECT_SUBMISSIONS: &str = "SELECT id, submission_date, user_names, \
    spatial_completed, spatial_hours::float8 AS spatial_hours, spatial_batches, \
    textual_completed, textual_hours::float8 AS textual_hours, textual_batches, \
    qa_completed, qa_hours::float8 AS qa_hours, qa_batches, \
    qc_completed, qc_hours::float8 AS qc_hours, qc_batches, \
    automation_completed::float8 AS automation_completed, \
    automation_hours::float8 AS automation_hours, automation_batches, \
    other_completed, other_hours::float8 AS other_hours, other_batches, \
    overtime_hours::float8 AS overtime_hours, total_hours::float8 AS total_hours, \
    note, submitted_by, submit_time::timestamptz AS submit_time \
    FROM task_submissions \
    WHERE ($1::date IS NULL OR submission_date = $1) \
    AND ($2::date IS NULL OR submission_date >= $2) \
    AND ($3::date IS NULL OR submission_date <= $3) \
    AND ($4::text IS NULL OR user_names = $4) \
    AND ($5::date IS NULL OR submission_date >= $5) \
    ORDER BY submit_time DESC NULLS LAST, id DESC";

/// Connections kept by the pool; the dashboard issues one query at a time.
const POOL_SIZE: u32 = 4;

/// `PostgreSQL`-backed report store.
#[derive(Debug, Clone)]
pub struct PostgresReportStore {
    pool: ReportPgPool,
}

impl PostgresReportStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReportPgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url`, failing once `connect_timeout`
    /// elapses without a usable connection, and installs the schema.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::StorageUnavailable`] with a
    /// classified cause when the server cannot be reached.
    pub async fn connect(
        database_url: &str,
        connect_timeout: Duration,
    ) -> ReportRepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = tokio::task::spawn_blocking(move || {
            Pool::builder()
                .max_size(POOL_SIZE)
                .connection_timeout(connect_timeout)
                .build(manager)
        })
        .await
        .map_err(ReportRepositoryError::persistence)?
        .map_err(|err| ReportRepositoryError::unavailable(err.to_string()))?;

        let store = Self::new(pool);
        store
            .run_blocking(|connection| {
                connection
                    .batch_execute(POSTGRES_SCHEMA)
                    .map_err(ReportRepositoryError::persistence)
            })
            .await?;
        tracing::info!("opened PostgreSQL report store");
        Ok(store)
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReportRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReportRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|err| ReportRepositoryError::unavailable(err.to_string()))?;
            f(&mut connection)
        })
        .await
        .map_err(ReportRepositoryError::persistence)?
    }
}

fn rows_to_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

fn to_int4(value: i64) -> ReportRepositoryResult<i32> {
    i32::try_from(value).map_err(ReportRepositoryError::persistence)
}

#[async_trait]
impl SubmissionRepository for PostgresReportStore {
    async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> ReportRepositoryResult<SubmissionId> {
        let new_row = to_new_row(submission)?;
        let children = child_batch_rows(submission);
        self.run_blocking(move |connection| {
            let id = connection
                .transaction::<_, DieselError, _>(|tx| {
                    let id = diesel::insert_into(task_submissions::table)
                        .values(&new_row)
                        .returning(task_submissions::id)
                        .get_result::<i32>(tx)?;
                    let batch_rows: Vec<BatchRow> = children
                        .into_iter()
                        .map(|(category, position, batch)| BatchRow {
                            submission_id: id,
                            category: category.as_str().to_owned(),
                            position,
                            batch,
                        })
                        .collect();
                    if !batch_rows.is_empty() {
                        diesel::insert_into(submission_batches::table)
                            .values(&batch_rows)
                            .execute(tx)?;
                    }
                    Ok(id)
                })
                .map_err(ReportRepositoryError::persistence)?;
            Ok(SubmissionId::new(i64::from(id)))
        })
        .await
    }

    async fn update_submission(
        &self,
        _grant: &AdminGrant,
        id: SubmissionId,
        edit: &SubmissionEdit,
    ) -> ReportRepositoryResult<()> {
        let row_id = to_int4(id.value())?;
        let changeset = SubmissionEditChangeset {
            submission_date: edit.submission_date,
            note: edit.stored_note(),
        };
        let is_empty = edit.is_empty();
        let found = self
            .run_blocking(move |connection| {
                let target = task_submissions::table.filter(task_submissions::id.eq(row_id));
                let affected = if is_empty {
                    target.count().get_result::<i64>(connection).map(|count| {
                        usize::try_from(count).unwrap_or_default()
                    })
                } else {
                    diesel::update(target).set(&changeset).execute(connection)
                };
                affected
                    .map(|rows| rows > 0)
                    .map_err(ReportRepositoryError::persistence)
            })
            .await?;
        if found {
            Ok(())
        } else {
            Err(ReportRepositoryError::NotFound(id))
        }
    }

    async fn query_submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> ReportRepositoryResult<Vec<TaskSubmission>> {
        let owned = filter.clone();
        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(SELECT_SUBMISSIONS)
                .bind::<Nullable<Date>, _>(owned.date_equals)
                .bind::<Nullable<Date>, _>(owned.date_range.map(|range| range.start()))
                .bind::<Nullable<Date>, _>(owned.date_range.map(|range| range.end()))
                .bind::<Nullable<Text>, _>(owned.user_equals)
                .bind::<Nullable<Date>, _>(owned.date_from)
                .load::<SubmissionRow>(connection)
                .map_err(ReportRepositoryError::persistence)?;

            let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
            let children = load_child_batches(connection, &ids)?;
            Ok(rows
                .into_iter()
                .map(|row| into_submission(row_to_stored(row), &children))
                .collect())
        })
        .await
    }

    async fn delete_submissions_older_than(
        &self,
        _grant: &AdminGrant,
        cutoff: NaiveDate,
    ) -> ReportRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            diesel::delete(
                task_submissions::table.filter(task_submissions::submission_date.lt(cutoff)),
            )
            .execute(connection)
            .map(rows_to_u64)
            .map_err(ReportRepositoryError::persistence)
        })
        .await
    }

    async fn delete_all_submissions(&self, _grant: &AdminGrant) -> ReportRepositoryResult<u64> {
        self.run_blocking(|connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::delete(submission_batches::table).execute(tx)?;
                    diesel::delete(task_submissions::table).execute(tx)
                })
                .map(rows_to_u64)
                .map_err(ReportRepositoryError::persistence)
        })
        .await
    }
}

#[async_trait]
impl CatalogRepository for PostgresReportStore {
    async fn settings(&self) -> ReportRepositoryResult<AppSettings> {
        self.run_blocking(|connection| {
            let targets = app_settings::table
                .find(AppSettings::SINGLETON_ID)
                .select((app_settings::spatial_target, app_settings::textual_target))
                .first::<(Option<i32>, Option<i32>)>(connection)
                .optional()
                .map_err(ReportRepositoryError::persistence)?;
            Ok(targets.map_or_else(AppSettings::default, |(spatial, textual)| {
                AppSettings::new(
                    i64::from(spatial.unwrap_or(0)),
                    i64::from(textual.unwrap_or(0)),
                )
            }))
        })
        .await
    }

    async fn update_settings(
        &self,
        _grant: &AdminGrant,
        settings: AppSettings,
    ) -> ReportRepositoryResult<()> {
        let spatial = to_int4(settings.spatial_target)?;
        let textual = to_int4(settings.textual_target)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(app_settings::table)
                .values((
                    app_settings::id.eq(AppSettings::SINGLETON_ID),
                    app_settings::spatial_target.eq(spatial),
                    app_settings::textual_target.eq(textual),
                ))
                .on_conflict(app_settings::id)
                .do_update()
                .set((
                    app_settings::spatial_target.eq(excluded(app_settings::spatial_target)),
                    app_settings::textual_target.eq(excluded(app_settings::textual_target)),
                ))
                .execute(connection)
                .map_err(ReportRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn list_batch_options(&self) -> ReportRepositoryResult<Vec<String>> {
        self.run_blocking(|connection| {
            batch_options::table
                .select(batch_options::name)
                .order(batch_options::name.asc())
                .load::<String>(connection)
                .map_err(ReportRepositoryError::persistence)
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
            diesel::insert_into(batch_options::table)
                .values(batch_options::name.eq(owned))
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(ReportRepositoryError::persistence)?;
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
            diesel::delete(batch_options::table.filter(batch_options::name.eq(owned)))
                .execute(connection)
                .map_err(ReportRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn seed_batch_options(&self, defaults: &[BatchName]) -> ReportRepositoryResult<usize> {
        let names: Vec<_> = defaults
            .iter()
            .map(|name| batch_options::name.eq(name.as_str().to_owned()))
            .collect();
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let existing = batch_options::table.count().get_result::<i64>(tx)?;
                    if existing > 0 || names.is_empty() {
                        return Ok(0);
                    }
                    diesel::insert_into(batch_options::table)
                        .values(&names)
                        .on_conflict_do_nothing()
                        .execute(tx)
                })
                .map_err(ReportRepositoryError::persistence)
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
            upsert_members(connection, std::slice::from_ref(&owned))
                .map_err(ReportRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn list_team_members(&self) -> ReportRepositoryResult<BTreeMap<String, String>> {
        self.run_blocking(|connection| {
            let rows = team_members::table
                .select((team_members::name, team_members::team_function))
                .load::<(String, Option<String>)>(connection)
                .map_err(ReportRepositoryError::persistence)?;
            Ok(rows
                .into_iter()
                .map(|(name, team_function)| (name, team_function.unwrap_or_default()))
                .collect())
        })
        .await
    }

    async fn seed_team_members(&self, members: &[TeamMember]) -> ReportRepositoryResult<usize> {
        let owned = members.to_vec();
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let existing = team_members::table.count().get_result::<i64>(tx)?;
                    if existing > 0 {
                        return Ok(0);
                    }
                    upsert_members(tx, &owned)
                })
                .map_err(ReportRepositoryError::persistence)
        })
        .await
    }
}

fn upsert_members(connection: &mut PgConnection, members: &[TeamMember]) -> QueryResult<usize> {
    if members.is_empty() {
        return Ok(0);
    }
    let values: Vec<_> = members
        .iter()
        .map(|member| {
            (
                team_members::name.eq(member.name().to_owned()),
                team_members::team_function.eq(member.team_function().to_owned()),
            )
        })
        .collect();
    diesel::insert_into(team_members::table)
        .values(&values)
        .on_conflict(team_members::name)
        .do_update()
        .set(team_members::team_function.eq(excluded(team_members::team_function)))
        .execute(connection)
}

fn load_child_batches(
    connection: &mut PgConnection,
    ids: &[i32],
) -> ReportRepositoryResult<ChildBatches> {
    let rows = submission_batches::table
        .filter(submission_batches::submission_id.eq_any(ids))
        .order((
            submission_batches::submission_id,
            submission_batches::category,
            submission_batches::position,
        ))
        .select(BatchRow::as_select())
        .load::<BatchRow>(connection)
        .map_err(ReportRepositoryError::persistence)?;

    let mut children = ChildBatches::new();
    for row in rows {
        let Ok(category) = TaskCategory::try_from(row.category.as_str()) else {
            tracing::warn!(
                submission_id = row.submission_id,
                category = %row.category,
                "skipping batch row with unknown category"
            );
            continue;
        };
        children
            .entry((i64::from(row.submission_id), category))
            .or_default()
            .push(row.batch);
    }
    Ok(children)
}

fn to_new_row(submission: &NewSubmission) -> ReportRepositoryResult<NewSubmissionRow> {
    let blocks = submission.blocks();
    let count = |category: TaskCategory| to_int4(blocks.get(category).completed_count());
    let stored = |category: TaskCategory| {
        blocks
            .get(category)
            .batches
            .to_stored()
            .map_err(ReportRepositoryError::persistence)
    };

    Ok(NewSubmissionRow {
        submission_date: submission.submission_date(),
        user_names: submission.user_name().to_owned(),
        spatial_completed: count(TaskCategory::Spatial)?,
        spatial_hours: blocks.spatial.hours,
        spatial_batches: stored(TaskCategory::Spatial)?,
        textual_completed: count(TaskCategory::Textual)?,
        textual_hours: blocks.textual.hours,
        textual_batches: stored(TaskCategory::Textual)?,
        qa_completed: count(TaskCategory::Qa)?,
        qa_hours: blocks.qa.hours,
        qa_batches: stored(TaskCategory::Qa)?,
        qc_completed: count(TaskCategory::Qc)?,
        qc_hours: blocks.qc.hours,
        qc_batches: stored(TaskCategory::Qc)?,
        automation_completed: blocks.automation.completed,
        automation_hours: blocks.automation.hours,
        automation_batches: stored(TaskCategory::Automation)?,
        other_completed: count(TaskCategory::Other)?,
        other_hours: blocks.other.hours,
        other_batches: stored(TaskCategory::Other)?,
        overtime_hours: submission.overtime_hours(),
        total_hours: submission.total_hours(),
        note: submission.note().map(str::to_owned),
        submitted_by: submission.submitted_by().to_owned(),
    })
}

fn count_block(completed: Option<i32>, hours: Option<f64>, batches: Option<String>) -> StoredBlock {
    StoredBlock {
        completed: completed.map(f64::from),
        hours,
        batches,
    }
}

fn row_to_stored(row: SubmissionRow) -> StoredSubmission {
    StoredSubmission {
        id: i64::from(row.id),
        submission_date: row.submission_date,
        user_name: row.user_names,
        blocks: [
            count_block(row.spatial_completed, row.spatial_hours, row.spatial_batches),
            count_block(row.textual_completed, row.textual_hours, row.textual_batches),
            count_block(row.qa_completed, row.qa_hours, row.qa_batches),
            count_block(row.qc_completed, row.qc_hours, row.qc_batches),
            StoredBlock {
                completed: row.automation_completed,
                hours: row.automation_hours,
                batches: row.automation_batches,
            },
            count_block(row.other_completed, row.other_hours, row.other_batches),
        ],
        overtime_hours: row.overtime_hours,
        total_hours: row.total_hours,
        note: row.note,
        submitted_by: row.submitted_by,
        created_at: row.submit_time.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}
