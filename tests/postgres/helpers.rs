//! Shared helpers for `PostgreSQL` store tests.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use eyre::WrapErr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use taskboard::report::{
    adapters::postgres::PostgresReportStore,
    domain::{AdminGate, AdminGrant, NewSubmission, RawSubmission, RawTaskBlock, TaskCategory},
    validation::{ValidationContext, build_submission},
};

/// Server URL variable; tests needing a server skip when it is unset.
pub const TEST_DATABASE_URL_ENV: &str = "TASKBOARD_TEST_DATABASE_URL";

/// Connect timeout used by the tests.
pub const TEST_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

static DATABASE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A store connected to a database created for one test.
pub struct TemporaryStore {
    /// Store under test.
    pub store: PostgresReportStore,
    admin_url: String,
    database: String,
}

impl TemporaryStore {
    /// Drops the test database.
    ///
    /// # Errors
    ///
    /// Returns an error when the server refuses the drop.
    pub fn drop_database(self) -> eyre::Result<()> {
        let Self {
            store,
            admin_url,
            database,
        } = self;
        drop(store);
        let mut connection =
            PgConnection::establish(&admin_url).wrap_err("connect to admin database")?;
        connection
            .batch_execute(&format!("DROP DATABASE IF EXISTS {database} WITH (FORCE)"))
            .wrap_err("drop test database")?;
        Ok(())
    }
}

/// Creates a fresh database and opens a store on it, or returns `None` when
/// no server is configured.
///
/// # Errors
///
/// Returns an error when the server is configured but unusable.
pub async fn temporary_store() -> eyre::Result<Option<TemporaryStore>> {
    temporary_store_after("").await
}

/// Like [`temporary_store`], but runs `setup` on the fresh database before
/// the store installs its schema.
///
/// # Errors
///
/// Returns an error when the server is configured but unusable or `setup`
/// fails.
pub async fn temporary_store_after(setup: &str) -> eyre::Result<Option<TemporaryStore>> {
    let Ok(admin_url) = std::env::var(TEST_DATABASE_URL_ENV) else {
        return Ok(None);
    };
    let database = format!(
        "taskboard_test_{}_{}",
        std::process::id(),
        DATABASE_COUNTER.fetch_add(1, Ordering::Relaxed)
    );

    let mut connection =
        PgConnection::establish(&admin_url).wrap_err("connect to admin database")?;
    connection
        .batch_execute(&format!("CREATE DATABASE {database}"))
        .wrap_err("create test database")?;

    let url = database_url(&admin_url, &database)?;
    if !setup.is_empty() {
        PgConnection::establish(&url)
            .wrap_err("connect to test database")?
            .batch_execute(setup)
            .wrap_err("run setup script")?;
    }
    let store = PostgresReportStore::connect(&url, TEST_CONNECT_TIMEOUT)
        .await
        .wrap_err("open postgres store")?;
    Ok(Some(TemporaryStore {
        store,
        admin_url,
        database,
    }))
}

/// Replaces the database name at the end of a connection URL.
fn database_url(admin_url: &str, database: &str) -> eyre::Result<String> {
    let (base, _) = admin_url
        .rsplit_once('/')
        .ok_or_else(|| eyre::eyre!("{TEST_DATABASE_URL_ENV} has no database path"))?;
    Ok(format!("{base}/{database}"))
}

/// Returns an admin grant for mutating calls.
pub fn grant() -> eyre::Result<AdminGrant> {
    AdminGate::new(Some("PM_ADMIN"))
        .unlock("PM_ADMIN")
        .wrap_err("unlock admin gate")
}

/// Builds a validated submission with automation progress and other work.
pub fn mixed_submission(date: chrono::NaiveDate, user: &str) -> eyre::Result<NewSubmission> {
    let raw = RawSubmission::new(date, user)
        .with_block(TaskCategory::Automation, RawTaskBlock::new(37.5, 6.0, ["B1"]))
        .with_block(TaskCategory::Other, RawTaskBlock::new(2.0, 2.0, Vec::<String>::new()))
        .with_note("pipeline work");
    let context = ValidationContext::new([user], ["B1"]);
    build_submission(&raw, &context).map_err(|errors| eyre::eyre!("invalid fixture: {errors}"))
}
