//! Store selection at startup.

use super::{postgres::PostgresReportStore, sqlite::SqliteReportStore};
use crate::report::ports::{ReportRepositoryResult, ReportStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Which relational store backs the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Embedded single-file store.
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Busy timeout for each connection.
        busy_timeout: Duration,
    },
    /// Networked `PostgreSQL` store.
    Postgres {
        /// Connection URL.
        url: String,
        /// Time allowed to obtain a connection.
        connect_timeout: Duration,
    },
}

impl StoreConfig {
    /// Returns a short dialect name for logs.
    #[must_use]
    pub const fn dialect(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::Postgres { .. } => "postgres",
        }
    }
}

/// Opens the configured store and installs its schema.
///
/// # Errors
///
/// Returns [`ReportRepositoryError`](crate::report::ports::ReportRepositoryError)
/// when the store cannot be reached or its schema cannot be installed.
pub async fn open_store(config: &StoreConfig) -> ReportRepositoryResult<Arc<dyn ReportStore>> {
    tracing::debug!(dialect = config.dialect(), "opening report store");
    let store: Arc<dyn ReportStore> = match config {
        StoreConfig::Sqlite { path, busy_timeout } => {
            Arc::new(SqliteReportStore::open(path.clone(), *busy_timeout).await?)
        }
        StoreConfig::Postgres {
            url,
            connect_timeout,
        } => Arc::new(PostgresReportStore::connect(url, *connect_timeout).await?),
    };
    Ok(store)
}
