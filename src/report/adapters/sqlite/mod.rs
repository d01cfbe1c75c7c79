//! Embedded `SQLite` adapter for report persistence.

mod repository;
mod schema;

pub use repository::{DEFAULT_BUSY_TIMEOUT, SqliteReportStore};
