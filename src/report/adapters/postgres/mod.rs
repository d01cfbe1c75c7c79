//! `PostgreSQL` adapters for report persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresReportStore, ReportPgPool};
