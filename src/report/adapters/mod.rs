//! Persistence and roster adapters for daily task reporting.
//!
//! This module provides concrete implementations of the [`ReportStore`] and
//! [`RosterSource`] ports. Adapters handle all infrastructure concerns while
//! the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryReportStore`]: Thread-safe in-memory storage for
//!   service tests
//! - [`sqlite::SqliteReportStore`]: Embedded single-file storage, one
//!   connection per call
//! - [`postgres::PostgresReportStore`]: Networked `PostgreSQL` storage using
//!   Diesel ORM and an r2d2 pool
//! - [`roster::FileRoster`]: Roster read from a user list or CSV file
//!
//! [`open::open_store`] selects between the two relational stores once at
//! startup.
//!
//! [`ReportStore`]: crate::report::ports::ReportStore
//! [`RosterSource`]: crate::report::ports::RosterSource

mod columns;
pub mod memory;
pub mod open;
pub mod postgres;
pub mod roster;
pub mod sqlite;

pub use open::{StoreConfig, open_store};
