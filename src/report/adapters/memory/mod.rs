//! In-memory adapters for report persistence.

mod store;

pub use store::InMemoryReportStore;
