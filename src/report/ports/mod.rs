//! Port contracts for daily task reporting.
//!
//! Ports define infrastructure-agnostic interfaces used by report services.

pub mod repository;
pub mod roster;

pub use repository::{
    CatalogRepository, ReportRepositoryError, ReportRepositoryResult, ReportStore,
    SubmissionRepository, UnavailableCause,
};
pub use roster::{RosterError, RosterSource};
