//! Domain model for daily task reporting.
//!
//! The report domain models one submission per user per day, the six task
//! blocks inside it, and the small reference tables (settings, batch
//! registry, team functions) that surround it. Infrastructure concerns stay
//! outside of the domain boundary.

mod admin;
mod batch;
mod block;
mod catalog;
mod category;
mod error;
mod raw;
mod submission;

pub use admin::{AdminAccessError, AdminGate, AdminGrant};
pub use batch::{BatchList, BatchName};
pub use block::{TaskBlock, TaskBlocks, total_hours};
pub use catalog::{AppSettings, DEFAULT_BATCH_OPTIONS, TeamMember};
pub use category::TaskCategory;
pub use error::{ParseTaskCategoryError, ReportDomainError};
pub use raw::{RawSubmission, RawTaskBlock};
pub(crate) use submission::normalize_note;
pub use submission::{
    DateRange, NewSubmission, PersistedSubmissionData, SubmissionEdit, SubmissionFilter,
    SubmissionId, TaskSubmission,
};
