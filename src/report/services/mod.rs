//! Application services for report entry and reference data.

mod cache;
mod catalog;
mod submission;

pub use cache::{ReadCache, RecordFamily, TtlCache};
pub use catalog::{CatalogService, CatalogServiceError, CatalogServiceResult};
pub use submission::{SubmissionService, SubmissionServiceError, SubmissionServiceResult};
