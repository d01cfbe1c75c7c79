//! Export of stored submissions.
//!
//! Every format is rendered from the same [`ExportRow`] so CSV, JSON and
//! tabular exports never disagree. Batch lists are joined with `", "`.

mod error;
mod render;
mod row;
mod snapshot;

pub use error::ExportError;
pub use render::{ExportFormat, ExportSummary, ExportTable, to_csv, to_json};
pub use row::ExportRow;
pub use snapshot::ConfigurationSnapshot;
