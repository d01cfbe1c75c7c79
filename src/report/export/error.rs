//! Export error types.

use std::sync::Arc;
use thiserror::Error;

/// Errors raised while rendering an export.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV export failed: {0}")]
    Csv(Arc<csv::Error>),

    /// The CSV writer could not be flushed.
    #[error("CSV export failed: {0}")]
    CsvFlush(Arc<std::io::Error>),

    /// JSON serialization failed.
    #[error("JSON export failed: {0}")]
    Json(Arc<serde_json::Error>),

    /// The rendered CSV was not UTF-8.
    #[error("CSV export produced invalid UTF-8")]
    Encoding,
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(Arc::new(err))
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}
