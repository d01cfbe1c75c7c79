//! Configuration snapshot export.

use super::ExportError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Users and batches in force at export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationSnapshot {
    /// Rostered users.
    pub users: Vec<String>,
    /// Registered batches.
    pub batches: Vec<String>,
    /// When the snapshot was taken.
    pub export_date: DateTime<Utc>,
}

impl ConfigurationSnapshot {
    /// Captures a snapshot.
    #[must_use]
    pub const fn new(users: Vec<String>, batches: Vec<String>, export_date: DateTime<Utc>) -> Self {
        Self {
            users,
            batches,
            export_date,
        }
    }

    /// Returns the conventional download name for a snapshot taken on
    /// `date`.
    #[must_use]
    pub fn file_name(date: NaiveDate) -> String {
        format!("dashboard_config_{}.json", date.format("%Y%m%d"))
    }

    /// Renders the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] when serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
