//! The six task categories a daily report is broken into.

use super::ParseTaskCategoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of reported work.
///
/// The declaration order is the canonical order used for validation messages,
/// storage columns and report columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Spatial data capture.
    Spatial,
    /// Textual data capture.
    Textual,
    /// Quality assurance.
    Qa,
    /// Quality control.
    Qc,
    /// Automation work, reported as percentage progress.
    Automation,
    /// Anything else; batches are optional.
    Other,
}

impl TaskCategory {
    /// All categories in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Spatial,
        Self::Textual,
        Self::Qa,
        Self::Qc,
        Self::Automation,
        Self::Other,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spatial => "spatial",
            Self::Textual => "textual",
            Self::Qa => "qa",
            Self::Qc => "qc",
            Self::Automation => "automation",
            Self::Other => "other",
        }
    }

    /// Returns the human-readable label used in messages and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spatial => "Spatial",
            Self::Textual => "Textual",
            Self::Qa => "QA",
            Self::Qc => "QC",
            Self::Automation => "Automation",
            Self::Other => "Other",
        }
    }

    /// Returns `true` when a selected block of this category must name at
    /// least one batch.
    #[must_use]
    pub const fn requires_batches(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Returns `true` when `completed` is a percentage rather than a count.
    #[must_use]
    pub const fn is_progress(self) -> bool {
        matches!(self, Self::Automation)
    }
}

impl TryFrom<&str> for TaskCategory {
    type Error = ParseTaskCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseTaskCategoryError(value.to_owned()))
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
