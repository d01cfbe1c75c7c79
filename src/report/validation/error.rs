//! Validation error types for report entry.

use crate::report::domain::TaskCategory;
use std::fmt;
use thiserror::Error;

/// A single violated entry rule.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// No user was chosen.
    #[error("Please select a user")]
    MissingUser,

    /// The user is not on the current roster.
    #[error("User '{0}' is not on the roster")]
    UnknownUser(String),

    /// No task category was selected.
    #[error("Please select at least one task type")]
    NoTaskSelected,

    /// A selected category is missing required values.
    #[error("{}", category_requirement(.0))]
    IncompleteCategory(TaskCategory),

    /// A selected category names batches missing from the registry.
    #[error("{} batches are not in the batch registry: {}", .category.label(), .batches.join(", "))]
    UnknownBatches {
        /// Category naming the batches.
        category: TaskCategory,
        /// Unknown batch names in entry order.
        batches: Vec<String>,
    },

    /// Overtime hours are negative.
    #[error("Over time hours must not be negative")]
    NegativeOvertime,

    /// The day adds up to less than the minimum.
    #[error("Total hours must be at least 7.5")]
    InsufficientHours {
        /// Computed total hours.
        total: f64,
    },
}

fn category_requirement(category: &TaskCategory) -> &'static str {
    match *category {
        TaskCategory::Spatial => {
            "Spatial task requires completed count > 0, hours > 0, and at least one batch"
        }
        TaskCategory::Textual => {
            "Textual task requires completed count > 0, hours > 0, and at least one batch"
        }
        TaskCategory::Qa => {
            "QA task requires completed count > 0, hours > 0, and at least one batch"
        }
        TaskCategory::Qc => {
            "QC task requires completed count > 0, hours > 0, and at least one batch"
        }
        TaskCategory::Automation => {
            "Automation task requires progress % > 0 (at most 100), hours > 0, and at least one batch"
        }
        TaskCategory::Other => "Other task requires completed count > 0 and hours > 0",
    }
}

/// Every rule violated by one report, in reporting order.
///
/// Never empty when returned as an error.
#[derive(Debug, Clone, Error, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl ValidationErrors {
    pub(crate) const fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    /// Returns the violations in reporting order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Returns the human-readable messages in reporting order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Returns `true` when the given violation is present.
    #[must_use]
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    /// Returns the number of violations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no violations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
