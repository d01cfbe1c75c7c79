//! Error types for report domain construction and parsing.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing domain report values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportDomainError {
    /// The batch name is empty after trimming.
    #[error("batch name must not be empty")]
    EmptyBatchName,

    /// The team member name is empty after trimming.
    #[error("team member name must not be empty")]
    EmptyMemberName,

    /// The date range ends before it starts.
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// The retention window cannot be applied to the current date.
    #[error("retention window of {0} days is out of range")]
    InvalidRetentionWindow(u32),
}

/// Error returned while parsing task categories from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task category: {0}")]
pub struct ParseTaskCategoryError(pub String);
