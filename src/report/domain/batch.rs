//! Batch identifiers and the ordered batch lists attached to task blocks.

use super::ReportDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated batch registry entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchName(String);

impl BatchName {
    /// Creates a batch name from trimmed input.
    ///
    /// # Errors
    ///
    /// Returns [`ReportDomainError::EmptyBatchName`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ReportDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReportDomainError::EmptyBatchName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the batch name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BatchName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BatchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered batch identifiers worked on within one task block.
///
/// Order is preserved through storage but carries no meaning for reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchList(Vec<String>);

impl BatchList {
    /// Creates a batch list from the given identifiers.
    #[must_use]
    pub fn new<I, S>(batches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(batches.into_iter().map(Into::into).collect())
    }

    /// Creates an empty batch list.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Serializes the list into its stored JSON array form.
    ///
    /// # Errors
    ///
    /// Returns the underlying serializer error.
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Parses a stored JSON array.
    ///
    /// Missing, blank or malformed stored values yield an empty list so that
    /// one damaged historical row never fails a whole report read.
    #[must_use]
    pub fn from_stored(stored: Option<&str>) -> Self {
        let Some(text) = stored.map(str::trim).filter(|text| !text.is_empty()) else {
            return Self::empty();
        };
        serde_json::from_str::<Vec<String>>(text)
            .map(Self)
            .unwrap_or_default()
    }

    /// Returns the batches joined with `", "` for tabular exports.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }

    /// Returns the batch identifiers.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterates over batch identifiers in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of batches.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no batch is listed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for BatchList {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
