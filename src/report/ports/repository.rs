//! Repository ports for submissions and the reference tables around them.
//!
//! Both store dialects implement the same two traits; callers depend on
//! [`ReportStore`] and never learn which dialect they talk to.

use crate::report::domain::{
    AdminGrant, AppSettings, BatchName, NewSubmission, SubmissionEdit, SubmissionFilter,
    SubmissionId, TaskSubmission, TeamMember,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for report repository operations.
pub type ReportRepositoryResult<T> = Result<T, ReportRepositoryError>;

/// Submission persistence contract.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Stores a validated submission and returns its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError`] when the store rejects the write.
    async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> ReportRepositoryResult<SubmissionId>;

    /// Changes the date and/or note of a stored submission.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::NotFound`] when no submission has the
    /// identifier.
    async fn update_submission(
        &self,
        grant: &AdminGrant,
        id: SubmissionId,
        edit: &SubmissionEdit,
    ) -> ReportRepositoryResult<()>;

    /// Returns matching submissions, newest creation first.
    ///
    /// Ties on creation time are broken by identifier, descending.
    async fn query_submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> ReportRepositoryResult<Vec<TaskSubmission>>;

    /// Deletes every submission dated strictly before `cutoff`.
    ///
    /// Returns the number of removed submissions.
    async fn delete_submissions_older_than(
        &self,
        grant: &AdminGrant,
        cutoff: NaiveDate,
    ) -> ReportRepositoryResult<u64>;

    /// Deletes every submission and returns how many were removed.
    async fn delete_all_submissions(&self, grant: &AdminGrant) -> ReportRepositoryResult<u64>;
}

/// Persistence contract for settings, the batch registry and team functions.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Returns the singleton settings row.
    async fn settings(&self) -> ReportRepositoryResult<AppSettings>;

    /// Overwrites the singleton settings row.
    async fn update_settings(
        &self,
        grant: &AdminGrant,
        settings: AppSettings,
    ) -> ReportRepositoryResult<()>;

    /// Returns registered batch names in ascending order.
    async fn list_batch_options(&self) -> ReportRepositoryResult<Vec<String>>;

    /// Registers a batch; registering an existing name is a no-op.
    async fn add_batch_option(
        &self,
        grant: &AdminGrant,
        name: &BatchName,
    ) -> ReportRepositoryResult<()>;

    /// Removes a batch; removing an unknown name is a no-op.
    async fn remove_batch_option(&self, grant: &AdminGrant, name: &str)
    -> ReportRepositoryResult<()>;

    /// Registers the given batches only when the registry is empty.
    ///
    /// Returns the number of inserted names.
    async fn seed_batch_options(&self, defaults: &[BatchName]) -> ReportRepositoryResult<usize>;

    /// Inserts or replaces a team function mapping.
    async fn upsert_team_member(
        &self,
        grant: &AdminGrant,
        member: &TeamMember,
    ) -> ReportRepositoryResult<()>;

    /// Returns every name to team function mapping.
    async fn list_team_members(&self) -> ReportRepositoryResult<BTreeMap<String, String>>;

    /// Inserts the given mappings only when the table is empty.
    ///
    /// Returns the number of inserted mappings.
    async fn seed_team_members(&self, members: &[TeamMember]) -> ReportRepositoryResult<usize>;
}

/// The full storage contract, selected once at startup.
pub trait ReportStore: SubmissionRepository + CatalogRepository {}

impl<T> ReportStore for T where T: SubmissionRepository + CatalogRepository + ?Sized {}

/// Classified reason a store could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnavailableCause {
    /// The server rejected the credentials.
    Credentials,
    /// The connection attempt timed out.
    Timeout,
    /// The host could not be resolved or reached.
    Unreachable,
    /// Any other connectivity failure.
    Other,
}

impl UnavailableCause {
    /// Classifies a driver error message.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        let mentions = |needles: &[&str]| needles.iter().any(|needle| lowered.contains(needle));

        if mentions(&["password authentication failed", "authentication"]) {
            Self::Credentials
        } else if mentions(&[
            "could not translate host name",
            "connection refused",
            "no route to host",
            "could not connect",
            "network is unreachable",
        ]) {
            Self::Unreachable
        } else if mentions(&["timed out", "timeout"]) {
            Self::Timeout
        } else {
            Self::Other
        }
    }

    /// Returns an operator-facing hint for the cause.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Credentials => "check the database username and password",
            Self::Timeout => "the database did not answer in time",
            Self::Unreachable => "check the database host name and network access",
            Self::Other => "check the database connection settings",
        }
    }
}

impl fmt::Display for UnavailableCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Credentials => "credentials",
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Errors returned by report repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReportRepositoryError {
    /// The store could not be reached.
    #[error("storage unavailable ({cause}): {message}")]
    StorageUnavailable {
        /// Classified cause.
        cause: UnavailableCause,
        /// Driver message.
        message: String,
    },

    /// The submission was not found.
    #[error("submission not found: {0}")]
    NotFound(SubmissionId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReportRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a connectivity failure, classifying the driver message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        let text = message.into();
        Self::StorageUnavailable {
            cause: UnavailableCause::classify(&text),
            message: text,
        }
    }

    /// Returns `true` for connectivity failures.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}
