//! Service layer for entering, reading and retiring submissions.

use super::{
    cache::{ReadCache, RecordFamily},
    catalog::{CatalogService, CatalogServiceError},
};
use crate::report::{
    aggregation::{TodaySummary, WeeklyProgress, start_of_week, today_summary, weekly_progress},
    domain::{
        AdminGrant, DateRange, RawSubmission, ReportDomainError, SubmissionEdit, SubmissionFilter,
        SubmissionId, TaskSubmission,
    },
    ports::{ReportRepositoryError, ReportStore, RosterError, RosterSource},
    validation::{SubmissionValidator, ValidationContext, ValidationErrors},
};
use chrono::{Days, NaiveDate};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for submission operations.
#[derive(Debug, Error)]
pub enum SubmissionServiceError {
    /// The report violated one or more entry rules.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ReportDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReportRepositoryError),
    /// The roster could not be read.
    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl From<CatalogServiceError> for SubmissionServiceError {
    fn from(err: CatalogServiceError) -> Self {
        match err {
            CatalogServiceError::Domain(inner) => Self::Domain(inner),
            CatalogServiceError::Repository(inner) => Self::Repository(inner),
            CatalogServiceError::Roster(inner) => Self::Roster(inner),
        }
    }
}

/// Result type for submission service operations.
pub type SubmissionServiceResult<T> = Result<T, SubmissionServiceError>;

/// Submission orchestration service.
///
/// Reads go through the shared [`ReadCache`]; every write clears the
/// submission family so the caller's next read sees its own change.
pub struct SubmissionService<R, C>
where
    R: ReportStore + ?Sized,
    C: Clock + Send + Sync,
{
    store: Arc<R>,
    catalog: CatalogService<R, C>,
    clock: Arc<C>,
    cache: Arc<ReadCache<C>>,
    validator: SubmissionValidator,
}

impl<R, C> Clone for SubmissionService<R, C>
where
    R: ReportStore + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            catalog: self.catalog.clone(),
            clock: Arc::clone(&self.clock),
            cache: Arc::clone(&self.cache),
            validator: self.validator,
        }
    }
}

impl<R, C> SubmissionService<R, C>
where
    R: ReportStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a submission service with its own read cache.
    #[must_use]
    pub fn new(store: Arc<R>, roster: Arc<dyn RosterSource>, clock: Arc<C>) -> Self {
        let cache = Arc::new(ReadCache::new(Arc::clone(&clock)));
        let catalog = CatalogService::new(
            Arc::clone(&store),
            roster,
            Arc::clone(&clock),
            Arc::clone(&cache),
        );
        Self {
            store,
            catalog,
            clock,
            cache,
            validator: SubmissionValidator::new(),
        }
    }

    /// Returns the catalog service sharing this service's cache.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogService<R, C> {
        &self.catalog
    }

    /// Returns today's date in local time.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    /// Validates and stores a daily report.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Validation`] listing every violated
    /// rule, or another variant when reference data or the store fails.
    pub async fn submit(&self, raw: &RawSubmission) -> SubmissionServiceResult<SubmissionId> {
        let users = self.catalog.users()?;
        let batches = self.catalog.batch_options().await?;
        let context = ValidationContext::new(users, batches);

        let submission = match self.validator.validate(raw, &context) {
            Ok(submission) => submission,
            Err(errors) => {
                tracing::info!(
                    user = raw.user_name(),
                    date = %raw.submission_date(),
                    violations = errors.len(),
                    "submission rejected"
                );
                return Err(errors.into());
            }
        };

        let id = self.store.insert_submission(&submission).await?;
        self.cache.invalidate(RecordFamily::Submissions);
        tracing::info!(
            %id,
            user = submission.user_name(),
            date = %submission.submission_date(),
            total_hours = submission.total_hours(),
            "submission accepted"
        );
        Ok(id)
    }

    /// Changes the date and/or note of a stored submission.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Repository`] when the submission
    /// does not exist or the store fails.
    pub async fn edit(
        &self,
        grant: &AdminGrant,
        id: SubmissionId,
        edit: &SubmissionEdit,
    ) -> SubmissionServiceResult<()> {
        self.store.update_submission(grant, id, edit).await?;
        self.cache.invalidate(RecordFamily::Submissions);
        tracing::info!(%id, "submission edited");
        Ok(())
    }

    /// Returns matching submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Repository`] when the store fails.
    pub async fn submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> SubmissionServiceResult<Vec<TaskSubmission>> {
        if let Some(cached) = self.cache.submissions().get(filter) {
            return Ok(cached);
        }
        let records = self.store.query_submissions(filter).await?;
        self.cache.submissions().insert(filter.clone(), records.clone());
        Ok(records)
    }

    /// Returns submissions dated within the last `days` days, today
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Domain`] when the window reaches
    /// before the calendar and [`SubmissionServiceError::Repository`] when
    /// the store fails.
    pub async fn recent(&self, days: u32) -> SubmissionServiceResult<Vec<TaskSubmission>> {
        let today = self.today();
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or(ReportDomainError::InvalidRetentionWindow(days))?;
        let range = DateRange::new(start, today)?;
        self.submissions(&SubmissionFilter::all().within(range)).await
    }

    /// Summarizes today's submissions.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Repository`] when the store fails.
    pub async fn today_summary(&self) -> SubmissionServiceResult<TodaySummary> {
        let today = self.today();
        let records = self.submissions(&SubmissionFilter::all().on(today)).await?;
        Ok(today_summary(&records, today))
    }

    /// Measures this week's submissions against `goal`.
    ///
    /// Every report dated on or after Monday counts, later days of the
    /// week included.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Repository`] when the store fails.
    pub async fn weekly_progress(&self, goal: u32) -> SubmissionServiceResult<WeeklyProgress> {
        let week_start = start_of_week(self.today());
        let records = self
            .submissions(&SubmissionFilter::all().since(week_start))
            .await?;
        Ok(weekly_progress(&records, week_start, goal))
    }

    /// Deletes submissions dated more than `days` days before today.
    ///
    /// Returns the number of removed submissions.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Domain`] when the window reaches
    /// before the calendar and [`SubmissionServiceError::Repository`] when
    /// the store fails.
    pub async fn delete_older_than(
        &self,
        grant: &AdminGrant,
        days: u32,
    ) -> SubmissionServiceResult<u64> {
        let cutoff = self
            .today()
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or(ReportDomainError::InvalidRetentionWindow(days))?;
        let removed = self
            .store
            .delete_submissions_older_than(grant, cutoff)
            .await?;
        self.cache.invalidate(RecordFamily::Submissions);
        tracing::info!(%cutoff, removed, "deleted old submissions");
        Ok(removed)
    }

    /// Deletes every submission.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Repository`] when the store fails.
    pub async fn reset_all(&self, grant: &AdminGrant) -> SubmissionServiceResult<u64> {
        let removed = self.store.delete_all_submissions(grant).await?;
        self.cache.invalidate(RecordFamily::Submissions);
        tracing::warn!(removed, "deleted all submissions");
        Ok(removed)
    }
}
