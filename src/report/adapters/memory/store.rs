//! In-memory report store for service tests and dry runs.

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::report::{
    domain::{
        AdminGrant, AppSettings, BatchName, NewSubmission, SubmissionEdit, SubmissionFilter,
        SubmissionId, TaskSubmission, TeamMember,
    },
    ports::{
        CatalogRepository, ReportRepositoryError, ReportRepositoryResult, SubmissionRepository,
    },
};

/// Thread-safe in-memory implementation of both report repositories.
#[derive(Debug, Clone)]
pub struct InMemoryReportStore<C = DefaultClock>
where
    C: Clock,
{
    state: Arc<RwLock<InMemoryReportState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryReportState {
    last_id: i64,
    submissions: BTreeMap<SubmissionId, TaskSubmission>,
    settings: AppSettings,
    batch_options: BTreeSet<String>,
    team_members: BTreeMap<String, String>,
}

impl InMemoryReportStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryReportStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryReportStore<C>
where
    C: Clock,
{
    /// Creates an empty store stamping creation times from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryReportState::default())),
            clock,
        }
    }

    /// Pre-registers batch names, for fixtures that skip admin elevation.
    #[must_use]
    pub fn with_batch_options<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut state) = self.state.write() {
            state.batch_options.extend(names.into_iter().map(Into::into));
        }
        self
    }

    fn read(&self) -> ReportRepositoryResult<RwLockReadGuard<'_, InMemoryReportState>> {
        self.state.read().map_err(|err| {
            ReportRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ReportRepositoryResult<RwLockWriteGuard<'_, InMemoryReportState>> {
        self.state.write().map_err(|err| {
            ReportRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn newest_first(left: &TaskSubmission, right: &TaskSubmission) -> std::cmp::Ordering {
    right
        .created_at()
        .cmp(&left.created_at())
        .then_with(|| right.id().cmp(&left.id()))
}

#[async_trait]
impl<C> SubmissionRepository for InMemoryReportStore<C>
where
    C: Clock,
{
    async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> ReportRepositoryResult<SubmissionId> {
        let mut state = self.write()?;
        state.last_id += 1;
        let id = SubmissionId::new(state.last_id);
        let stored = TaskSubmission::from_new(id, submission, self.clock.utc());
        state.submissions.insert(id, stored);
        Ok(id)
    }

    async fn update_submission(
        &self,
        _grant: &AdminGrant,
        id: SubmissionId,
        edit: &SubmissionEdit,
    ) -> ReportRepositoryResult<()> {
        let mut state = self.write()?;
        let submission = state
            .submissions
            .get_mut(&id)
            .ok_or(ReportRepositoryError::NotFound(id))?;
        submission.apply_edit(edit);
        Ok(())
    }

    async fn query_submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> ReportRepositoryResult<Vec<TaskSubmission>> {
        let state = self.read()?;
        let mut matching: Vec<TaskSubmission> = state
            .submissions
            .values()
            .filter(|submission| filter.matches(submission))
            .cloned()
            .collect();
        matching.sort_by(newest_first);
        Ok(matching)
    }

    async fn delete_submissions_older_than(
        &self,
        _grant: &AdminGrant,
        cutoff: NaiveDate,
    ) -> ReportRepositoryResult<u64> {
        let mut state = self.write()?;
        let before = state.submissions.len();
        state
            .submissions
            .retain(|_, submission| submission.submission_date() >= cutoff);
        Ok(removed_count(before, state.submissions.len()))
    }

    async fn delete_all_submissions(&self, _grant: &AdminGrant) -> ReportRepositoryResult<u64> {
        let mut state = self.write()?;
        let before = state.submissions.len();
        state.submissions.clear();
        Ok(removed_count(before, 0))
    }
}

fn removed_count(before: usize, after: usize) -> u64 {
    u64::try_from(before.saturating_sub(after)).unwrap_or(u64::MAX)
}

#[async_trait]
impl<C> CatalogRepository for InMemoryReportStore<C>
where
    C: Clock,
{
    async fn settings(&self) -> ReportRepositoryResult<AppSettings> {
        Ok(self.read()?.settings)
    }

    async fn update_settings(
        &self,
        _grant: &AdminGrant,
        settings: AppSettings,
    ) -> ReportRepositoryResult<()> {
        self.write()?.settings = settings;
        Ok(())
    }

    async fn list_batch_options(&self) -> ReportRepositoryResult<Vec<String>> {
        Ok(self.read()?.batch_options.iter().cloned().collect())
    }

    async fn add_batch_option(
        &self,
        _grant: &AdminGrant,
        name: &BatchName,
    ) -> ReportRepositoryResult<()> {
        self.write()?.batch_options.insert(name.as_str().to_owned());
        Ok(())
    }

    async fn remove_batch_option(
        &self,
        _grant: &AdminGrant,
        name: &str,
    ) -> ReportRepositoryResult<()> {
        self.write()?.batch_options.remove(name);
        Ok(())
    }

    async fn seed_batch_options(&self, defaults: &[BatchName]) -> ReportRepositoryResult<usize> {
        let mut state = self.write()?;
        if !state.batch_options.is_empty() {
            return Ok(0);
        }
        state
            .batch_options
            .extend(defaults.iter().map(|name| name.as_str().to_owned()));
        Ok(state.batch_options.len())
    }

    async fn upsert_team_member(
        &self,
        _grant: &AdminGrant,
        member: &TeamMember,
    ) -> ReportRepositoryResult<()> {
        self.write()?.team_members.insert(
            member.name().to_owned(),
            member.team_function().to_owned(),
        );
        Ok(())
    }

    async fn list_team_members(&self) -> ReportRepositoryResult<BTreeMap<String, String>> {
        Ok(self.read()?.team_members.clone())
    }

    async fn seed_team_members(&self, members: &[TeamMember]) -> ReportRepositoryResult<usize> {
        let mut state = self.write()?;
        if !state.team_members.is_empty() {
            return Ok(0);
        }
        state.team_members.extend(
            members
                .iter()
                .map(|member| (member.name().to_owned(), member.team_function().to_owned())),
        );
        Ok(state.team_members.len())
    }
}
