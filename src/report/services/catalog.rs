//! Service layer for settings, the batch registry and team functions.

use super::cache::{ReadCache, RecordFamily};
use crate::report::{
    domain::{
        AdminGrant, AppSettings, BatchName, DEFAULT_BATCH_OPTIONS, ReportDomainError, TeamMember,
    },
    export::ConfigurationSnapshot,
    ports::{ReportRepositoryError, ReportStore, RosterError, RosterSource},
};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for reference data operations.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
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

/// Result type for catalog service operations.
pub type CatalogServiceResult<T> = Result<T, CatalogServiceError>;

/// Reference data orchestration service.
pub struct CatalogService<R, C>
where
    R: ReportStore + ?Sized,
    C: Clock + Send + Sync,
{
    store: Arc<R>,
    roster: Arc<dyn RosterSource>,
    clock: Arc<C>,
    cache: Arc<ReadCache<C>>,
}

impl<R, C> Clone for CatalogService<R, C>
where
    R: ReportStore + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            roster: Arc::clone(&self.roster),
            clock: Arc::clone(&self.clock),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R, C> CatalogService<R, C>
where
    R: ReportStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new catalog service sharing `cache` with other services.
    #[must_use]
    pub const fn new(
        store: Arc<R>,
        roster: Arc<dyn RosterSource>,
        clock: Arc<C>,
        cache: Arc<ReadCache<C>>,
    ) -> Self {
        Self {
            store,
            roster,
            clock,
            cache,
        }
    }

    /// Seeds the default batches when the registry is empty.
    ///
    /// Returns the number of batches inserted.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the store fails.
    pub async fn ensure_default_batches(&self) -> CatalogServiceResult<usize> {
        let defaults = DEFAULT_BATCH_OPTIONS
            .iter()
            .map(|name| BatchName::new(*name))
            .collect::<Result<Vec<_>, _>>()?;
        let inserted = self.store.seed_batch_options(&defaults).await?;
        if inserted > 0 {
            tracing::info!(inserted, "seeded default batch options");
            self.cache.invalidate(RecordFamily::BatchOptions);
        }
        Ok(inserted)
    }

    /// Returns the settings row.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the store fails.
    pub async fn settings(&self) -> CatalogServiceResult<AppSettings> {
        if let Some(cached) = self.cache.settings().get(&()) {
            return Ok(cached);
        }
        let settings = self.store.settings().await?;
        self.cache.settings().insert((), settings);
        Ok(settings)
    }

    /// Replaces the daily targets.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the store fails.
    pub async fn update_settings(
        &self,
        grant: &AdminGrant,
        settings: AppSettings,
    ) -> CatalogServiceResult<()> {
        self.store.update_settings(grant, settings).await?;
        self.cache.invalidate(RecordFamily::Settings);
        tracing::info!(
            spatial_target = settings.spatial_target,
            textual_target = settings.textual_target,
            "updated settings"
        );
        Ok(())
    }

    /// Returns registered batch names in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the store fails.
    pub async fn batch_options(&self) -> CatalogServiceResult<Vec<String>> {
        if let Some(cached) = self.cache.batch_options().get(&()) {
            return Ok(cached);
        }
        let options = self.store.list_batch_options().await?;
        self.cache.batch_options().insert((), options.clone());
        Ok(options)
    }

    /// Registers a batch; adding an existing batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Domain`] for a blank name and
    /// [`CatalogServiceError::Repository`] when the store fails.
    pub async fn add_batch_option(
        &self,
        grant: &AdminGrant,
        name: &str,
    ) -> CatalogServiceResult<BatchName> {
        let batch = BatchName::new(name)?;
        self.store.add_batch_option(grant, &batch).await?;
        self.cache.invalidate(RecordFamily::BatchOptions);
        tracing::info!(batch = batch.as_str(), "added batch option");
        Ok(batch)
    }

    /// Removes a batch from the registry; removing an unknown batch is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the store fails.
    pub async fn remove_batch_option(
        &self,
        grant: &AdminGrant,
        name: &str,
    ) -> CatalogServiceResult<()> {
        let batch = name.trim();
        self.store.remove_batch_option(grant, batch).await?;
        self.cache.invalidate(RecordFamily::BatchOptions);
        tracing::info!(batch, "removed batch option");
        Ok(())
    }

    /// Returns user to team function mappings.
    ///
    /// When the table is empty the roster's pairs are used instead and
    /// written to the table so later reads find them.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError`] when the store or the roster fails.
    pub async fn team_members(&self) -> CatalogServiceResult<BTreeMap<String, String>> {
        if let Some(cached) = self.cache.team_members().get(&()) {
            return Ok(cached);
        }
        let mut members = self.store.list_team_members().await?;
        if members.is_empty() {
            members = self.roster.list_user_team_pairs()?;
            let seeds = members
                .iter()
                .map(|(name, team_function)| {
                    TeamMember::new(name.as_str(), team_function.as_str())
                })
                .collect::<Result<Vec<_>, _>>()?;
            if !seeds.is_empty() {
                let inserted = self.store.seed_team_members(&seeds).await?;
                tracing::info!(inserted, "seeded team functions from roster");
            }
        }
        self.cache.team_members().insert((), members.clone());
        Ok(members)
    }

    /// Creates or replaces one team function mapping.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError`] when the name is blank or the store
    /// fails.
    pub async fn set_team_member(
        &self,
        grant: &AdminGrant,
        name: &str,
        team_function: &str,
    ) -> CatalogServiceResult<TeamMember> {
        let member = TeamMember::new(name, team_function)?;
        self.store.upsert_team_member(grant, &member).await?;
        self.cache.invalidate(RecordFamily::TeamMembers);
        tracing::info!(
            user = member.name(),
            team_function = member.team_function(),
            "updated team function"
        );
        Ok(member)
    }

    /// Returns the rostered user names.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Roster`] when the roster cannot be read.
    pub fn users(&self) -> CatalogServiceResult<Vec<String>> {
        Ok(self.roster.list_users()?)
    }

    /// Captures the roster and the batch registry for export.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError`] when the store or the roster fails.
    pub async fn configuration_snapshot(&self) -> CatalogServiceResult<ConfigurationSnapshot> {
        let users = self.users()?;
        let batches = self.batch_options().await?;
        Ok(ConfigurationSnapshot::new(users, batches, self.clock.utc()))
    }
}
