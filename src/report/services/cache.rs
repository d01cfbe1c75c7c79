//! Time-bounded read cache for store reads.
//!
//! Entries expire after a per-family time to live and a family is cleared
//! after every write to it, so a reader never sees data older than its own
//! last write.

use crate::report::domain::{AppSettings, SubmissionFilter, TaskSubmission};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

/// Kind of record a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordFamily {
    /// Submission query results.
    Submissions,
    /// The batch registry.
    BatchOptions,
    /// The singleton settings row.
    Settings,
    /// Team function mappings.
    TeamMembers,
}

impl RecordFamily {
    /// Returns how long entries of this family stay fresh.
    #[must_use]
    pub fn default_ttl(self) -> TimeDelta {
        match self {
            Self::Submissions => TimeDelta::seconds(60),
            Self::BatchOptions | Self::Settings | Self::TeamMembers => TimeDelta::seconds(120),
        }
    }
}

/// Single-family cache with expiring entries.
#[derive(Debug)]
pub struct TtlCache<K, V, C>
where
    C: Clock,
{
    ttl: TimeDelta,
    clock: Arc<C>,
    entries: Mutex<HashMap<K, (DateTime<Utc>, V)>>,
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    /// Creates an empty cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: TimeDelta, clock: Arc<C>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a fresh value, dropping it when expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.utc();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((stored_at, value)) = entries.get(key) {
            if now - *stored_at < self.ttl {
                return Some(value.clone());
            }
            entries.remove(key);
        }
        None
    }

    /// Stores a value stamped with the current time.
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.utc();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, (now, value));
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Read cache for every record family.
#[derive(Debug)]
pub struct ReadCache<C>
where
    C: Clock,
{
    submissions: TtlCache<SubmissionFilter, Vec<TaskSubmission>, C>,
    batch_options: TtlCache<(), Vec<String>, C>,
    settings: TtlCache<(), AppSettings, C>,
    team_members: TtlCache<(), BTreeMap<String, String>, C>,
}

impl<C> ReadCache<C>
where
    C: Clock,
{
    /// Creates a cache with the default time to live of each family.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            submissions: TtlCache::new(
                RecordFamily::Submissions.default_ttl(),
                Arc::clone(&clock),
            ),
            batch_options: TtlCache::new(
                RecordFamily::BatchOptions.default_ttl(),
                Arc::clone(&clock),
            ),
            settings: TtlCache::new(RecordFamily::Settings.default_ttl(), Arc::clone(&clock)),
            team_members: TtlCache::new(RecordFamily::TeamMembers.default_ttl(), clock),
        }
    }

    /// Returns the submission cache.
    #[must_use]
    pub const fn submissions(&self) -> &TtlCache<SubmissionFilter, Vec<TaskSubmission>, C> {
        &self.submissions
    }

    /// Returns the batch registry cache.
    #[must_use]
    pub const fn batch_options(&self) -> &TtlCache<(), Vec<String>, C> {
        &self.batch_options
    }

    /// Returns the settings cache.
    #[must_use]
    pub const fn settings(&self) -> &TtlCache<(), AppSettings, C> {
        &self.settings
    }

    /// Returns the team function cache.
    #[must_use]
    pub const fn team_members(&self) -> &TtlCache<(), BTreeMap<String, String>, C> {
        &self.team_members
    }

    /// Clears one family after a write to it.
    pub fn invalidate(&self, family: RecordFamily) {
        tracing::debug!(?family, "invalidating read cache");
        match family {
            RecordFamily::Submissions => self.submissions.clear(),
            RecordFamily::BatchOptions => self.batch_options.clear(),
            RecordFamily::Settings => self.settings.clear(),
            RecordFamily::TeamMembers => self.team_members.clear(),
        }
    }
}
