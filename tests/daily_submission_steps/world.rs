//! Shared world state for daily submission BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::report::{
    adapters::{memory::InMemoryReportStore, roster::StaticRoster},
    domain::{AdminGate, AdminGrant, SubmissionId},
    services::{SubmissionService, SubmissionServiceError},
};

/// Access code configured for scenario worlds.
pub const ADMIN_CODE: &str = "PM_ADMIN";

/// Service type used by the BDD world.
pub type TestSubmissionService = SubmissionService<InMemoryReportStore, DefaultClock>;

/// Scenario world for daily submission behaviour tests.
pub struct SubmissionWorld {
    pub store: Arc<InMemoryReportStore>,
    pub roster: Vec<String>,
    pub service: Option<TestSubmissionService>,
    pub gate: AdminGate,
    pub last_submit_result: Option<Result<SubmissionId, SubmissionServiceError>>,
    pub last_removed: Option<u64>,
}

impl SubmissionWorld {
    /// Creates a world with an empty store and no roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryReportStore::new()),
            roster: Vec::new(),
            service: None,
            gate: AdminGate::new(Some(ADMIN_CODE)),
            last_submit_result: None,
            last_removed: None,
        }
    }

    /// Returns the service, building it from the roster on first use.
    pub fn service(&mut self) -> &TestSubmissionService {
        let store = Arc::clone(&self.store);
        let roster = self.roster.clone();
        self.service.get_or_insert_with(|| {
            SubmissionService::new(
                store,
                Arc::new(StaticRoster::new(roster)),
                Arc::new(DefaultClock),
            )
        })
    }

    /// Unlocks admin operations.
    pub fn grant(&self) -> Result<AdminGrant, eyre::Report> {
        self.gate
            .unlock(ADMIN_CODE)
            .map_err(|err| eyre::eyre!("unlock admin gate: {err}"))
    }
}

impl Default for SubmissionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SubmissionWorld {
    SubmissionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
