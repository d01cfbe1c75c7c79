//! Reference data surrounding submissions: targets and team functions.

use super::ReportDomainError;
use serde::{Deserialize, Serialize};

/// Batches seeded into an empty batch registry.
pub const DEFAULT_BATCH_OPTIONS: [&str; 5] = [
    "CRAWLEYBOROUGHCOUNCIL_94",
    "CRAWLEYBOROUGHCOUNCIL_95",
    "GATESHEADBOROUGHCOUNCIL_96",
    "GATESHEADBOROUGHCOUNCIL_97",
    "EXETERCITYCOUNCIL_98",
];

/// Singleton application settings row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Daily spatial task target.
    pub spatial_target: i64,
    /// Daily textual task target.
    pub textual_target: i64,
}

impl AppSettings {
    /// Identifier of the only settings row.
    pub const SINGLETON_ID: i32 = 1;

    /// Creates settings with the given targets.
    #[must_use]
    pub const fn new(spatial_target: i64, textual_target: i64) -> Self {
        Self {
            spatial_target,
            textual_target,
        }
    }
}

/// Mapping of a user to a team function label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    name: String,
    team_function: String,
}

impl TeamMember {
    /// Creates a team member mapping.
    ///
    /// Both values are trimmed; an empty team function is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportDomainError::EmptyMemberName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        team_function: impl Into<String>,
    ) -> Result<Self, ReportDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(ReportDomainError::EmptyMemberName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            team_function: team_function.into().trim().to_owned(),
        })
    }

    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the team function label.
    #[must_use]
    pub fn team_function(&self) -> &str {
        &self.team_function
    }
}
