//! Process configuration.
//!
//! Values come from environment variables through [`AppConfig::from_env`];
//! command-line flags given as [`ConfigOverrides`] then replace individual
//! values.

use crate::report::{
    adapters::{StoreConfig, sqlite::DEFAULT_BUSY_TIMEOUT},
    aggregation::DEFAULT_WEEKLY_GOAL,
    domain::AdminGate,
};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// `PostgreSQL` connection URL; selects the networked store when set.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Embedded store file path.
pub const DB_PATH_ENV: &str = "TASKBOARD_DB_PATH";
/// Access code required for admin operations.
pub const ADMIN_ACCESS_CODE_ENV: &str = "ADMIN_ACCESS_CODE";
/// Seconds allowed to obtain a `PostgreSQL` connection.
pub const CONNECT_TIMEOUT_ENV: &str = "TASKBOARD_CONNECT_TIMEOUT_SECS";
/// Roster file path.
pub const ROSTER_PATH_ENV: &str = "TASKBOARD_ROSTER_PATH";
/// Submissions per week the team aims for.
pub const WEEKLY_GOAL_ENV: &str = "TASKBOARD_WEEKLY_GOAL";

/// Embedded store file used when no path is configured.
pub const DEFAULT_DB_PATH: &str = "team_dashboard.db";
/// Roster file used when no path is configured.
pub const DEFAULT_ROSTER_PATH: &str = "PM_users.txt";
/// Default `PostgreSQL` connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable held something else.
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Resolved process configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `PostgreSQL` URL; `None` selects the embedded store.
    pub database_url: Option<String>,
    /// Embedded store file path.
    pub db_path: PathBuf,
    /// Admin access code; `None` disables admin operations.
    pub admin_access_code: Option<String>,
    /// Time allowed to obtain a `PostgreSQL` connection.
    pub connect_timeout: Duration,
    /// Roster file path.
    pub roster_path: PathBuf,
    /// Weekly submission goal.
    pub weekly_goal: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            admin_access_code: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            roster_path: PathBuf::from(DEFAULT_ROSTER_PATH),
            weekly_goal: DEFAULT_WEEKLY_GOAL,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("db_path", &self.db_path)
            .field("admin_access_code", &self.admin_access_code.is_some())
            .field("connect_timeout", &self.connect_timeout)
            .field("roster_path", &self.roster_path)
            .field("weekly_goal", &self.weekly_goal)
            .finish()
    }
}

/// Explicitly supplied values that replace the environment's.
///
/// `None` and blank strings keep the underlying value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `PostgreSQL` URL.
    pub database_url: Option<String>,
    /// Embedded store file path.
    pub db_path: Option<PathBuf>,
    /// Admin access code.
    pub admin_access_code: Option<String>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Roster file path.
    pub roster_path: Option<PathBuf>,
    /// Weekly submission goal.
    pub weekly_goal: Option<u32>,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] when a numeric variable cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] when a numeric variable cannot
    /// be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_owned())
                .filter(|trimmed| !trimmed.is_empty())
        };
        let defaults = Self::default();

        let connect_timeout = parse_number(CONNECT_TIMEOUT_ENV, value(CONNECT_TIMEOUT_ENV))?
            .map_or(defaults.connect_timeout, Duration::from_secs);
        let weekly_goal = parse_number(WEEKLY_GOAL_ENV, value(WEEKLY_GOAL_ENV))?
            .map_or(Ok(defaults.weekly_goal), |goal| {
                u32::try_from(goal).map_err(|_| ConfigError::InvalidNumber {
                    name: WEEKLY_GOAL_ENV,
                    value: goal.to_string(),
                })
            })?;

        Ok(Self {
            database_url: value(DATABASE_URL_ENV),
            db_path: value(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            admin_access_code: value(ADMIN_ACCESS_CODE_ENV),
            connect_timeout,
            roster_path: value(ROSTER_PATH_ENV).map_or(defaults.roster_path, PathBuf::from),
            weekly_goal,
        })
    }

    /// Replaces every value `overrides` supplies.
    #[must_use]
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        let non_blank = |value: Option<String>| {
            value
                .map(|raw| raw.trim().to_owned())
                .filter(|trimmed| !trimmed.is_empty())
        };
        Self {
            database_url: non_blank(overrides.database_url).or(self.database_url),
            db_path: overrides.db_path.unwrap_or(self.db_path),
            admin_access_code: non_blank(overrides.admin_access_code).or(self.admin_access_code),
            connect_timeout: overrides
                .connect_timeout_secs
                .map_or(self.connect_timeout, Duration::from_secs),
            roster_path: overrides.roster_path.unwrap_or(self.roster_path),
            weekly_goal: overrides.weekly_goal.unwrap_or(self.weekly_goal),
        }
    }

    /// Selects the store: `PostgreSQL` when a URL is set, else the embedded
    /// file.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        match self.database_url.as_deref() {
            Some(url) => StoreConfig::Postgres {
                url: url.to_owned(),
                connect_timeout: self.connect_timeout,
            },
            None => StoreConfig::Sqlite {
                path: self.db_path.clone(),
                busy_timeout: DEFAULT_BUSY_TIMEOUT,
            },
        }
    }

    /// Builds the admin gate for the configured access code.
    #[must_use]
    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(self.admin_access_code.as_deref())
    }
}

fn parse_number(name: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|text| {
        text.parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: text })
    })
    .transpose()
}
