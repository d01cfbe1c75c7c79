//! Port for the external list of valid user names.

use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Source of rostered users and their team functions.
#[cfg_attr(test, mockall::automock)]
pub trait RosterSource: Send + Sync {
    /// Returns the rostered user names in roster order.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] when the roster cannot be read.
    fn list_users(&self) -> Result<Vec<String>, RosterError>;

    /// Returns user to team function pairs where the roster carries them.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] when the roster cannot be read.
    fn list_user_team_pairs(&self) -> Result<BTreeMap<String, String>, RosterError>;
}

/// Errors raised while reading or writing a roster.
#[derive(Debug, Clone, Error)]
pub enum RosterError {
    /// The roster file could not be read or written.
    #[error("roster I/O error: {0}")]
    Io(Arc<std::io::Error>),

    /// The roster CSV could not be parsed.
    #[error("roster CSV error: {0}")]
    Csv(Arc<csv::Error>),

    /// The roster CSV has no name column.
    #[error("roster CSV has no name column")]
    MissingNameColumn,

    /// A user name was blank.
    #[error("user name must not be empty")]
    EmptyUserName,
}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(Arc::new(err))
    }
}
