//! Roster adapters: a user file on disk and a fixed in-memory list.

use crate::report::ports::{RosterError, RosterSource};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Header names accepted for the user column, compared case-insensitively.
const NAME_HEADERS: [&str; 4] = ["name", "user name", "username", "user"];

/// Header names accepted for the team function column.
const TEAM_HEADERS: [&str; 2] = ["team function", "team_function"];

/// Roster read from a file.
///
/// A `.csv` file is read as a table with a name column and an optional team
/// function column; any other file is read as one user name per line. A
/// missing file is an empty roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRoster {
    path: PathBuf,
}

impl FileRoster {
    /// Creates a roster backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the roster file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"))
    }

    /// Adds a user; returns `false` when the user is already rostered.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] when the name is blank or the file cannot be
    /// read or written.
    pub fn add_user(&self, name: &str) -> Result<bool, RosterError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RosterError::EmptyUserName);
        }
        let mut entries = self.read_entries()?;
        if entries.iter().any(|entry| entry.name == trimmed) {
            return Ok(false);
        }
        entries.push(RosterEntry {
            name: trimmed.to_owned(),
            team_function: None,
        });
        self.write_entries(&entries)?;
        tracing::info!(user = trimmed, path = %self.path.display(), "added user to roster");
        Ok(true)
    }

    /// Removes a user; returns `false` when the user was not rostered.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] when the file cannot be read or written.
    pub fn remove_user(&self, name: &str) -> Result<bool, RosterError> {
        let trimmed = name.trim();
        let mut entries = self.read_entries()?;
        let before = entries.len();
        entries.retain(|entry| entry.name != trimmed);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_entries(&entries)?;
        tracing::info!(user = trimmed, path = %self.path.display(), "removed user from roster");
        Ok(true)
    }

    fn read_entries(&self) -> Result<Vec<RosterEntry>, RosterError> {
        if self.is_csv() {
            read_csv(&self.path)
        } else {
            read_lines(&self.path)
        }
    }

    fn write_entries(&self, entries: &[RosterEntry]) -> Result<(), RosterError> {
        if self.is_csv() {
            let mut writer = csv::Writer::from_path(&self.path)?;
            writer.write_record(["name", "team function"])?;
            for entry in entries {
                writer.write_record([
                    entry.name.as_str(),
                    entry.team_function.as_deref().unwrap_or_default(),
                ])?;
            }
            writer.flush()?;
        } else {
            let mut file = fs::File::create(&self.path)?;
            for entry in entries {
                writeln!(file, "{}", entry.name)?;
            }
        }
        Ok(())
    }
}

impl RosterSource for FileRoster {
    fn list_users(&self) -> Result<Vec<String>, RosterError> {
        Ok(self
            .read_entries()?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    fn list_user_team_pairs(&self) -> Result<BTreeMap<String, String>, RosterError> {
        Ok(self
            .read_entries()?
            .into_iter()
            .filter_map(|entry| entry.team_function.map(|team| (entry.name, team)))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RosterEntry {
    name: String,
    team_function: Option<String>,
}

fn read_lines(path: &Path) -> Result<Vec<RosterEntry>, RosterError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| RosterEntry {
            name: line.to_owned(),
            team_function: None,
        })
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<RosterEntry>, RosterError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let find_column = |candidates: &[&str]| {
        headers.iter().position(|header| {
            let normalized = header.trim().to_lowercase();
            candidates.iter().any(|candidate| *candidate == normalized)
        })
    };
    let name_column = find_column(NAME_HEADERS.as_slice()).ok_or(RosterError::MissingNameColumn)?;
    let team_column = find_column(TEAM_HEADERS.as_slice());

    let mut entries = Vec::new();
    for record in reader.records() {
        let row = record?;
        let Some(name) = row.get(name_column).filter(|value| !value.is_empty()) else {
            continue;
        };
        let team_function = team_column
            .and_then(|column| row.get(column))
            .map(str::to_owned);
        entries.push(RosterEntry {
            name: name.to_owned(),
            team_function,
        });
    }
    Ok(entries)
}

/// Fixed roster held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRoster {
    users: Vec<String>,
    teams: BTreeMap<String, String>,
}

impl StaticRoster {
    /// Creates a roster of the given users without team functions.
    #[must_use]
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            teams: BTreeMap::new(),
        }
    }

    /// Assigns a team function to a rostered user.
    #[must_use]
    pub fn with_team(mut self, user: impl Into<String>, team_function: impl Into<String>) -> Self {
        self.teams.insert(user.into(), team_function.into());
        self
    }
}

impl RosterSource for StaticRoster {
    fn list_users(&self) -> Result<Vec<String>, RosterError> {
        Ok(self.users.clone())
    }

    fn list_user_team_pairs(&self) -> Result<BTreeMap<String, String>, RosterError> {
        Ok(self.teams.clone())
    }
}
