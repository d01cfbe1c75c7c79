//! `SQLite` schema for report persistence.
//!
//! Table and column names match existing dashboard databases so that a
//! legacy file opens unchanged; `submission_batches` is added alongside.

/// Idempotent schema installation script.
pub(super) const SQLITE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS task_submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    submission_date DATE NOT NULL,
    user_names TEXT NOT NULL,
    spatial_completed INTEGER DEFAULT 0,
    spatial_hours REAL DEFAULT 0.0,
    spatial_batches TEXT,
    textual_completed INTEGER DEFAULT 0,
    textual_hours REAL DEFAULT 0.0,
    textual_batches TEXT,
    qa_completed INTEGER DEFAULT 0,
    qa_hours REAL DEFAULT 0.0,
    qa_batches TEXT,
    qc_completed INTEGER DEFAULT 0,
    qc_hours REAL DEFAULT 0.0,
    qc_batches TEXT,
    automation_completed REAL DEFAULT 0.0,
    automation_hours REAL DEFAULT 0.0,
    automation_batches TEXT,
    other_completed INTEGER DEFAULT 0,
    other_hours REAL DEFAULT 0.0,
    other_batches TEXT,
    overtime_hours REAL DEFAULT 0.0,
    total_hours REAL DEFAULT 0.0,
    note TEXT,
    submitted_by TEXT,
    submit_time TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_task_submissions_date
    ON task_submissions (submission_date);

CREATE TABLE IF NOT EXISTS submission_batches (
    submission_id INTEGER NOT NULL REFERENCES task_submissions (id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    position INTEGER NOT NULL,
    batch TEXT NOT NULL,
    PRIMARY KEY (submission_id, category, position)
);

CREATE TABLE IF NOT EXISTS app_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    spatial_target INTEGER DEFAULT 0,
    textual_target INTEGER DEFAULT 0
);

CREATE TABLE IF NOT EXISTS batch_options (
    name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS team_members (
    name TEXT PRIMARY KEY,
    team_function TEXT
);

INSERT OR IGNORE INTO app_settings (id, spatial_target, textual_target) VALUES (1, 0, 0);
";

/// Column list shared by every submission read; indices are fixed.
pub(super) const SUBMISSION_COLUMNS: &str = "id, submission_date, user_names, \
    spatial_completed, spatial_hours, spatial_batches, \
    textual_completed, textual_hours, textual_batches, \
    qa_completed, qa_hours, qa_batches, \
    qc_completed, qc_hours, qc_batches, \
    automation_completed, automation_hours, automation_batches, \
    other_completed, other_hours, other_batches, \
    overtime_hours, total_hours, note, submitted_by, submit_time";

/// Optional filter criteria bound as `?1`..`?5`.
pub(super) const SUBMISSION_FILTER: &str = "(?1 IS NULL OR submission_date = ?1) \
    AND (?2 IS NULL OR submission_date >= ?2) \
    AND (?3 IS NULL OR submission_date <= ?3) \
    AND (?4 IS NULL OR user_names = ?4) \
    AND (?5 IS NULL OR submission_date >= ?5)";

pub(super) const INSERT_SUBMISSION: &str = "INSERT INTO task_submissions (
    submission_date, user_names,
    spatial_completed, spatial_hours, spatial_batches,
    textual_completed, textual_hours, textual_batches,
    qa_completed, qa_hours, qa_batches,
    qc_completed, qc_hours, qc_batches,
    automation_completed, automation_hours, automation_batches,
    other_completed, other_hours, other_batches,
    overtime_hours, total_hours, note, submitted_by, submit_time
) VALUES (
    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18,
    ?19, ?20, ?21, ?22, ?23, ?24, strftime('%Y-%m-%d %H:%M:%f', 'now')
)";
