//! Command-line front end for daily task reporting.
//!
//! Usage:
//!
//! ```text
//! taskboard submit --user Alice --block spatial:5:8:BATCH_A,BATCH_B
//! taskboard report daily --from 2026-10-01 --to 2026-10-14
//! taskboard export csv --admin-code <code>
//! ```
//!
//! Every command prints JSON on stdout; logs go to stderr and honour
//! `RUST_LOG`.

use chrono::{Days, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use eyre::{Result, WrapErr, bail};
use mockable::DefaultClock;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskboard::config::{AppConfig, ConfigOverrides};
use taskboard::report::{
    adapters::{open_store, roster::FileRoster},
    aggregation::{
        DEFAULT_FORECAST_HORIZON, batch_task_pivot, batch_totals,
        daily_efficiency, explode_by_batch, forecast_summary, group_by_day, group_by_user, kpis,
        linear_forecast, overview, weekday_totals, weekend_comparison,
    },
    domain::{
        AdminGate, AdminGrant, AppSettings, DateRange, RawSubmission, RawTaskBlock,
        SubmissionEdit, SubmissionFilter, SubmissionId, TaskCategory, TaskSubmission,
    },
    export::{ConfigurationSnapshot, ExportFormat, ExportRow, ExportTable, to_csv, to_json},
    ports::{ReportRepositoryError, ReportStore, RosterSource},
    services::{SubmissionService, SubmissionServiceError},
};
use tracing_subscriber::EnvFilter;

/// Days of history exported when no range is given.
const DEFAULT_EXPORT_DAYS: u64 = 30;
/// Retention window applied by `cleanup older-than` by default.
const DEFAULT_RETENTION_DAYS: u32 = 90;
/// Open-ended ranges start on 1 January of this year.
const EARLIEST_YEAR: i32 = 2000;

type Service = SubmissionService<dyn ReportStore, DefaultClock>;

#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    about = "Daily task reporting for delivery teams",
    after_help = "Unset flags fall back to DATABASE_URL, TASKBOARD_DB_PATH, \
                  TASKBOARD_ROSTER_PATH, TASKBOARD_CONNECT_TIMEOUT_SECS, \
                  TASKBOARD_WEEKLY_GOAL and ADMIN_ACCESS_CODE."
)]
struct Cli {
    /// `PostgreSQL` URL; the embedded store is used when unset.
    #[arg(long)]
    database_url: Option<String>,
    /// Embedded store file.
    #[arg(long)]
    db_path: Option<PathBuf>,
    /// Roster file, one user per line or a CSV with a name column.
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Seconds allowed to reach `PostgreSQL`.
    #[arg(long)]
    connect_timeout_secs: Option<u64>,
    /// Weekly submission goal.
    #[arg(long)]
    weekly_goal: Option<u32>,
    /// Configured admin access code.
    #[arg(long = "admin-access-code")]
    admin_access_code: Option<String>,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            database_url: self.database_url.clone(),
            db_path: self.db_path.clone(),
            admin_access_code: self.admin_access_code.clone(),
            connect_timeout_secs: self.connect_timeout_secs,
            roster_path: self.roster.clone(),
            weekly_goal: self.weekly_goal,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and store a daily report.
    Submit(SubmitArgs),
    /// List stored submissions, newest first.
    List(RangeArgs),
    /// Change the date or note of a stored submission.
    Edit {
        /// Submission identifier.
        id: i64,
        /// New report date.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// New note; an empty value clears it.
        #[arg(long)]
        note: Option<String>,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Report views rebuilt from stored submissions.
    Report {
        #[command(subcommand)]
        report: ReportCommand,
    },
    /// Export submissions or the configuration snapshot.
    Export(ExportArgs),
    /// Delete stored submissions.
    Cleanup {
        #[command(subcommand)]
        cleanup: CleanupCommand,
    },
    /// Manage the batch registry.
    Batches {
        #[command(subcommand)]
        batches: BatchCommand,
    },
    /// Manage team function mappings.
    Team {
        #[command(subcommand)]
        team: TeamCommand,
    },
    /// Manage the roster file.
    Users {
        #[command(subcommand)]
        users: UserCommand,
    },
    /// Show or change the daily targets.
    Settings {
        #[command(subcommand)]
        settings: SettingsCommand,
    },
}

#[derive(Args, Debug)]
struct AdminArgs {
    /// Admin access code.
    #[arg(long = "admin-code")]
    admin_code: String,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Reporting user.
    #[arg(long)]
    user: String,
    /// Report date; defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// `category:completed:hours[:batch,batch]`, repeatable.
    #[arg(long = "block", value_parser = parse_block)]
    blocks: Vec<(TaskCategory, RawTaskBlock)>,
    /// Overtime hours.
    #[arg(long, default_value_t = 0.0)]
    overtime: f64,
    /// Free-text note.
    #[arg(long)]
    note: Option<String>,
    /// Who entered the report; defaults to the user.
    #[arg(long)]
    submitted_by: Option<String>,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// Exact report date.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    date: Option<NaiveDate>,
    /// First report date, inclusive.
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last report date, inclusive.
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Reporting user.
    #[arg(long)]
    user: Option<String>,
}

impl RangeArgs {
    fn filter(&self, today: NaiveDate) -> Result<SubmissionFilter> {
        let mut filter = SubmissionFilter::all();
        if let Some(date) = self.date {
            filter = filter.on(date);
        }
        if self.from.is_some() || self.to.is_some() {
            let end = self.to.unwrap_or(today);
            let start = self.from.unwrap_or_else(|| {
                NaiveDate::from_ymd_opt(EARLIEST_YEAR, 1, 1)
                    .unwrap_or(end)
                    .min(end)
            });
            filter = filter.within(DateRange::new(start, end)?);
        }
        if let Some(user) = self.user.as_deref() {
            filter = filter.for_user(user.trim());
        }
        Ok(filter)
    }
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Per-day totals.
    Daily(RangeArgs),
    /// Per-user totals and efficiency.
    Users(RangeArgs),
    /// Per-batch totals and the batch by category pivot.
    Batches(RangeArgs),
    /// Headline indicators, weekday totals and weekend comparison.
    Kpi(RangeArgs),
    /// Linear trend of daily completed tasks.
    Forecast {
        #[command(flatten)]
        range: RangeArgs,
        /// Days to project past the last reported day.
        #[arg(long, default_value_t = DEFAULT_FORECAST_HORIZON)]
        horizon: u32,
    },
    /// Today's activity.
    Today,
    /// This week's submissions against the goal.
    Weekly,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportKind {
    Csv,
    Json,
    Table,
    Config,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// What to export.
    kind: ExportKind,
    #[command(flatten)]
    range: RangeArgs,
    /// Output file; `-` writes to stdout. Defaults to the conventional name.
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    admin: AdminArgs,
}

#[derive(Subcommand, Debug)]
enum CleanupCommand {
    /// Delete submissions dated more than `days` days ago.
    OlderThan {
        /// Retention window in days.
        #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
        days: u32,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Delete every submission.
    Reset {
        /// Required acknowledgement.
        #[arg(long)]
        confirm: bool,
        #[command(flatten)]
        admin: AdminArgs,
    },
}

#[derive(Subcommand, Debug)]
enum BatchCommand {
    /// List registered batches.
    List,
    /// Register a batch.
    Add {
        /// Batch name.
        name: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Remove a batch.
    Remove {
        /// Batch name.
        name: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    /// List team function mappings.
    List,
    /// Set one user's team function.
    Set {
        /// User name.
        user: String,
        /// Team function label.
        team_function: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// List rostered users.
    List,
    /// Add a user to the roster.
    Add {
        /// User name.
        name: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Remove a user from the roster.
    Remove {
        /// User name.
        name: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Show the daily targets.
    Show,
    /// Replace the daily targets.
    Set {
        /// Daily spatial task target.
        #[arg(long)]
        spatial_target: i64,
        /// Daily textual task target.
        #[arg(long)]
        textual_target: i64,
        #[command(flatten)]
        admin: AdminArgs,
    },
}

struct App {
    service: Service,
    roster: Arc<FileRoster>,
    gate: AdminGate,
    weekly_goal: u32,
}

impl App {
    fn unlock(&self, admin: &AdminArgs) -> Result<AdminGrant> {
        self.gate
            .unlock(&admin.admin_code)
            .wrap_err("admin access refused")
    }

    async fn records(&self, range: &RangeArgs) -> Result<Vec<TaskSubmission>> {
        let filter = range.filter(self.service.today())?;
        Ok(self.service.submissions(&filter).await?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskboard=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()
        .wrap_err("invalid configuration")?
        .with_overrides(cli.overrides());
    tracing::debug!(?config, "resolved configuration");

    let store = match open_store(&config.store_config()).await {
        Ok(store) => store,
        Err(err) => {
            if let ReportRepositoryError::StorageUnavailable { cause, .. } = &err {
                tracing::error!(%cause, hint = cause.hint(), "report store unavailable");
            }
            return Err(err).wrap_err("failed to open report store");
        }
    };
    let roster = Arc::new(FileRoster::new(config.roster_path.clone()));
    let roster_source: Arc<dyn RosterSource> = roster.clone();
    let service = Service::new(store, roster_source, Arc::new(DefaultClock));
    service.catalog().ensure_default_batches().await?;

    let app = App {
        service,
        roster,
        gate: config.admin_gate(),
        weekly_goal: config.weekly_goal,
    };
    run(&app, cli.command).await
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Submit(args) => submit(app, args).await,
        Command::List(range) => emit(&app.records(&range).await?),
        Command::Edit {
            id,
            date,
            note,
            admin,
        } => {
            let grant = app.unlock(&admin)?;
            let mut edit = SubmissionEdit::new();
            if let Some(new_date) = date {
                edit = edit.with_date(new_date);
            }
            if let Some(new_note) = note {
                edit = edit.with_note(new_note);
            }
            app.service.edit(&grant, SubmissionId::new(id), &edit).await?;
            emit(&json!({ "id": id, "updated": !edit.is_empty() }))
        }
        Command::Report { report } => run_report(app, report).await,
        Command::Export(args) => export(app, args).await,
        Command::Cleanup { cleanup } => run_cleanup(app, cleanup).await,
        Command::Batches { batches } => run_batches(app, batches).await,
        Command::Team { team } => run_team(app, team).await,
        Command::Users { users } => run_users(app, users),
        Command::Settings { settings } => run_settings(app, settings).await,
    }
}

async fn submit(app: &App, args: SubmitArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| app.service.today());
    let mut raw = RawSubmission::new(date, args.user).with_overtime(args.overtime);
    for (category, block) in args.blocks {
        raw = raw.with_block(category, block);
    }
    if let Some(note) = args.note {
        raw = raw.with_note(note);
    }
    if let Some(submitted_by) = args.submitted_by {
        raw = raw.with_submitted_by(submitted_by);
    }

    match app.service.submit(&raw).await {
        Ok(id) => emit(&json!({ "accepted": true, "id": id })),
        Err(SubmissionServiceError::Validation(errors)) => {
            emit(&json!({ "accepted": false, "errors": errors.messages() }))?;
            bail!("submission rejected with {} error(s)", errors.len())
        }
        Err(err) => Err(err.into()),
    }
}

async fn run_report(app: &App, report: ReportCommand) -> Result<()> {
    match report {
        ReportCommand::Daily(range) => emit(&group_by_day(&app.records(&range).await?)),
        ReportCommand::Users(range) => emit(&group_by_user(&app.records(&range).await?)),
        ReportCommand::Batches(range) => {
            let rows = explode_by_batch(&app.records(&range).await?);
            emit(&json!({
                "totals": batch_totals(&rows),
                "by_task_type": batch_task_pivot(&rows),
            }))
        }
        ReportCommand::Kpi(range) => {
            let records = app.records(&range).await?;
            let daily = group_by_day(&records);
            emit(&json!({
                "overview": overview(&records),
                "kpis": kpis(&records),
                "daily_efficiency": daily_efficiency(&daily),
                "weekday_totals": weekday_totals(&records),
                "weekend_comparison": weekend_comparison(&records),
            }))
        }
        ReportCommand::Forecast { range, horizon } => {
            let daily = group_by_day(&app.records(&range).await?);
            let points = linear_forecast(&daily, horizon)?;
            let summary = forecast_summary(&daily, &points);
            emit(&json!({ "forecast": points, "summary": summary }))
        }
        ReportCommand::Today => emit(&app.service.today_summary().await?),
        ReportCommand::Weekly => emit(&app.service.weekly_progress(app.weekly_goal).await?),
    }
}

async fn export(app: &App, args: ExportArgs) -> Result<()> {
    let _grant = app.unlock(&args.admin)?;
    let today = app.service.today();

    let (file_name, body) = if let ExportKind::Config = args.kind {
        let snapshot = app.service.catalog().configuration_snapshot().await?;
        (ConfigurationSnapshot::file_name(today), snapshot.to_json()?)
    } else {
        let mut range = args.range;
        if range.date.is_none() && range.from.is_none() && range.to.is_none() {
            range.from = today.checked_sub_days(Days::new(DEFAULT_EXPORT_DAYS));
        }
        let records = app.records(&range).await?;
        let rows: Vec<ExportRow> = records.iter().map(ExportRow::from).collect();
        match args.kind {
            ExportKind::Csv => (ExportFormat::Csv.file_name(today), to_csv(&rows)?),
            ExportKind::Json => (ExportFormat::Json.file_name(today), to_json(&rows)?),
            ExportKind::Table | ExportKind::Config => (
                ExportFormat::Table.file_name(today),
                ExportTable::from_submissions(&records).to_json()?,
            ),
        }
    };

    let target = args.output.unwrap_or_else(|| PathBuf::from(file_name));
    if target == Path::new("-") {
        let mut out = io::stdout().lock();
        out.write_all(body.as_bytes())?;
        writeln!(out)?;
        return Ok(());
    }
    std::fs::write(&target, body.as_bytes())
        .wrap_err_with(|| format!("failed to write {}", target.display()))?;
    tracing::info!(path = %target.display(), "export written");
    emit(&json!({ "written": target.display().to_string() }))
}

async fn run_cleanup(app: &App, cleanup: CleanupCommand) -> Result<()> {
    match cleanup {
        CleanupCommand::OlderThan { days, admin } => {
            let grant = app.unlock(&admin)?;
            let removed = app.service.delete_older_than(&grant, days).await?;
            emit(&json!({ "removed": removed, "days": days }))
        }
        CleanupCommand::Reset { confirm, admin } => {
            let grant = app.unlock(&admin)?;
            if !confirm {
                bail!("refusing to delete every submission without --confirm");
            }
            let removed = app.service.reset_all(&grant).await?;
            emit(&json!({ "removed": removed }))
        }
    }
}

async fn run_batches(app: &App, batches: BatchCommand) -> Result<()> {
    let catalog = app.service.catalog();
    match batches {
        BatchCommand::List => emit(&catalog.batch_options().await?),
        BatchCommand::Add { name, admin } => {
            let grant = app.unlock(&admin)?;
            let batch = catalog.add_batch_option(&grant, &name).await?;
            emit(&json!({ "added": batch.as_str() }))
        }
        BatchCommand::Remove { name, admin } => {
            let grant = app.unlock(&admin)?;
            catalog.remove_batch_option(&grant, &name).await?;
            emit(&json!({ "removed": name.trim() }))
        }
    }
}

async fn run_team(app: &App, team: TeamCommand) -> Result<()> {
    let catalog = app.service.catalog();
    match team {
        TeamCommand::List => emit(&catalog.team_members().await?),
        TeamCommand::Set {
            user,
            team_function,
            admin,
        } => {
            let grant = app.unlock(&admin)?;
            let member = catalog.set_team_member(&grant, &user, &team_function).await?;
            emit(&member)
        }
    }
}

fn run_users(app: &App, users: UserCommand) -> Result<()> {
    match users {
        UserCommand::List => emit(&app.roster.list_users()?),
        UserCommand::Add { name, admin } => {
            app.unlock(&admin)?;
            let added = app.roster.add_user(&name)?;
            emit(&json!({ "user": name.trim(), "added": added }))
        }
        UserCommand::Remove { name, admin } => {
            app.unlock(&admin)?;
            let removed = app.roster.remove_user(&name)?;
            emit(&json!({ "user": name.trim(), "removed": removed }))
        }
    }
}

async fn run_settings(app: &App, settings: SettingsCommand) -> Result<()> {
    let catalog = app.service.catalog();
    match settings {
        SettingsCommand::Show => emit(&catalog.settings().await?),
        SettingsCommand::Set {
            spatial_target,
            textual_target,
            admin,
        } => {
            let grant = app.unlock(&admin)?;
            let updated = AppSettings::new(spatial_target, textual_target);
            catalog.update_settings(&grant, updated).await?;
            emit(&updated)
        }
    }
}

fn emit<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn parse_block(value: &str) -> Result<(TaskCategory, RawTaskBlock), String> {
    let parts: Vec<&str> = value.splitn(4, ':').collect();
    let (category, completed, hours, batches) = match parts.as_slice() {
        [category, completed, hours] => (*category, *completed, *hours, ""),
        [category, completed, hours, batches] => (*category, *completed, *hours, *batches),
        _ => return Err(format!("expected category:completed:hours[:batches], got '{value}'")),
    };
    let parsed_category = TaskCategory::try_from(category).map_err(|err| err.to_string())?;
    let parsed_completed: f64 = completed
        .trim()
        .parse()
        .map_err(|_| format!("invalid completed value '{completed}'"))?;
    let parsed_hours: f64 = hours
        .trim()
        .parse()
        .map_err(|_| format!("invalid hours value '{hours}'"))?;
    let batch_names = batches.split(',').map(str::trim).filter(|name| !name.is_empty());
    Ok((
        parsed_category,
        RawTaskBlock::new(parsed_completed, parsed_hours, batch_names),
    ))
}
