//! Service orchestration tests against the in-memory store.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::fixtures::{ManualClock, date, noon_utc, valid_raw};
use crate::report::{
    adapters::{memory::InMemoryReportStore, roster::StaticRoster},
    aggregation::group_by_day,
    domain::{
        AdminGate, AdminGrant, AppSettings, DEFAULT_BATCH_OPTIONS, RawSubmission, RawTaskBlock,
        ReportDomainError, SubmissionEdit, SubmissionFilter, SubmissionId, TaskCategory,
    },
    ports::{ReportRepositoryError, SubmissionRepository, roster::MockRosterSource},
    services::{SubmissionService, SubmissionServiceError},
    validation::{ValidationContext, ValidationError, build_submission},
};
use chrono::{Days, TimeDelta};
use rstest::{fixture, rstest};

type TestStore = InMemoryReportStore<ManualClock>;
type TestService = SubmissionService<TestStore, ManualClock>;

struct Harness {
    service: TestService,
    store: Arc<TestStore>,
    clock: Arc<ManualClock>,
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(ManualClock::at(noon_utc(2026, 10, 16)));
    let store = Arc::new(
        InMemoryReportStore::with_clock(Arc::clone(&clock)).with_batch_options(["B1", "B2"]),
    );
    let roster = Arc::new(StaticRoster::new(["Alice", "Bob"]));
    let service = SubmissionService::new(Arc::clone(&store), roster, Arc::clone(&clock));
    Harness {
        service,
        store,
        clock,
    }
}

fn grant() -> AdminGrant {
    AdminGate::new(Some("PM_ADMIN"))
        .unlock("PM_ADMIN")
        .expect("configured code unlocks")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submitted_reports_show_up_in_daily_views(harness: Harness) {
    let today = harness.service.today();
    harness
        .service
        .submit(&valid_raw(today, "Alice"))
        .await
        .expect("valid report is stored");
    harness
        .service
        .submit(&valid_raw(today, "Bob").with_overtime(1.0))
        .await
        .expect("valid report is stored");

    let records = harness
        .service
        .submissions(&SubmissionFilter::all())
        .await
        .expect("query succeeds");
    let days = group_by_day(&records);

    assert_eq!(days.len(), 1);
    let day = days.first().expect("one day");
    assert_eq!(day.date, today);
    assert_eq!(day.submission_count, 2);
    assert_eq!(day.total_hours, 17.0);
    assert_eq!(day.total_tasks, 10.0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_reports_are_not_stored(harness: Harness) {
    let today = harness.service.today();
    let result = harness.service.submit(&valid_raw(today, "Mallory")).await;

    match result {
        Err(SubmissionServiceError::Validation(errors)) => {
            assert!(errors.contains(&ValidationError::UnknownUser("Mallory".to_owned())));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    let stored = harness
        .store
        .query_submissions(&SubmissionFilter::all())
        .await
        .expect("query succeeds");
    assert!(stored.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_batches_are_usable_immediately(harness: Harness) {
    let today = harness.service.today();
    let raw = RawSubmission::new(today, "Alice").with_block(
        TaskCategory::Qa,
        RawTaskBlock::new(2.0, 8.0, ["NEW_BATCH"]),
    );
    assert!(matches!(
        harness.service.submit(&raw).await,
        Err(SubmissionServiceError::Validation(_))
    ));

    harness
        .service
        .catalog()
        .add_batch_option(&grant(), " NEW_BATCH ")
        .await
        .expect("batch registered");
    harness
        .service
        .submit(&raw)
        .await
        .expect("registered batch is accepted");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reads_are_cached_until_they_expire(harness: Harness) {
    let filter = SubmissionFilter::all();
    let first = harness
        .service
        .submissions(&filter)
        .await
        .expect("query succeeds");
    assert!(first.is_empty());

    let context = ValidationContext::new(["Alice"], ["B1"]);
    let direct = build_submission(&valid_raw(harness.service.today(), "Alice"), &context)
        .expect("valid report");
    harness
        .store
        .insert_submission(&direct)
        .await
        .expect("direct insert");

    let cached = harness
        .service
        .submissions(&filter)
        .await
        .expect("query succeeds");
    assert!(cached.is_empty(), "fresh cache entry should be served");

    harness.clock.advance(TimeDelta::seconds(61));
    let refreshed = harness
        .service
        .submissions(&filter)
        .await
        .expect("query succeeds");
    assert_eq!(refreshed.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn writes_clear_cached_reads(harness: Harness) {
    let filter = SubmissionFilter::all();
    harness
        .service
        .submissions(&filter)
        .await
        .expect("query succeeds");
    harness
        .service
        .submit(&valid_raw(harness.service.today(), "Alice"))
        .await
        .expect("stored");

    let after = harness
        .service
        .submissions(&filter)
        .await
        .expect("query succeeds");
    assert_eq!(after.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retention_removes_only_days_before_the_cutoff(harness: Harness) {
    let today = harness.service.today();
    for days_ago in [10, 6, 5, 4] {
        let day = today
            .checked_sub_days(Days::new(days_ago))
            .expect("date in range");
        harness
            .service
            .submit(&valid_raw(day, "Alice"))
            .await
            .expect("stored");
    }

    let removed = harness
        .service
        .delete_older_than(&grant(), 5)
        .await
        .expect("cleanup succeeds");
    assert_eq!(removed, 2);

    let cutoff = today.checked_sub_days(Days::new(5)).expect("date in range");
    let remaining = harness
        .service
        .submissions(&SubmissionFilter::all())
        .await
        .expect("query succeeds");
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|record| record.submission_date() >= cutoff));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retention_window_beyond_the_calendar_is_rejected(harness: Harness) {
    let result = harness.service.delete_older_than(&grant(), u32::MAX).await;
    assert!(matches!(
        result,
        Err(SubmissionServiceError::Domain(
            ReportDomainError::InvalidRetentionWindow(u32::MAX)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reset_removes_everything(harness: Harness) {
    let today = harness.service.today();
    harness
        .service
        .submit(&valid_raw(today, "Alice"))
        .await
        .expect("stored");
    harness
        .service
        .submit(&valid_raw(today, "Bob"))
        .await
        .expect("stored");

    let removed = harness.service.reset_all(&grant()).await.expect("reset");
    assert_eq!(removed, 2);
    let remaining = harness
        .service
        .submissions(&SubmissionFilter::all())
        .await
        .expect("query succeeds");
    assert!(remaining.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edits_move_date_and_replace_note(harness: Harness) {
    let today = harness.service.today();
    let id = harness
        .service
        .submit(&valid_raw(today, "Alice").with_note("first"))
        .await
        .expect("stored");
    let yesterday = today.checked_sub_days(Days::new(1)).expect("date in range");

    harness
        .service
        .edit(
            &grant(),
            id,
            &SubmissionEdit::new().with_date(yesterday).with_note("corrected"),
        )
        .await
        .expect("edit succeeds");

    let records = harness
        .service
        .submissions(&SubmissionFilter::all().on(yesterday))
        .await
        .expect("query succeeds");
    let record = records.first().expect("moved record");
    assert_eq!(record.id(), id);
    assert_eq!(record.note(), Some("corrected"));
    assert_eq!(record.total_hours(), 8.0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn editing_a_missing_submission_fails(harness: Harness) {
    let missing = SubmissionId::new(404);
    let result = harness
        .service
        .edit(&grant(), missing, &SubmissionEdit::new().with_note("x"))
        .await;
    assert!(matches!(
        result,
        Err(SubmissionServiceError::Repository(ReportRepositoryError::NotFound(id))) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_edit_of_a_missing_submission_fails(harness: Harness) {
    let missing = SubmissionId::new(999);
    let result = harness
        .service
        .edit(&grant(), missing, &SubmissionEdit::new())
        .await;
    assert!(matches!(
        result,
        Err(SubmissionServiceError::Repository(ReportRepositoryError::NotFound(id))) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_edit_of_a_stored_submission_changes_nothing(harness: Harness) {
    let today = harness.service.today();
    let id = harness
        .service
        .submit(&valid_raw(today, "Alice"))
        .await
        .expect("stored");
    let before = harness
        .service
        .submissions(&SubmissionFilter::all())
        .await
        .expect("listing");

    harness
        .service
        .edit(&grant(), id, &SubmissionEdit::new())
        .await
        .expect("empty edit of an existing record succeeds");

    let after = harness
        .service
        .submissions(&SubmissionFilter::all())
        .await
        .expect("listing");
    assert_eq!(before, after);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn today_and_week_views_use_the_clock(harness: Harness) {
    let today = harness.service.today();
    harness
        .service
        .submit(&valid_raw(today, "Alice"))
        .await
        .expect("stored");

    let summary = harness.service.today_summary().await.expect("today view");
    assert_eq!(summary.date, today);
    assert_eq!(summary.submission_count, 1);
    assert_eq!(summary.total_hours, 8.0);

    let week = harness
        .service
        .weekly_progress(2)
        .await
        .expect("weekly view");
    assert_eq!(week.submission_count, 1);
    assert!((week.progress - 0.5).abs() < f64::EPSILON);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn weekly_progress_counts_later_days_of_the_week() {
    let wednesday = Arc::new(ManualClock::at(noon_utc(2026, 10, 14)));
    let store = Arc::new(
        InMemoryReportStore::with_clock(Arc::clone(&wednesday)).with_batch_options(["B1", "B2"]),
    );
    let roster = Arc::new(StaticRoster::new(["Alice", "Bob"]));
    let service = TestService::new(store, roster, wednesday);

    for (day, user) in [
        (date(2026, 10, 11), "Alice"),
        (date(2026, 10, 12), "Alice"),
        (date(2026, 10, 16), "Bob"),
    ] {
        service
            .submit(&valid_raw(day, user))
            .await
            .expect("stored");
    }

    let week = service.weekly_progress(4).await.expect("weekly view");
    assert_eq!(week.week_start, date(2026, 10, 12));
    assert_eq!(week.submission_count, 2);
    assert!((week.progress - 0.5).abs() < f64::EPSILON);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_batches_seed_only_an_empty_registry() {
    let clock = Arc::new(ManualClock::at(noon_utc(2026, 10, 16)));
    let store = Arc::new(InMemoryReportStore::with_clock(Arc::clone(&clock)));
    let service = TestService::new(store, Arc::new(StaticRoster::new(["Alice"])), clock);

    let inserted = service
        .catalog()
        .ensure_default_batches()
        .await
        .expect("seeding succeeds");
    assert_eq!(inserted, DEFAULT_BATCH_OPTIONS.len());
    assert_eq!(
        service
            .catalog()
            .ensure_default_batches()
            .await
            .expect("seeding succeeds"),
        0
    );

    let options = service.catalog().batch_options().await.expect("list");
    let mut expected: Vec<String> = DEFAULT_BATCH_OPTIONS
        .iter()
        .map(|name| (*name).to_owned())
        .collect();
    expected.sort();
    assert_eq!(options, expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_functions_fall_back_to_the_roster() {
    let clock = Arc::new(ManualClock::at(noon_utc(2026, 10, 16)));
    let store = Arc::new(InMemoryReportStore::with_clock(Arc::clone(&clock)));
    let mut roster = MockRosterSource::new();
    roster.expect_list_user_team_pairs().times(1).returning(|| {
        Ok(BTreeMap::from([
            ("Alice".to_owned(), "Capture".to_owned()),
            ("Bob".to_owned(), "QA".to_owned()),
        ]))
    });
    let service = TestService::new(Arc::clone(&store), Arc::new(roster), clock);

    let members = service.catalog().team_members().await.expect("fallback");
    assert_eq!(members.get("Bob").map(String::as_str), Some("QA"));

    let cached = service.catalog().team_members().await.expect("cached read");
    assert_eq!(cached, members);

    let persisted = crate::report::ports::CatalogRepository::list_team_members(store.as_ref())
        .await
        .expect("list");
    assert_eq!(persisted, members);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn settings_updates_are_visible(harness: Harness) {
    let catalog = harness.service.catalog();
    assert_eq!(
        catalog.settings().await.expect("settings"),
        AppSettings::default()
    );

    catalog
        .update_settings(&grant(), AppSettings::new(40, 25))
        .await
        .expect("update");
    assert_eq!(
        catalog.settings().await.expect("settings"),
        AppSettings::new(40, 25)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configuration_snapshot_lists_users_and_batches(harness: Harness) {
    let snapshot = harness
        .service
        .catalog()
        .configuration_snapshot()
        .await
        .expect("snapshot");
    assert_eq!(snapshot.users, ["Alice", "Bob"]);
    assert_eq!(snapshot.batches, ["B1", "B2"]);
    assert_eq!(snapshot.export_date, noon_utc(2026, 10, 16));
}
