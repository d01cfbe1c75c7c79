//! Report persistence against a live `PostgreSQL` server.

use super::helpers::{grant, mixed_submission, temporary_store};
use chrono::NaiveDate;
use taskboard::report::{
    domain::{AppSettings, BatchName, SubmissionEdit, SubmissionFilter, TaskCategory, TeamMember},
    ports::{CatalogRepository, SubmissionRepository},
};

fn day(year: i32, month: u32, date: u32) -> eyre::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, date).ok_or_else(|| eyre::eyre!("invalid date"))
}

#[tokio::test(flavor = "multi_thread")]
async fn submissions_persist_with_fractional_progress() -> eyre::Result<()> {
    let Some(temporary) = temporary_store().await? else {
        return Ok(());
    };
    let store = &temporary.store;
    let admin = grant()?;

    let older = store
        .insert_submission(&mixed_submission(day(2026, 9, 1)?, "Alice")?)
        .await?;
    let newer = store
        .insert_submission(&mixed_submission(day(2026, 10, 5)?, "Bob")?)
        .await?;

    let records = store.query_submissions(&SubmissionFilter::all()).await?;
    let ids: Vec<_> = records.iter().map(|record| record.id()).collect();
    assert_eq!(ids, [newer, older]);

    let bob = records
        .first()
        .ok_or_else(|| eyre::eyre!("missing newest record"))?;
    let automation = bob.blocks().get(TaskCategory::Automation);
    assert!((automation.completed - 37.5).abs() < f64::EPSILON);
    assert_eq!(automation.batches.iter().collect::<Vec<_>>(), ["B1"]);
    assert!(bob.blocks().get(TaskCategory::Other).batches.is_empty());
    assert!((bob.total_hours() - 8.0).abs() < f64::EPSILON);

    store
        .update_submission(&admin, older, &SubmissionEdit::new().with_note("  "))
        .await?;
    let alice = store
        .query_submissions(&SubmissionFilter::all().for_user("Alice"))
        .await?;
    assert_eq!(alice.first().and_then(|record| record.note()), None);

    let removed = store
        .delete_submissions_older_than(&admin, day(2026, 10, 5)?)
        .await?;
    assert_eq!(removed, 1);
    assert_eq!(store.delete_all_submissions(&admin).await?, 1);

    temporary.drop_database()
}

#[tokio::test(flavor = "multi_thread")]
async fn reference_tables_follow_the_store_contract() -> eyre::Result<()> {
    let Some(temporary) = temporary_store().await? else {
        return Ok(());
    };
    let store = &temporary.store;
    let admin = grant()?;

    assert_eq!(store.settings().await?, AppSettings::new(0, 0));
    store
        .update_settings(&admin, AppSettings::new(40, 25))
        .await?;
    assert_eq!(store.settings().await?, AppSettings::new(40, 25));

    let defaults = vec![BatchName::new("B2")?, BatchName::new("B1")?];
    assert_eq!(store.seed_batch_options(&defaults).await?, 2);
    assert_eq!(store.seed_batch_options(&defaults).await?, 0);
    store
        .add_batch_option(&admin, &BatchName::new("B1")?)
        .await?;
    assert_eq!(store.list_batch_options().await?, ["B1", "B2"]);
    store.remove_batch_option(&admin, "B2").await?;
    assert_eq!(store.list_batch_options().await?, ["B1"]);

    store
        .upsert_team_member(&admin, &TeamMember::new("Alice", "Capture")?)
        .await?;
    store
        .upsert_team_member(&admin, &TeamMember::new("Alice", "Review")?)
        .await?;
    let members = store.list_team_members().await?;
    assert_eq!(members.get("Alice").map(String::as_str), Some("Review"));
    assert_eq!(
        store
            .seed_team_members(&[TeamMember::new("Bob", "Capture")?])
            .await?,
        0
    );

    temporary.drop_database()
}
