//! Reference data persistence against a `SQLite` file.

use super::helpers::{grant, open_fixture};
use taskboard::report::{
    domain::{AppSettings, BatchName, TeamMember},
    ports::CatalogRepository,
};

#[tokio::test]
async fn settings_row_starts_at_zero_and_updates() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    assert_eq!(fixture.store.settings().await?, AppSettings::new(0, 0));

    fixture
        .store
        .update_settings(&grant()?, AppSettings::new(30, 12))
        .await?;
    assert_eq!(fixture.store.settings().await?, AppSettings::new(30, 12));
    Ok(())
}

#[tokio::test]
async fn batch_registry_is_sorted_and_idempotent() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    let admin = grant()?;
    for name in ["ZETA_2", "ALPHA_1", "ZETA_2"] {
        fixture
            .store
            .add_batch_option(&admin, &BatchName::new(name)?)
            .await?;
    }
    assert_eq!(
        fixture.store.list_batch_options().await?,
        ["ALPHA_1", "ZETA_2"]
    );

    fixture.store.remove_batch_option(&admin, "ALPHA_1").await?;
    fixture.store.remove_batch_option(&admin, "UNKNOWN").await?;
    assert_eq!(fixture.store.list_batch_options().await?, ["ZETA_2"]);
    Ok(())
}

#[tokio::test]
async fn seeding_only_fills_empty_tables() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    let defaults = vec![BatchName::new("B1")?, BatchName::new("B2")?];
    assert_eq!(fixture.store.seed_batch_options(&defaults).await?, 2);
    assert_eq!(fixture.store.seed_batch_options(&defaults).await?, 0);

    let members = vec![TeamMember::new("Alice", "Capture")?];
    assert_eq!(fixture.store.seed_team_members(&members).await?, 1);
    assert_eq!(fixture.store.seed_team_members(&members).await?, 0);
    Ok(())
}

#[tokio::test]
async fn team_members_upsert_by_name() -> eyre::Result<()> {
    let fixture = open_fixture().await?;
    let admin = grant()?;
    fixture
        .store
        .upsert_team_member(&admin, &TeamMember::new("Alice", "Capture")?)
        .await?;
    fixture
        .store
        .upsert_team_member(&admin, &TeamMember::new("Alice", "Review")?)
        .await?;

    let members = fixture.store.list_team_members().await?;
    assert_eq!(members.len(), 1);
    assert_eq!(members.get("Alice").map(String::as_str), Some("Review"));
    Ok(())
}
