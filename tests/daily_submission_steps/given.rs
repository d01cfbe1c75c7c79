//! Given steps for daily submission BDD scenarios.

use super::world::{SubmissionWorld, run_async};
use chrono::Days;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::report::domain::{RawSubmission, RawTaskBlock, TaskCategory};

#[given(r#"the team roster lists "{first}" and "{second}""#)]
fn roster_lists(world: &mut SubmissionWorld, first: String, second: String) {
    world.roster = vec![first, second];
}

#[given(r#"the batch "{name}" is registered"#)]
fn batch_registered(world: &mut SubmissionWorld, name: String) -> Result<(), eyre::Report> {
    let grant = world.grant()?;
    let service = world.service();
    run_async(service.catalog().add_batch_option(&grant, &name))
        .wrap_err("register batch")?;
    Ok(())
}

#[given(r#""{user}" reported {days:u64} days ago"#)]
fn reported_days_ago(
    world: &mut SubmissionWorld,
    user: String,
    days: u64,
) -> Result<(), eyre::Report> {
    let service = world.service();
    let date = service
        .today()
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| eyre::eyre!("{days} days ago is out of range"))?;
    let raw = RawSubmission::new(date, user)
        .with_block(TaskCategory::Textual, RawTaskBlock::new(4.0, 8.0, ["B1"]));
    run_async(service.submit(&raw)).wrap_err("store earlier report")?;
    Ok(())
}
