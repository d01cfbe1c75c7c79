//! When steps for daily submission BDD scenarios.

use super::world::{SubmissionWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskboard::report::domain::{RawSubmission, RawTaskBlock, TaskCategory};

#[when(r#""{user}" reports {tasks:f64} spatial tasks over {hours:f64} hours on batch "{batch}" today"#)]
fn reports_spatial_work(
    world: &mut SubmissionWorld,
    user: String,
    tasks: f64,
    hours: f64,
    batch: String,
) {
    let service = world.service();
    let raw = RawSubmission::new(service.today(), user)
        .with_block(TaskCategory::Spatial, RawTaskBlock::new(tasks, hours, [batch]));
    let result = run_async(service.submit(&raw));
    world.last_submit_result = Some(result);
}

#[when(r#""{user}" submits a report with no task category"#)]
fn submits_empty_report(world: &mut SubmissionWorld, user: String) {
    let service = world.service();
    let raw = RawSubmission::new(service.today(), user).with_overtime(8.0);
    let result = run_async(service.submit(&raw));
    world.last_submit_result = Some(result);
}

#[when("an admin removes reports older than {days:u32} days")]
fn admin_removes_old_reports(world: &mut SubmissionWorld, days: u32) -> Result<(), eyre::Report> {
    let grant = world.grant()?;
    let service = world.service();
    let removed =
        run_async(service.delete_older_than(&grant, days)).wrap_err("delete old reports")?;
    world.last_removed = Some(removed);
    Ok(())
}
