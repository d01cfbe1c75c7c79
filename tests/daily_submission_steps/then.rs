//! Then steps for daily submission BDD scenarios.

use super::world::{SubmissionWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskboard::report::{aggregation::group_by_day, domain::SubmissionFilter};

#[then("the submission is accepted")]
fn submission_accepted(world: &SubmissionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_submit_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submit result in scenario world"))?;
    result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected rejection: {err}"))?;
    Ok(())
}

#[then(r#"the submission is rejected with "{message}""#)]
fn submission_rejected(world: &SubmissionWorld, message: String) -> Result<(), eyre::Report> {
    let result = world
        .last_submit_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submit result in scenario world"))?;
    match result {
        Ok(id) => Err(eyre::eyre!("expected rejection, stored {id:?}")),
        Err(err) if err.to_string().contains(&message) => Ok(()),
        Err(err) => Err(eyre::eyre!("expected '{message}' in '{err}'")),
    }
}

#[then("the daily view for today shows {tasks:f64} tasks and {hours:f64} hours")]
fn daily_view_shows(
    world: &mut SubmissionWorld,
    tasks: f64,
    hours: f64,
) -> Result<(), eyre::Report> {
    let service = world.service();
    let today = service.today();
    let records = run_async(service.submissions(&SubmissionFilter::all().on(today)))
        .wrap_err("load today's reports")?;
    let days = group_by_day(&records);
    let [summary] = days.as_slice() else {
        return Err(eyre::eyre!("expected one day, found {}", days.len()));
    };
    if (summary.total_tasks - tasks).abs() > f64::EPSILON
        || (summary.total_hours - hours).abs() > f64::EPSILON
    {
        return Err(eyre::eyre!(
            "expected {tasks} tasks and {hours} hours, found {} and {}",
            summary.total_tasks,
            summary.total_hours
        ));
    }
    Ok(())
}

#[then("no reports are stored")]
fn no_reports_stored(world: &mut SubmissionWorld) -> Result<(), eyre::Report> {
    let service = world.service();
    let records =
        run_async(service.submissions(&SubmissionFilter::all())).wrap_err("load reports")?;
    if !records.is_empty() {
        return Err(eyre::eyre!("expected no reports, found {}", records.len()));
    }
    Ok(())
}

#[then("{count:u64} report is removed")]
fn reports_removed(world: &SubmissionWorld, count: u64) -> Result<(), eyre::Report> {
    match world.last_removed {
        Some(removed) if removed == count => Ok(()),
        other => Err(eyre::eyre!("expected {count} removed, found {other:?}")),
    }
}

#[then("{count:u64} report remains")]
fn reports_remain(world: &mut SubmissionWorld, count: u64) -> Result<(), eyre::Report> {
    let service = world.service();
    let records =
        run_async(service.submissions(&SubmissionFilter::all())).wrap_err("load reports")?;
    if u64::try_from(records.len())? != count {
        return Err(eyre::eyre!(
            "expected {count} reports, found {}",
            records.len()
        ));
    }
    Ok(())
}
