//! Headline metrics and day-of-week breakdowns.

use super::{DailySummary, count_as_f64, efficiency_ratio};
use crate::report::domain::{TaskCategory, TaskSubmission};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Headline figures for a set of submissions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overview {
    /// Number of submissions.
    pub total_submissions: usize,
    /// Distinct reporting users.
    pub active_users: usize,
    /// Completed work across categories.
    pub total_tasks: f64,
    /// Hours including overtime.
    pub total_hours: f64,
}

/// Computes headline figures.
#[must_use]
pub fn overview(records: &[TaskSubmission]) -> Overview {
    Overview {
        total_submissions: records.len(),
        active_users: distinct_users(records),
        total_tasks: records.iter().map(TaskSubmission::total_tasks).sum(),
        total_hours: records.iter().map(TaskSubmission::total_hours).sum(),
    }
}

fn distinct_users(records: &[TaskSubmission]) -> usize {
    records
        .iter()
        .map(TaskSubmission::user_name)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Key performance indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    /// Tasks per hour overall.
    pub overall_efficiency: f64,
    /// Automation progress as a percentage of all completed work.
    pub automation_ratio: f64,
    /// Completed work per distinct report day.
    pub average_daily_tasks: f64,
    /// Distinct reporting users.
    pub active_users: usize,
    /// Completed work across categories.
    pub total_tasks: f64,
    /// Hours including overtime.
    pub total_hours: f64,
}

/// Computes key performance indicators.
#[must_use]
pub fn kpis(records: &[TaskSubmission]) -> Kpis {
    let total_tasks: f64 = records.iter().map(TaskSubmission::total_tasks).sum();
    let total_hours: f64 = records.iter().map(TaskSubmission::total_hours).sum();
    let automation: f64 = records
        .iter()
        .map(|record| record.blocks().get(TaskCategory::Automation).completed)
        .sum();
    let distinct_days = records
        .iter()
        .map(TaskSubmission::submission_date)
        .collect::<BTreeSet<NaiveDate>>()
        .len();

    Kpis {
        overall_efficiency: efficiency_ratio(total_tasks, total_hours),
        automation_ratio: automation / (total_tasks + 0.01) * 100.0,
        average_daily_tasks: total_tasks / count_as_f64(distinct_days.max(1)),
        active_users: distinct_users(records),
        total_tasks,
        total_hours,
    }
}

/// Efficiency of one report date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyEfficiency {
    /// Report date.
    pub date: NaiveDate,
    /// Completed work.
    pub total_tasks: f64,
    /// Hours including overtime.
    pub total_hours: f64,
    /// Tasks per hour.
    pub efficiency: f64,
}

/// Computes the efficiency trend from per-day summaries.
#[must_use]
pub fn daily_efficiency(daily: &[DailySummary]) -> Vec<DailyEfficiency> {
    daily
        .iter()
        .map(|day| DailyEfficiency {
            date: day.date,
            total_tasks: day.total_tasks,
            total_hours: day.total_hours,
            efficiency: efficiency_ratio(day.total_tasks, day.total_hours),
        })
        .collect()
}

/// Completed work reported on one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekdayTotal {
    /// Day of the week.
    pub weekday: Weekday,
    /// Completed work.
    pub total_tasks: f64,
}

/// Sums completed work per day of the week, Monday first, omitting days
/// with no submissions.
#[must_use]
pub fn weekday_totals(records: &[TaskSubmission]) -> Vec<WeekdayTotal> {
    let mut sums: BTreeMap<u32, (Weekday, f64)> = BTreeMap::new();
    for record in records {
        let weekday = record.submission_date().weekday();
        let entry = sums
            .entry(weekday.num_days_from_monday())
            .or_insert((weekday, 0.0));
        entry.1 += record.total_tasks();
    }
    sums.into_values()
        .map(|(weekday, total_tasks)| WeekdayTotal {
            weekday,
            total_tasks,
        })
        .collect()
}

/// Mean work per submission within one group of days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodAverage {
    /// Mean completed work per submission.
    pub mean_tasks: f64,
    /// Mean hours per submission.
    pub mean_hours: f64,
    /// Number of submissions.
    pub submission_count: usize,
}

/// Weekday versus weekend averages; a side with no submissions is absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekendComparison {
    /// Monday to Friday.
    pub weekday: Option<PeriodAverage>,
    /// Saturday and Sunday.
    pub weekend: Option<PeriodAverage>,
}

/// Compares mean work per submission on weekdays and weekends.
#[must_use]
pub fn weekend_comparison(records: &[TaskSubmission]) -> WeekendComparison {
    let (weekend, weekday): (Vec<&TaskSubmission>, Vec<&TaskSubmission>) = records
        .iter()
        .partition(|record| is_weekend(record.submission_date()));
    WeekendComparison {
        weekday: period_average(&weekday),
        weekend: period_average(&weekend),
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn period_average(records: &[&TaskSubmission]) -> Option<PeriodAverage> {
    if records.is_empty() {
        return None;
    }
    let count = count_as_f64(records.len());
    let tasks: f64 = records.iter().map(|record| record.total_tasks()).sum();
    let hours: f64 = records.iter().map(|record| record.total_hours()).sum();
    Some(PeriodAverage {
        mean_tasks: tasks / count,
        mean_hours: hours / count,
        submission_count: records.len(),
    })
}
