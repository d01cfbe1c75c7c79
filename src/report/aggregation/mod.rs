//! Report-ready reductions over stored submissions.
//!
//! Every view is rebuilt from stored records on demand. Per-submission hours
//! always come from [`TaskSubmission::total_hours`], so a view never
//! disagrees with the value checked at entry time.
//!
//! [`TaskSubmission::total_hours`]: crate::report::domain::TaskSubmission::total_hours

mod batch;
mod daily;
mod forecast;
mod kpi;
mod period;
mod totals;
mod user;

pub use batch::{BatchRow, BatchTotal, batch_task_pivot, batch_totals, explode_by_batch};
pub use daily::{DailySummary, group_by_day};
pub use forecast::{
    DEFAULT_FORECAST_HORIZON, ForecastError, ForecastPoint, ForecastSummary,
    MINIMUM_FORECAST_DAYS, forecast_summary, linear_forecast,
};
pub use kpi::{
    DailyEfficiency, Kpis, Overview, PeriodAverage, WeekdayTotal, WeekendComparison,
    daily_efficiency, kpis, overview, weekday_totals, weekend_comparison,
};
pub use period::{
    DEFAULT_WEEKLY_GOAL, RecentSubmission, TodaySummary, WeeklyProgress, start_of_week,
    today_summary, weekly_progress,
};
pub use totals::{CategoryTotals, sum_by_category};
pub use user::{EFFICIENCY_EPSILON, UserSummary, efficiency_ratio, group_by_user};

/// Converts a record count for averaging.
fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}
