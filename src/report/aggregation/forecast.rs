//! Linear trend forecast of daily completed work.

use super::{DailySummary, count_as_f64};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Distinct report days required before a forecast is produced.
pub const MINIMUM_FORECAST_DAYS: usize = 7;

/// Days forecast when no horizon is given.
pub const DEFAULT_FORECAST_HORIZON: u32 = 7;

/// Errors raised by the forecaster.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ForecastError {
    /// Too few distinct days to fit a trend.
    #[error("need at least {required} days of data for forecasting, found {actual}")]
    InsufficientData {
        /// Required distinct days.
        required: usize,
        /// Distinct days supplied.
        actual: usize,
    },
}

/// Predicted total tasks for one future day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Forecast date.
    pub date: NaiveDate,
    /// Predicted completed work.
    pub predicted_tasks: f64,
}

/// Fits total tasks per day against day number by ordinary least squares and
/// predicts the `horizon_days` days after the last supplied date.
///
/// # Errors
///
/// Returns [`ForecastError::InsufficientData`] when fewer than
/// [`MINIMUM_FORECAST_DAYS`] distinct dates are supplied.
pub fn linear_forecast(
    daily: &[DailySummary],
    horizon_days: u32,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    let distinct: BTreeSet<NaiveDate> = daily.iter().map(|day| day.date).collect();
    let Some(last_date) = distinct.last().copied().filter(|_| distinct.len() >= MINIMUM_FORECAST_DAYS)
    else {
        return Err(ForecastError::InsufficientData {
            required: MINIMUM_FORECAST_DAYS,
            actual: distinct.len(),
        });
    };

    let points: Vec<(f64, f64)> = daily
        .iter()
        .map(|day| (day_number(day.date), day.total_tasks))
        .collect();
    let (slope, intercept) = least_squares(&points);

    Ok((1..=horizon_days)
        .filter_map(|offset| last_date.checked_add_days(Days::new(u64::from(offset))))
        .map(|date| ForecastPoint {
            date,
            predicted_tasks: slope.mul_add(day_number(date), intercept),
        })
        .collect())
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Returns `(slope, intercept)`; a degenerate fit is flat at the mean.
fn least_squares(points: &[(f64, f64)]) -> (f64, f64) {
    let n = count_as_f64(points.len());
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (covariance, variance) = points.iter().fold((0.0, 0.0), |(cov, var), (x, y)| {
        let dx = x - mean_x;
        (dx.mul_add(y - mean_y, cov), dx.mul_add(dx, var))
    });
    if variance == 0.0 {
        return (0.0, mean_y);
    }
    let slope = covariance / variance;
    (slope, slope.mul_add(-mean_x, mean_y))
}

/// Historical and forecast daily means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastSummary {
    /// Mean completed work per historical day.
    pub historical_mean: f64,
    /// Mean predicted completed work per forecast day.
    pub forecast_mean: f64,
    /// Percentage change from the historical mean; absent when it is zero.
    pub change_percent: Option<f64>,
}

/// Summarizes a forecast against its history.
#[must_use]
pub fn forecast_summary(daily: &[DailySummary], forecast: &[ForecastPoint]) -> ForecastSummary {
    let historical_mean = mean(daily.iter().map(|day| day.total_tasks), daily.len());
    let forecast_mean = mean(
        forecast.iter().map(|point| point.predicted_tasks),
        forecast.len(),
    );
    let change_percent = (historical_mean != 0.0)
        .then(|| (forecast_mean - historical_mean) / historical_mean * 100.0);
    ForecastSummary {
        historical_mean,
        forecast_mean,
        change_percent,
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count_as_f64(count)
}
