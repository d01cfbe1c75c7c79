//! Individual entry rule implementations.
//!
//! Each rule is a pure function that inspects one aspect of a raw report and
//! returns the violation it detects, if any.

use super::{ValidationContext, ValidationError};
use crate::report::domain::{RawSubmission, RawTaskBlock, TaskCategory};

/// Largest automation progress value.
pub const MAX_PROGRESS_PERCENT: f64 = 100.0;

/// Checks that a user was chosen and is on the roster.
#[must_use]
pub fn validate_user(user_name: &str, context: &ValidationContext) -> Option<ValidationError> {
    let trimmed = user_name.trim();
    if trimmed.is_empty() {
        return Some(ValidationError::MissingUser);
    }
    if !context.is_rostered(trimmed) {
        return Some(ValidationError::UnknownUser(trimmed.to_owned()));
    }
    None
}

/// Checks that at least one category is selected.
#[must_use]
pub fn validate_task_selected(raw: &RawSubmission) -> Option<ValidationError> {
    (!raw.any_selected()).then_some(ValidationError::NoTaskSelected)
}

/// Checks the required values of one selected category.
///
/// Counts must be positive whole numbers, automation progress must lie in
/// `(0, 100]`, hours must be positive, and every category except `other`
/// needs at least one batch.
#[must_use]
pub fn validate_category_fields(
    category: TaskCategory,
    block: &RawTaskBlock,
) -> Option<ValidationError> {
    let completed_ok = if category.is_progress() {
        is_positive(block.completed) && block.completed <= MAX_PROGRESS_PERCENT
    } else {
        is_positive(block.completed) && is_whole(block.completed)
    };
    let batches_ok = !category.requires_batches() || has_batches(block);

    if completed_ok && is_positive(block.hours) && batches_ok {
        None
    } else {
        Some(ValidationError::IncompleteCategory(category))
    }
}

/// Checks that every batch named by a selected category is registered.
#[must_use]
pub fn validate_known_batches(
    category: TaskCategory,
    block: &RawTaskBlock,
    context: &ValidationContext,
) -> Option<ValidationError> {
    let unknown: Vec<String> = block
        .batches
        .iter()
        .map(|batch| batch.trim())
        .filter(|batch| !batch.is_empty() && !context.is_registered_batch(batch))
        .map(str::to_owned)
        .collect();
    (!unknown.is_empty()).then_some(ValidationError::UnknownBatches {
        category,
        batches: unknown,
    })
}

/// Checks that overtime is not negative.
#[must_use]
pub fn validate_overtime(overtime_hours: f64) -> Option<ValidationError> {
    (overtime_hours.is_nan() || overtime_hours < 0.0).then_some(ValidationError::NegativeOvertime)
}

/// Checks the daily minimum; only applies once a category is selected.
#[must_use]
pub fn validate_total_hours(
    any_selected: bool,
    total: f64,
    minimum: f64,
) -> Option<ValidationError> {
    let below_minimum = total.is_nan() || total < minimum;
    (any_selected && below_minimum).then_some(ValidationError::InsufficientHours { total })
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_whole(value: f64) -> bool {
    (value - value.round()).abs() < f64::EPSILON
}

fn has_batches(block: &RawTaskBlock) -> bool {
    block.batches.iter().any(|batch| !batch.trim().is_empty())
}
