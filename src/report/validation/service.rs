//! Validator that turns raw entry values into a storable submission.

use super::{ValidationError, ValidationErrors, rules};
use crate::report::domain::{
    BatchList, NewSubmission, RawSubmission, RawTaskBlock, TaskBlock, TaskBlocks, TaskCategory,
    normalize_note, total_hours,
};
use std::collections::BTreeSet;

/// Minimum total hours for a day with any selected category.
pub const MINIMUM_DAILY_HOURS: f64 = 7.5;

/// Reference data the entry rules check against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    roster: BTreeSet<String>,
    batch_options: BTreeSet<String>,
}

impl ValidationContext {
    /// Creates a context from the roster and the batch registry.
    #[must_use]
    pub fn new<U, B, S, T>(roster: U, batch_options: B) -> Self
    where
        U: IntoIterator<Item = S>,
        B: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            roster: roster.into_iter().map(Into::into).collect(),
            batch_options: batch_options.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` when the user is on the roster.
    #[must_use]
    pub fn is_rostered(&self, user_name: &str) -> bool {
        self.roster.contains(user_name)
    }

    /// Returns `true` when the batch is registered.
    #[must_use]
    pub fn is_registered_batch(&self, batch: &str) -> bool {
        self.batch_options.contains(batch)
    }
}

/// Applies the entry rules in reporting order.
///
/// Violations are reported in this order: user, task selection, then for
/// each category in canonical order its required fields and its batches,
/// then overtime, and the total-hours minimum last. Validation is pure; the
/// same input always yields the same result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmissionValidator {
    minimum_daily_hours: f64,
}

impl SubmissionValidator {
    /// Creates a validator with the standard daily minimum.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            minimum_daily_hours: MINIMUM_DAILY_HOURS,
        }
    }

    /// Returns the daily minimum in hours.
    #[must_use]
    pub const fn minimum_daily_hours(&self) -> f64 {
        self.minimum_daily_hours
    }

    /// Validates a raw report and builds the submission to store.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every violated rule.
    pub fn validate(
        &self,
        raw: &RawSubmission,
        context: &ValidationContext,
    ) -> Result<NewSubmission, ValidationErrors> {
        let blocks = normalized_blocks(raw);
        let total = total_hours(&blocks, raw.overtime_hours());

        let mut errors = Vec::new();
        collect(&mut errors, rules::validate_user(raw.user_name(), context));
        collect(&mut errors, rules::validate_task_selected(raw));
        for category in TaskCategory::ALL {
            if let Some(block) = raw.block(category) {
                collect(&mut errors, rules::validate_category_fields(category, block));
                collect(
                    &mut errors,
                    rules::validate_known_batches(category, block, context),
                );
            }
        }
        collect(&mut errors, rules::validate_overtime(raw.overtime_hours()));
        collect(
            &mut errors,
            rules::validate_total_hours(raw.any_selected(), total, self.minimum_daily_hours),
        );

        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }

        let user_name = raw.user_name().trim().to_owned();
        let submitted_by = raw
            .submitted_by()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| user_name.clone(), str::to_owned);
        let note = raw.note().and_then(normalize_note);

        Ok(NewSubmission::from_validated(
            raw.submission_date(),
            user_name,
            blocks,
            raw.overtime_hours(),
            note,
            submitted_by,
        ))
    }
}

impl Default for SubmissionValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a raw report with the standard rules.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every violated rule.
pub fn build_submission(
    raw: &RawSubmission,
    context: &ValidationContext,
) -> Result<NewSubmission, ValidationErrors> {
    SubmissionValidator::new().validate(raw, context)
}

/// Builds the six blocks; unselected categories are zeroed.
fn normalized_blocks(raw: &RawSubmission) -> TaskBlocks {
    let mut blocks = TaskBlocks::default();
    for category in TaskCategory::ALL {
        *blocks.get_mut(category) = raw
            .block(category)
            .map_or_else(TaskBlock::unselected, normalized_block);
    }
    blocks
}

fn normalized_block(raw: &RawTaskBlock) -> TaskBlock {
    let mut seen = BTreeSet::new();
    let batches: BatchList = raw
        .batches
        .iter()
        .map(|batch| batch.trim())
        .filter(|batch| !batch.is_empty() && seen.insert(*batch))
        .map(str::to_owned)
        .collect();
    TaskBlock::selected(raw.completed, raw.hours, batches)
}

fn collect(errors: &mut Vec<ValidationError>, maybe_error: Option<ValidationError>) {
    if let Some(error) = maybe_error {
        errors.push(error);
    }
}
