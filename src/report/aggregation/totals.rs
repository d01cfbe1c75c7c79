//! Per-category completed totals.

use crate::report::domain::{TaskBlocks, TaskCategory, TaskSubmission};
use serde::Serialize;
use std::collections::BTreeMap;

/// Completed work summed per category; every category is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<TaskCategory, f64>);

impl CategoryTotals {
    /// Creates totals with every category at zero.
    #[must_use]
    pub fn zero() -> Self {
        Self(
            TaskCategory::ALL
                .into_iter()
                .map(|category| (category, 0.0))
                .collect(),
        )
    }

    /// Adds a value to one category.
    pub fn add(&mut self, category: TaskCategory, value: f64) {
        *self.0.entry(category).or_insert(0.0) += value;
    }

    /// Adds every block's completed value.
    pub fn add_blocks(&mut self, blocks: &TaskBlocks) {
        for (category, block) in blocks.iter() {
            self.add(category, block.completed);
        }
    }

    /// Returns the total for one category.
    #[must_use]
    pub fn get(&self, category: TaskCategory) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    /// Returns the sum across categories.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Iterates in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskCategory, f64)> + '_ {
        self.0.iter().map(|(category, value)| (*category, *value))
    }
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self::zero()
    }
}

/// Sums completed work per category over `records`.
#[must_use]
pub fn sum_by_category(records: &[TaskSubmission]) -> CategoryTotals {
    let mut totals = CategoryTotals::zero();
    for record in records {
        totals.add_blocks(record.blocks());
    }
    totals
}
