//! Per-category task blocks and the total-hours derivation.

use super::{BatchList, TaskCategory};
use serde::{Deserialize, Serialize};

/// One category's reported work within a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskBlock {
    /// Whether the user reported this category.
    pub selected: bool,
    /// Completed count, or percentage progress for automation.
    pub completed: f64,
    /// Hours spent.
    pub hours: f64,
    /// Batches worked on.
    pub batches: BatchList,
}

impl TaskBlock {
    /// Creates a selected block.
    #[must_use]
    pub const fn selected(completed: f64, hours: f64, batches: BatchList) -> Self {
        Self {
            selected: true,
            completed,
            hours,
            batches,
        }
    }

    /// Returns `completed` as the whole count stored for every category
    /// except automation.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "validated counts are small whole numbers"
    )]
    pub fn completed_count(&self) -> i64 {
        self.completed.round() as i64
    }

    /// Creates an unselected block with zeroed values.
    #[must_use]
    pub const fn unselected() -> Self {
        Self {
            selected: false,
            completed: 0.0,
            hours: 0.0,
            batches: BatchList::empty(),
        }
    }
}

/// The six task blocks of a submission, one per [`TaskCategory`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskBlocks {
    /// Spatial block.
    pub spatial: TaskBlock,
    /// Textual block.
    pub textual: TaskBlock,
    /// QA block.
    pub qa: TaskBlock,
    /// QC block.
    pub qc: TaskBlock,
    /// Automation block.
    pub automation: TaskBlock,
    /// Other block.
    pub other: TaskBlock,
}

impl TaskBlocks {
    /// Returns the block for a category.
    #[must_use]
    pub const fn get(&self, category: TaskCategory) -> &TaskBlock {
        match category {
            TaskCategory::Spatial => &self.spatial,
            TaskCategory::Textual => &self.textual,
            TaskCategory::Qa => &self.qa,
            TaskCategory::Qc => &self.qc,
            TaskCategory::Automation => &self.automation,
            TaskCategory::Other => &self.other,
        }
    }

    /// Returns the mutable block for a category.
    pub const fn get_mut(&mut self, category: TaskCategory) -> &mut TaskBlock {
        match category {
            TaskCategory::Spatial => &mut self.spatial,
            TaskCategory::Textual => &mut self.textual,
            TaskCategory::Qa => &mut self.qa,
            TaskCategory::Qc => &mut self.qc,
            TaskCategory::Automation => &mut self.automation,
            TaskCategory::Other => &mut self.other,
        }
    }

    /// Iterates over blocks in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskCategory, &TaskBlock)> {
        TaskCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Returns `true` when at least one block is selected.
    #[must_use]
    pub fn any_selected(&self) -> bool {
        self.iter().any(|(_, block)| block.selected)
    }

    /// Sum of `completed` over all blocks.
    #[must_use]
    pub fn total_completed(&self) -> f64 {
        self.iter().map(|(_, block)| block.completed).sum()
    }
}

/// Total hours of a submission: every block's hours plus overtime.
///
/// This is the only summation used for total hours, both when a report is
/// entered and whenever a report view recomputes it, so stored and derived
/// totals cannot drift apart.
#[must_use]
pub fn total_hours(blocks: &TaskBlocks, overtime_hours: f64) -> f64 {
    let block_hours: f64 = blocks.iter().map(|(_, block)| block.hours).sum();
    block_hours + overtime_hours
}
