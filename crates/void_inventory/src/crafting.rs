//! In-flight crafting jobs

use crate::item::Item;
use std::sync::Arc;

/// Lifecycle of a job: `Pending -> Finished`, then removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Still accumulating time
    Pending,
    /// Elapsed time reached the recipe's craft time
    Finished,
}

/// Materials taken from one container when the job started
#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    /// Index into the crafter's container list
    pub container: usize,
    /// Material taken
    pub item: Arc<Item>,
    /// Quantity taken
    pub amount: u16,
}

/// A single craft in progress
#[derive(Debug, Clone, PartialEq)]
pub struct CraftingJob {
    /// Index of the recipe in the catalog
    pub recipe_index: usize,
    /// Seconds accumulated so far
    pub elapsed_time: f32,
    time_for_craft: f32,
    consumed: Vec<Withdrawal>,
}

impl CraftingJob {
    /// Create a pending job
    pub fn new(recipe_index: usize, time_for_craft: f32) -> Self {
        Self {
            recipe_index,
            elapsed_time: 0.0,
            time_for_craft,
            consumed: Vec::new(),
        }
    }

    pub(crate) fn with_consumed(mut self, consumed: Vec<Withdrawal>) -> Self {
        self.consumed = consumed;
        self
    }

    /// Advance by `delta_time` seconds
    pub fn add_time_elapsed(&mut self, delta_time: f32) {
        self.elapsed_time += delta_time;
    }

    /// Craft duration in seconds
    pub fn time_for_craft(&self) -> f32 {
        self.time_for_craft
    }

    /// Check if elapsed time reached the craft time
    pub fn is_finished(&self) -> bool {
        self.elapsed_time >= self.time_for_craft
    }

    /// Current state
    pub fn state(&self) -> JobState {
        if self.is_finished() {
            JobState::Finished
        } else {
            JobState::Pending
        }
    }

    /// Completion fraction in `0..=1`
    pub fn progress(&self) -> f32 {
        if self.time_for_craft <= 0.0 {
            return 1.0;
        }
        (self.elapsed_time / self.time_for_craft).clamp(0.0, 1.0)
    }

    /// Seconds left until finished
    pub fn remaining_time(&self) -> f32 {
        (self.time_for_craft - self.elapsed_time).max(0.0)
    }

    /// Materials recorded at craft start (empty for jobs added directly)
    pub fn consumed(&self) -> &[Withdrawal] {
        &self.consumed
    }
}
