//! Differ configuration, loadable from JSON
use serde::{Deserialize, Serialize};

use crate::errors::DiffError;

/// How displaced items are turned into MOVE operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStrategy {
    /// Walk the new list in order and reconcile each item against a lazily updated
    /// old position.
    #[default]
    Sequential,
    /// Keep a longest increasing subsequence of final positions in place and move
    /// every other item exactly once.
    LongestIncreasingSubsequence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    pub move_strategy: MoveStrategy,
    /// Log how long each phase of a cycle takes.
    pub debug_timing: bool,
    pub debug_tag: String,
    /// Initial capacity for newly built generations.
    pub capacity_hint: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            move_strategy: MoveStrategy::default(),
            debug_timing: false,
            debug_tag: "list_reconciler".to_string(),
            capacity_hint: 0,
        }
    }
}

impl DiffConfig {
    pub fn from_json_str(json: &str) -> Result<Self, DiffError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_move_strategy(mut self, move_strategy: MoveStrategy) -> Self {
        self.move_strategy = move_strategy;
        self
    }

    pub fn with_debug_timing(mut self, tag: impl Into<String>) -> Self {
        self.debug_timing = true;
        self.debug_tag = tag.into();
        self
    }
}
