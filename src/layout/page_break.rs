//! # Page Break Decisions
//!
//! Blocks split between children and tables between rows. Both hand the
//! heights of their items to [`BreakLimits::decide`], which picks how many
//! stay on the current page while honouring the orphan and widow minimums
//! from the report options.

use serde::{Deserialize, Serialize};

use crate::model::Units;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Every item fits in the remaining space.
    FitsWhole,
    /// Nothing worth keeping here; the node starts on the next page.
    Defer,
    /// Keep this many items on the current page.
    SplitAfter(usize),
}

/// Minimum number of items left on each side of a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakLimits {
    /// Fewest items kept at the bottom of the current page.
    #[serde(default = "one")]
    pub orphans: usize,
    /// Fewest items carried to the top of the next page.
    #[serde(default = "one")]
    pub widows: usize,
}

fn one() -> usize {
    1
}

impl Default for BreakLimits {
    fn default() -> Self {
        Self {
            orphans: 1,
            widows: 1,
        }
    }
}

impl BreakLimits {
    pub fn new(orphans: usize, widows: usize) -> Self {
        Self { orphans, widows }
    }

    /// Decide how many of `item_heights` stay within `remaining`.
    pub fn decide(&self, remaining: Units, item_heights: &[Units]) -> BreakDecision {
        let mut used: Units = 0;
        let fitting = item_heights
            .iter()
            .take_while(|&&h| match used.checked_add(h) {
                Some(next) if next <= remaining => {
                    used = next;
                    true
                }
                _ => false,
            })
            .count();

        if fitting == item_heights.len() {
            return BreakDecision::FitsWhole;
        }

        // Pull items back until enough are carried over.
        let keep = fitting.min(item_heights.len().saturating_sub(self.widows.max(1)));
        if keep == 0 || keep < self.orphans {
            BreakDecision::Defer
        } else {
            BreakDecision::SplitAfter(keep)
        }
    }
}
