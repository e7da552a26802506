//! Production simulation outcome.

use serde::{Deserialize, Serialize};

/// Result of simulating production on a turret.
///
/// `score` only covers fully completed parts. A layout that runs out of
/// usable tools stops early, so two reports are only comparable once
/// `parts_completed` is taken into account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionReport {
    /// Total rotational travel over completed parts (lower = better).
    pub score: u64,
    /// Parts the simulation was asked to produce.
    pub parts_requested: usize,
    /// Parts actually produced before stopping.
    pub parts_completed: usize,
    /// Times a part's slot route differed from the previous part's route.
    pub route_changes: usize,
    /// Slot the turret points at when the simulation ended.
    pub final_position: usize,
}

impl ProductionReport {
    pub(crate) fn new(parts_requested: usize, start: usize) -> Self {
        Self {
            score: 0,
            parts_requested,
            parts_completed: 0,
            route_changes: 0,
            final_position: start,
        }
    }

    /// Whether every requested part was produced.
    pub fn is_complete(&self) -> bool {
        self.parts_completed == self.parts_requested
    }
}
