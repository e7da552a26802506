//! Layout fitness.
//!
//! A raw travel score is misleading on its own: a layout that runs out of
//! tools early travels less simply because it produced less. Fitness
//! therefore ranks by completed parts first and travel second.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::ProductionReport;

/// Fitness of a turret layout.
///
/// Ordered by the minimization convention: `a < b` means `a` is the better
/// layout. More completed parts wins; equal counts compare by lower travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fitness {
    /// Parts produced before the simulation stopped.
    pub parts_completed: usize,
    /// Rotational travel over those parts.
    pub score: u64,
}

impl Fitness {
    /// Fitness of a layout that could not start production at all.
    pub fn infeasible() -> Self {
        Self {
            parts_completed: 0,
            score: 0,
        }
    }
}

impl From<&ProductionReport> for Fitness {
    fn from(report: &ProductionReport) -> Self {
        Self {
            parts_completed: report.parts_completed,
            score: report.score,
        }
    }
}

impl Ord for Fitness {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .parts_completed
            .cmp(&self.parts_completed)
            .then(self.score.cmp(&other.score))
    }
}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
