//! Turret domain models.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Tool`] | Cutting tool with a type id and remaining life |
//! | [`Turret`] | Circular magazine of tool slots |
//! | [`ProductionReport`] | Outcome of simulating production on a turret |
//! | [`ToolLifeTable`] | Initial life per tool id |
//! | [`Distribution`] | Required slot count per tool id |

mod production;
mod tool;
mod turret;

pub use production::ProductionReport;
pub use tool::{Distribution, Tool, ToolId, ToolLife, ToolLifeTable, DEAD_TOOL};
pub use turret::{Distance, Turret};
