//! GA-based turret layout optimization.
//!
//! Searches slot arrangements of a fixed tool multiset for the layout that
//! produces the most parts with the least rotational travel.
//!
//! # Encoding
//!
//! An individual is a [`Turret`](crate::models::Turret): the slot order of
//! tool ids is the genome. Offspring are repaired so every layout carries
//! exactly the required number of each tool.
//!
//! # Submodules
//!
//! - [`operators`]: crossover, repair and mutation on layouts
//!
//! # Reference
//! Holland (1975), "Adaptation in Natural and Artificial Systems"

mod config;
mod fitness;
pub mod operators;
mod optimizer;

pub use config::{OptimizerConfig, StartPolicy};
pub use fitness::Fitness;
pub use optimizer::{Evolution, GenerationStats, Individual, Optimizer};
