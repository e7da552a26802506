//! Error types for turret scoring and layout optimization.
//!
//! Search exhaustion during scoring is not an error: a layout that runs out
//! of usable tools yields a partial [`ProductionReport`](crate::models::ProductionReport).
//! Everything here is a broken precondition reported straight to the caller.

use thiserror::Error;

use crate::models::ToolId;
use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TurretError>;

/// Hard failures raised by the turret model and the optimizer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TurretError {
    /// A slot references a tool id missing from the tool-life table.
    #[error("Tool {id} has no entry in the tool-life table")]
    UnknownTool { id: ToolId },

    /// A turret must have at least one slot.
    #[error("Turret has no slots")]
    EmptyTurret,

    /// Scoring needs at least one operation.
    #[error("Operation sequence is empty")]
    EmptyOperations,

    /// Selection needs at least one individual.
    #[error("Population is empty")]
    EmptyPopulation,

    /// Scoring started outside the turret.
    #[error("Position {position} is outside a turret of {size} slots")]
    PositionOutOfRange { position: usize, size: usize },

    /// The pointer does not sit on the first required tool.
    #[error("Tool {found} is at position {position}, but the operations start with tool {expected}")]
    StartToolMismatch {
        position: usize,
        found: ToolId,
        expected: ToolId,
    },

    /// Crossover parents differ in slot count.
    #[error("Parents must have the same number of slots: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Single-point crossover needs a cut point in `[1, size - 1]`.
    #[error("Crossover needs at least 2 slots, got {size}")]
    TooFewSlots { size: usize },

    /// Crossover cut point outside `[1, size - 1]`.
    #[error("Cut point {cut} is outside [1, {}] for a turret of {size} slots", .size.saturating_sub(1))]
    CutOutOfRange { cut: usize, size: usize },

    /// Repair target does not account for every slot.
    #[error("Distribution covers {actual} slots, turret has {expected}")]
    DistributionSize { expected: usize, actual: usize },

    /// Mutation probability outside `[0, 1]`.
    #[error("Mutation rate must be in [0, 1], got {0}")]
    InvalidMutationRate(f64),

    /// Problem inputs failed validation.
    #[error("Invalid optimizer input ({} problem(s)): {}", .0.len(), summarize(.0))]
    InvalidInput(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
