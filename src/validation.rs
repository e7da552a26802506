//! Input validation for turret layout optimization.
//!
//! Checks problem inputs before the optimizer starts, collecting every
//! problem instead of stopping at the first. Detects:
//! - Empty operation sequences and seed layouts
//! - Tool ids with no tool-life entry
//! - Use of the reserved dead-slot id
//! - Distributions that do not cover the turret exactly
//! - Out-of-range GA parameters

use crate::ga::OptimizerConfig;
use crate::models::{Distribution, ToolId, ToolLifeTable, DEAD_TOOL};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The operation sequence is empty.
    EmptyOperations,
    /// The seed layout has no slots.
    EmptyLayout,
    /// A tool id has no entry in the tool-life table.
    UnknownTool,
    /// The dead-slot id is used as a real tool.
    ReservedToolId,
    /// Distribution slot counts do not add up to the turret size.
    DistributionMismatch,
    /// A GA parameter is out of range.
    InvalidParameter,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the inputs of a layout optimization problem.
///
/// Checks:
/// 1. The operation sequence is non-empty
/// 2. The seed layout is non-empty
/// 3. The tool-life table, operations, seed layout and distribution never
///    use the dead-slot id
/// 4. Every tool id in operations, seed layout and distribution has a
///    tool-life entry
/// 5. The distribution accounts for exactly as many slots as the seed layout
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    ops: &[ToolId],
    tool_life_table: &ToolLifeTable,
    seed_layout: &[ToolId],
    distribution: &Distribution,
) -> ValidationResult {
    let mut errors = Vec::new();

    if ops.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyOperations,
            "Operation sequence is empty",
        ));
    }
    if seed_layout.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyLayout,
            "Seed layout has no slots",
        ));
    }
    if tool_life_table.contains_key(&DEAD_TOOL) {
        errors.push(ValidationError::new(
            ValidationErrorKind::ReservedToolId,
            format!("Tool-life table uses reserved id {DEAD_TOOL}"),
        ));
    }

    check_tool_refs("Operation", ops.iter().copied(), tool_life_table, &mut errors);
    check_tool_refs("Seed slot", seed_layout.iter().copied(), tool_life_table, &mut errors);
    check_tool_refs(
        "Distribution entry",
        distribution.keys().copied(),
        tool_life_table,
        &mut errors,
    );

    let covered: usize = distribution.values().sum();
    if covered != seed_layout.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DistributionMismatch,
            format!(
                "Distribution covers {covered} slots, seed layout has {}",
                seed_layout.len()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates GA parameters.
pub fn validate_config(config: &OptimizerConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.parents == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            "Parent count must be at least 1",
        ));
    }
    if config.population_size == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            "Population size must be at least 1",
        ));
    }
    if !(0.0..=1.0).contains(&config.mutation_rate) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!("Mutation rate must be in [0, 1], got {}", config.mutation_rate),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_tool_refs(
    what: &str,
    ids: impl Iterator<Item = ToolId>,
    tool_life_table: &ToolLifeTable,
    errors: &mut Vec<ValidationError>,
) {
    // Report each offending id once per source
    let mut reported = Vec::new();
    for id in ids {
        if reported.contains(&id) {
            continue;
        }
        if id == DEAD_TOOL {
            errors.push(ValidationError::new(
                ValidationErrorKind::ReservedToolId,
                format!("{what} uses reserved id {DEAD_TOOL}"),
            ));
            reported.push(id);
        } else if !tool_life_table.contains_key(&id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownTool,
                format!("{what} references unknown tool {id}"),
            ));
            reported.push(id);
        }
    }
}
