//! Genetic operators on turret layouts.
//!
//! Operators never score or wear a turret; they build new layouts (or
//! relabel slots in place for repair) with tool life taken from a
//! tool-life table.

use rand::prelude::IndexedRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::error::{Result, TurretError};
use crate::models::{Distribution, Tool, ToolId, ToolLifeTable, Turret};

// ======================== Crossover operators ========================

/// Single-point crossover at a uniformly random cut in `[1, size - 1]`.
///
/// Both parents must have the same slot count, at least 2.
#[instrument(level = "debug", skip(parent1, parent2, rng), fields(size = parent1.size()))]
pub fn single_point_crossover<R: Rng>(
    parent1: &Turret,
    parent2: &Turret,
    rng: &mut R,
) -> Result<Turret> {
    if parent1.size() != parent2.size() {
        return Err(TurretError::LengthMismatch {
            left: parent1.size(),
            right: parent2.size(),
        });
    }
    let size = parent1.size();
    if size < 2 {
        return Err(TurretError::TooFewSlots { size });
    }
    let cut = rng.random_range(1..size);
    crossover_at(parent1, parent2, cut)
}

/// Builds the offspring for a given cut point.
///
/// Slots `[0, cut)` come from `parent1`, `[cut, size)` from `parent2`, with
/// `cut` in `[1, size - 1]`. The offspring's tools take the parents' current life per id, with
/// `parent2`'s values overriding `parent1`'s.
#[instrument(level = "debug", skip(parent1, parent2), fields(size = parent1.size(), cut_point = cut))]
pub fn crossover_at(parent1: &Turret, parent2: &Turret, cut: usize) -> Result<Turret> {
    if parent1.size() != parent2.size() {
        return Err(TurretError::LengthMismatch {
            left: parent1.size(),
            right: parent2.size(),
        });
    }
    let size = parent1.size();
    if cut == 0 || cut >= size {
        return Err(TurretError::CutOutOfRange { cut, size });
    }
    let ids1 = parent1.slot_ids();
    let ids2 = parent2.slot_ids();

    let mut slots = Vec::with_capacity(ids1.len());
    slots.extend_from_slice(&ids1[..cut]);
    slots.extend_from_slice(&ids2[cut..]);

    let mut tool_data = parent1.life_table();
    tool_data.extend(parent2.life_table());

    Turret::new(&slots, &tool_data)
}

// ======================== Repair operator ========================

/// Relabels slots in place until the turret matches `distribution`.
///
/// Ids present beyond their required count (or absent from the
/// distribution, dead slots included) are excess. Scanning slots in order,
/// each excess slot is remounted with the next missing id, fresh from
/// `tool_life_table`, until nothing is missing.
#[instrument(level = "debug", skip(turret, distribution, tool_life_table), fields(size = turret.size()))]
pub fn repair(
    turret: &mut Turret,
    distribution: &Distribution,
    tool_life_table: &ToolLifeTable,
) -> Result<()> {
    let covered: usize = distribution.values().sum();
    if covered != turret.size() {
        return Err(TurretError::DistributionSize {
            expected: turret.size(),
            actual: covered,
        });
    }

    let current = turret.counts();
    let mut excess: BTreeMap<ToolId, usize> = BTreeMap::new();
    for (&id, &count) in &current {
        let expected = distribution.get(&id).copied().unwrap_or(0);
        if count > expected {
            excess.insert(id, count - expected);
        }
    }

    let mut missing: Vec<ToolId> = Vec::new();
    for (&id, &expected) in distribution {
        let count = current.get(&id).copied().unwrap_or(0);
        if count < expected {
            missing.extend(std::iter::repeat(id).take(expected - count));
        }
    }
    if missing.is_empty() {
        return Ok(());
    }

    let replacements = missing
        .iter()
        .map(|&id| {
            tool_life_table
                .get(&id)
                .map(|&life| Tool::new(id, life))
                .ok_or(TurretError::UnknownTool { id })
        })
        .collect::<Result<Vec<_>>>()?;
    let mut replacements = replacements.into_iter();

    for index in 0..turret.size() {
        let id = turret.tools()[index].id;
        let Some(left) = excess.get_mut(&id) else {
            continue;
        };
        if *left == 0 {
            continue;
        }
        let Some(tool) = replacements.next() else {
            break;
        };
        turret.mount(index, tool);
        *left -= 1;
    }

    debug!(relabeled = missing.len(), "turret repaired");
    Ok(())
}

// ======================== Mutation operator ========================

/// Per-slot mutation.
///
/// Each slot mutates with probability `mutation_rate`: half the time it
/// swaps with a uniformly random slot, otherwise it takes a uniformly
/// random tool id from `tool_life_table`. The result is a new turret with
/// fresh tool life, so accumulated wear is discarded.
#[instrument(level = "debug", skip(turret, tool_life_table, rng), fields(size = turret.size(), mutation_rate = mutation_rate))]
pub fn mutate<R: Rng>(
    turret: &Turret,
    mutation_rate: f64,
    tool_life_table: &ToolLifeTable,
    rng: &mut R,
) -> Result<Turret> {
    if !(0.0..=1.0).contains(&mutation_rate) {
        return Err(TurretError::InvalidMutationRate(mutation_rate));
    }

    let tool_ids: Vec<ToolId> = tool_life_table.keys().copied().collect();
    let mut slots = turret.slot_ids();
    let len = slots.len();

    for i in 0..len {
        if !rng.random_bool(mutation_rate) {
            continue;
        }
        if rng.random_bool(0.5) {
            let j = rng.random_range(0..len);
            slots.swap(i, j);
        } else if let Some(&id) = tool_ids.choose(rng) {
            slots[i] = id;
        }
    }

    Turret::new(&slots, tool_life_table)
}
