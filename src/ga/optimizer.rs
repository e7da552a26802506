//! Generational GA over turret layouts.
//!
//! # Loop
//!
//! 1. Seed: the known-good layout plus random permutations of it
//! 2. Rank every individual by [`Fitness`] (simulated on a clone)
//! 3. Select the best individual plus `U - 1` random others as parents
//! 4. Breed: single-point crossover, mutation, repair to the distribution
//! 5. Replace the population and repeat for the configured generations
//!
//! All randomness comes from the generator handed to [`Optimizer::new`], so
//! a seeded generator reproduces a run exactly.

use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::operators::{mutate, repair, single_point_crossover};
use super::{Fitness, OptimizerConfig, StartPolicy};
use crate::error::{Result, TurretError};
use crate::models::{Distribution, ProductionReport, ToolId, ToolLifeTable, Turret};
use crate::validation::{validate_config, validate_input};

/// A population member with its fitness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Individual {
    /// The layout (never scored, so its tools are unworn).
    pub turret: Turret,
    /// Fitness of the layout.
    pub fitness: Fitness,
}

impl Individual {
    /// Tool ids in slot order.
    pub fn slot_ids(&self) -> Vec<ToolId> {
        self.turret.slot_ids()
    }
}

/// Population summary for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0 = initial population).
    pub generation: usize,
    /// Individuals evaluated.
    pub population: usize,
    /// Best fitness in the population.
    pub best: Fitness,
    /// Mean travel score of individuals that completed at least one part,
    /// `None` when none did.
    pub mean_score: Option<f64>,
    /// Individuals that produced every requested part.
    pub complete: usize,
}

impl GenerationStats {
    fn from_ranked(generation: usize, ranked: &[(usize, Fitness)], parts: usize) -> Option<Self> {
        let &(_, best) = ranked.first()?;
        let feasible: Vec<u64> = ranked
            .iter()
            .filter(|(_, f)| f.parts_completed > 0)
            .map(|(_, f)| f.score)
            .collect();
        let mean_score = (!feasible.is_empty())
            .then(|| feasible.iter().sum::<u64>() as f64 / feasible.len() as f64);
        Some(Self {
            generation,
            population: ranked.len(),
            best,
            mean_score,
            complete: ranked
                .iter()
                .filter(|(_, f)| f.parts_completed == parts)
                .count(),
        })
    }
}

/// Outcome of [`Optimizer::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evolution {
    /// Final population, best first.
    pub population: Vec<Individual>,
    /// Per-generation statistics, starting with the initial population.
    pub history: Vec<GenerationStats>,
}

impl Evolution {
    /// Best individual of the final population.
    pub fn best(&self) -> Option<&Individual> {
        self.population.first()
    }
}

/// Genetic optimizer for turret layouts.
///
/// # Example
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use u_turret::ga::{Optimizer, OptimizerConfig};
/// use u_turret::models::{Distribution, ToolLife, ToolLifeTable};
///
/// let table: ToolLifeTable = [(1, 10), (2, 8), (3, 12), (4, 15), (5, 7)]
///     .into_iter()
///     .map(|(id, life)| (id, ToolLife::Finite(life)))
///     .collect();
/// let distribution: Distribution =
///     [(1, 2), (2, 2), (3, 1), (4, 1), (5, 1)].into_iter().collect();
///
/// let config = OptimizerConfig::default()
///     .with_population_size(20)
///     .with_generations(3);
/// let mut optimizer =
///     Optimizer::new(config, vec![1, 2, 3, 4, 5], table, SmallRng::seed_from_u64(7));
/// let evolution = optimizer.run(&[1, 2, 3, 4, 5, 1, 2], &distribution).unwrap();
/// assert_eq!(evolution.population.len(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer<R: Rng> {
    config: OptimizerConfig,
    ops: Vec<ToolId>,
    tool_life_table: ToolLifeTable,
    rng: R,
}

impl<R: Rng> Optimizer<R> {
    /// Creates an optimizer for an operation sequence.
    pub fn new(config: OptimizerConfig, ops: Vec<ToolId>, tool_life_table: ToolLifeTable, rng: R) -> Self {
        Self {
            config,
            ops,
            tool_life_table,
            rng,
        }
    }

    /// GA parameters.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Operation sequence of one part.
    pub fn ops(&self) -> &[ToolId] {
        &self.ops
    }

    /// Initial life per tool id.
    pub fn tool_life_table(&self) -> &ToolLifeTable {
        &self.tool_life_table
    }

    /// Builds `size + 1` turrets: `seed_layout` itself followed by `size`
    /// random permutations of it, all with fresh tool life.
    pub fn create_initial_population(&mut self, size: usize, seed_layout: &[ToolId]) -> Result<Vec<Turret>> {
        let mut population = Vec::with_capacity(size + 1);
        population.push(Turret::new(seed_layout, &self.tool_life_table)?);

        for _ in 0..size {
            let mut slots = seed_layout.to_vec();
            slots.shuffle(&mut self.rng);
            population.push(Turret::new(&slots, &self.tool_life_table)?);
        }
        Ok(population)
    }

    /// Simulates production on a clone of `turret`.
    ///
    /// The turret passed in is left untouched, so evaluation can be
    /// repeated.
    pub fn evaluate(&self, turret: &Turret) -> Result<ProductionReport> {
        let mut trial = turret.clone();
        let start = match self.config.start_policy {
            StartPolicy::Home => 0,
            StartPolicy::NearestFirstTool => {
                let first = *self.ops.first().ok_or(TurretError::EmptyOperations)?;
                trial.find_nearest(first, 0).map_or(0, |(index, _)| index)
            }
        };
        trial.score(self.config.parts, &self.ops, start)
    }

    /// Fitness of a layout. Layouts that cannot start production rank last.
    pub fn fitness(&self, turret: &Turret) -> Fitness {
        match self.evaluate(turret) {
            Ok(report) => Fitness::from(&report),
            Err(err) => {
                debug!(error = %err, "layout cannot start production");
                Fitness::infeasible()
            }
        }
    }

    /// Picks parents: the best individual plus up to `U - 1` others drawn
    /// uniformly without replacement.
    pub fn selection(&mut self, population: &[Turret]) -> Result<Vec<Turret>> {
        let ranked = self.rank(population);
        self.select_ranked(population, &ranked)
    }

    /// Single-point crossover of two parents.
    pub fn crossover(&mut self, parent1: &Turret, parent2: &Turret) -> Result<Turret> {
        single_point_crossover(parent1, parent2, &mut self.rng)
    }

    /// Relabels `turret` in place to match `distribution`.
    pub fn repair(&self, turret: &mut Turret, distribution: &Distribution) -> Result<()> {
        repair(turret, distribution, &self.tool_life_table)
    }

    /// Mutates a copy of `turret` at the given per-slot rate.
    pub fn mutate(&mut self, turret: &Turret, mutation_rate: f64) -> Result<Turret> {
        mutate(turret, mutation_rate, &self.tool_life_table, &mut self.rng)
    }

    /// Evolves layouts starting from `seed_layout`.
    ///
    /// Every offspring is repaired to `distribution`. Inputs and parameters
    /// are validated up front; all problems are reported together.
    #[instrument(level = "debug", skip(self, seed_layout, distribution), fields(slots = seed_layout.len(), population_size = self.config.population_size, generations = self.config.generations))]
    pub fn run(&mut self, seed_layout: &[ToolId], distribution: &Distribution) -> Result<Evolution> {
        let mut problems = Vec::new();
        if let Err(errors) = validate_config(&self.config) {
            problems.extend(errors);
        }
        if let Err(errors) = validate_input(&self.ops, &self.tool_life_table, seed_layout, distribution) {
            problems.extend(errors);
        }
        if !problems.is_empty() {
            return Err(TurretError::InvalidInput(problems));
        }

        let size = self.config.population_size;
        let parts = self.config.parts;
        let mut population = self.create_initial_population(size, seed_layout)?;
        let mut ranked = self.rank(&population);
        let mut history: Vec<GenerationStats> =
            GenerationStats::from_ranked(0, &ranked, parts).into_iter().collect();

        for generation in 1..=self.config.generations {
            let parents = self.select_ranked(&population, &ranked)?;

            let mut next = Vec::with_capacity(size);
            while next.len() < size {
                next.push(self.breed(&parents, distribution)?);
            }
            population = next;
            ranked = self.rank(&population);

            if let Some(stats) = GenerationStats::from_ranked(generation, &ranked, parts) {
                info!(
                    generation,
                    best_parts = stats.best.parts_completed,
                    best_score = stats.best.score,
                    mean_score = ?stats.mean_score,
                    complete = stats.complete,
                    "generation evolved"
                );
                history.push(stats);
            }
        }

        let population = ranked
            .into_iter()
            .map(|(index, fitness)| Individual {
                turret: population[index].clone(),
                fitness,
            })
            .collect();
        Ok(Evolution {
            population,
            history,
        })
    }

    /// Population indices with fitness, best first (stable on ties).
    fn rank(&self, population: &[Turret]) -> Vec<(usize, Fitness)> {
        let mut ranked: Vec<(usize, Fitness)> = population
            .iter()
            .enumerate()
            .map(|(index, turret)| (index, self.fitness(turret)))
            .collect();
        ranked.sort_by_key(|&(_, fitness)| fitness);
        ranked
    }

    fn select_ranked(&mut self, population: &[Turret], ranked: &[(usize, Fitness)]) -> Result<Vec<Turret>> {
        let ((best, _), rest) = ranked.split_first().ok_or(TurretError::EmptyPopulation)?;
        let extra = self.config.parents.saturating_sub(1).min(rest.len());

        let mut parents = Vec::with_capacity(extra + 1);
        parents.push(population[*best].clone());
        parents.extend(
            rest.choose_multiple(&mut self.rng, extra)
                .map(|&(index, _)| population[index].clone()),
        );
        Ok(parents)
    }

    /// One offspring: crossover of two distinct random parents (the sole
    /// parent with itself when only one exists), mutation, then repair.
    fn breed(&mut self, parents: &[Turret], distribution: &Distribution) -> Result<Turret> {
        let picked: Vec<&Turret> = parents.choose_multiple(&mut self.rng, 2).collect();
        let (parent1, parent2) = match picked.as_slice() {
            [a, b] => (*a, *b),
            [a] => (*a, *a),
            _ => return Err(TurretError::EmptyPopulation),
        };

        let offspring = self.crossover(parent1, parent2)?;
        let mut offspring = self.mutate(&offspring, self.config.mutation_rate)?;
        self.repair(&mut offspring, distribution)?;
        Ok(offspring)
    }
}
