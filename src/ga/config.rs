//! Optimizer configuration.

use serde::{Deserialize, Serialize};

/// Where fitness evaluation points the turret before simulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartPolicy {
    /// Start at slot 0. Layouts without the first required tool there are
    /// ranked infeasible.
    #[default]
    Home,
    /// Start at the slot holding the first required tool nearest to slot 0.
    /// The approach rotation is not charged.
    NearestFirstTool,
}

/// GA parameters for turret layout search.
///
/// # Example
///
/// ```
/// use u_turret::ga::{OptimizerConfig, StartPolicy};
///
/// let config = OptimizerConfig::default()
///     .with_population_size(50)
///     .with_generations(20)
///     .with_start_policy(StartPolicy::NearestFirstTool);
/// assert_eq!(config.parents, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Parents kept per generation: the best individual plus `parents - 1`
    /// random others.
    pub parents: usize,
    /// Offspring produced per generation.
    pub population_size: usize,
    /// Per-slot mutation probability (0.0..=1.0).
    pub mutation_rate: f64,
    /// Generations to evolve.
    pub generations: usize,
    /// Parts simulated per fitness evaluation.
    pub parts: usize,
    /// Starting slot rule for fitness evaluation.
    pub start_policy: StartPolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            parents: 3,
            population_size: 100,
            mutation_rate: 0.05,
            generations: 5,
            parts: 300,
            start_policy: StartPolicy::Home,
        }
    }
}

impl OptimizerConfig {
    /// Sets the parent count (U).
    pub fn with_parents(mut self, parents: usize) -> Self {
        self.parents = parents;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the per-slot mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the parts simulated per evaluation.
    pub fn with_parts(mut self, parts: usize) -> Self {
        self.parts = parts;
        self
    }

    /// Sets the starting slot rule.
    pub fn with_start_policy(mut self, policy: StartPolicy) -> Self {
        self.start_policy = policy;
        self
    }
}
