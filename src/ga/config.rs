//! Genetic algorithm configuration.

use crate::core::{evaluator_for, Problem};
use crate::engine::{GenerationalEngine, StoppingRule};
use crate::error::ConfigError;
use crate::ga::policy::GaPolicy;
use crate::ga::GeneticAlgorithm;
use crate::operators::{CrossoverSpec, MutationSpec, SelectionSpec};
use crate::ranking::single_objective_compare;

/// Configuration for the single-objective genetic algorithm.
///
/// # Defaults
///
/// ```
/// use hydroevo::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_evaluations, 10_000);
/// assert_eq!(config.stagnation_limit, 0);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use hydroevo::ga::GaConfig;
/// use hydroevo::operators::SelectionSpec;
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_selection(SelectionSpec::BiasedRandom { bias: 1.8 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of solutions in the population. Also the mating pool size:
    /// it must divide into groups of the crossover's required parents.
    pub population_size: usize,

    /// Parent selection scheme, applied with the single-objective
    /// feasibility-then-fitness comparator.
    pub selection: SelectionSpec,

    /// Recombination scheme. Pairwise operators reproduce the population
    /// exactly; the differential crossover belongs to the DE family.
    pub crossover: CrossoverSpec,

    /// Mutation applied to every generated child.
    pub mutation: MutationSpec,

    /// Evaluation budget. Mutually exclusive with `stagnation_limit`:
    /// [`with_max_evaluations`](Self::with_max_evaluations) zeroes the
    /// stagnation counter and vice versa.
    pub max_evaluations: usize,

    /// Generations without strict improvement before stopping. 0 disables
    /// stagnation-based termination.
    pub stagnation_limit: usize,

    /// Evaluate populations through the rayon thread pool. Leave off for
    /// problems wrapping a stateful simulator handle.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            selection: SelectionSpec::Tournament { size: 2 },
            crossover: CrossoverSpec::SinglePoint { probability: 0.9 },
            mutation: MutationSpec::SimpleRandom { probability: None },
            max_evaluations: 10_000,
            stagnation_limit: 0,
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_selection(mut self, selection: SelectionSpec) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_crossover(mut self, crossover: CrossoverSpec) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_mutation(mut self, mutation: MutationSpec) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the evaluation budget and disables stagnation-based stopping.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
        self.stagnation_limit = 0;
        self
    }

    /// Sets the stagnation limit and disables the evaluation budget.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self.max_evaluations = 0;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationSize {
                minimum: 2,
                requested: self.population_size,
            });
        }
        let required = self.crossover.number_of_required_parents();
        if self.population_size % required != 0 {
            return Err(ConfigError::MatingPool {
                pool: self.population_size,
                required,
            });
        }
        self.selection.validate()?;
        self.crossover.validate()?;
        self.mutation.validate()?;
        match (self.max_evaluations > 0, self.stagnation_limit > 0) {
            (true, false) | (false, true) => Ok(()),
            _ => Err(ConfigError::StoppingConflict),
        }
    }

    fn stopping(&self) -> StoppingRule {
        if self.stagnation_limit > 0 {
            StoppingRule::stagnation(self.stagnation_limit)
        } else {
            StoppingRule::max_evaluations(self.max_evaluations)
        }
    }

    /// Validates the configuration and binds it to `problem`.
    pub fn build<P: Problem>(&self, problem: P) -> Result<GeneticAlgorithm<P>, ConfigError> {
        self.validate()?;
        let policy = GaPolicy::new(
            self.selection.build(single_objective_compare)?,
            self.crossover.build()?,
            self.mutation.build(problem.number_of_variables())?,
            problem.bounds().clone(),
        );
        Ok(GenerationalEngine::new(
            "ga",
            problem,
            policy,
            self.population_size,
            self.stopping(),
            evaluator_for(self.parallel),
            self.seed,
        ))
    }
}
