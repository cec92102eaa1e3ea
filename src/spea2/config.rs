//! SPEA2 configuration.

use crate::core::{evaluator_for, Problem};
use crate::engine::{GenerationalEngine, StoppingRule};
use crate::error::ConfigError;
use crate::operators::{CrossoverSpec, MutationSpec};
use crate::spea2::policy::Spea2Policy;
use crate::spea2::Spea2;

/// Configuration for SPEA2.
///
/// The archive is the algorithm's memory: mating draws from it by binary
/// tournament on the strength fitness, and the reported result is its
/// non-dominated subset.
///
/// ```
/// use hydroevo::spea2::Spea2Config;
///
/// let config = Spea2Config::default().with_archive_capacity(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spea2Config {
    /// Population size; must divide into the crossover's parent groups.
    pub population_size: usize,

    /// Bound on the external archive.
    pub archive_capacity: usize,

    pub crossover: CrossoverSpec,

    pub mutation: MutationSpec,

    /// Evaluation budget, advanced by the offspring count each generation.
    pub max_evaluations: usize,

    /// Evaluate populations through the rayon thread pool.
    pub parallel: bool,

    pub seed: Option<u64>,
}

impl Default for Spea2Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            archive_capacity: 100,
            crossover: CrossoverSpec::Sbx {
                probability: 0.9,
                distribution_index: 20.0,
            },
            mutation: MutationSpec::Polynomial {
                probability: None,
                distribution_index: 20.0,
            },
            max_evaluations: 25_000,
            parallel: false,
            seed: None,
        }
    }
}

impl Spea2Config {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_archive_capacity(mut self, capacity: usize) -> Self {
        self.archive_capacity = capacity;
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

    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
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
        if self.archive_capacity == 0 {
            return Err(ConfigError::ArchiveCapacity);
        }
        let required = self.crossover.number_of_required_parents();
        if self.population_size % required != 0 {
            return Err(ConfigError::MatingPool {
                pool: self.population_size,
                required,
            });
        }
        self.crossover.validate()?;
        self.mutation.validate()?;
        if self.max_evaluations == 0 {
            return Err(ConfigError::ParameterRange {
                name: "max_evaluations",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        Ok(())
    }

    /// Validates the configuration and binds it to `problem`.
    pub fn build<P: Problem>(&self, problem: P) -> Result<Spea2<P>, ConfigError> {
        self.validate()?;
        let policy = Spea2Policy::new(
            self.crossover.build()?,
            self.mutation.build(problem.number_of_variables())?,
            problem.bounds().clone(),
            self.archive_capacity,
        )?;
        Ok(GenerationalEngine::new(
            "spea2",
            problem,
            policy,
            self.population_size,
            StoppingRule::max_evaluations(self.max_evaluations),
            evaluator_for(self.parallel),
            self.seed,
        ))
    }
}
