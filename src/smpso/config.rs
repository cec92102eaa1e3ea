//! SMPSO configuration.

use crate::core::{evaluator_for, Problem};
use crate::engine::{GenerationalEngine, StoppingRule};
use crate::error::ConfigError;
use crate::operators::MutationSpec;
use crate::smpso::policy::SmpsoPolicy;
use crate::smpso::Smpso;

/// Configuration for the speed-constrained particle swarm optimizer.
///
/// ```
/// use hydroevo::smpso::SmpsoConfig;
///
/// let config = SmpsoConfig::default().with_swarm_size(50).with_seed(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpsoConfig {
    /// Number of particles.
    pub swarm_size: usize,

    /// Bound on the leaders archive.
    pub archive_capacity: usize,

    /// Turbulence mutation, applied to every sixth particle after the
    /// position update.
    pub mutation: MutationSpec,

    /// Evaluation budget, advanced by the swarm size each generation.
    pub max_evaluations: usize,

    /// Evaluate the swarm through the rayon thread pool.
    pub parallel: bool,

    pub seed: Option<u64>,
}

impl Default for SmpsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: 100,
            archive_capacity: 100,
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

impl SmpsoConfig {
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    pub fn with_archive_capacity(mut self, capacity: usize) -> Self {
        self.archive_capacity = capacity;
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
        if self.swarm_size < 2 {
            return Err(ConfigError::PopulationSize {
                minimum: 2,
                requested: self.swarm_size,
            });
        }
        if self.archive_capacity == 0 {
            return Err(ConfigError::ArchiveCapacity);
        }
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
    pub fn build<P: Problem>(&self, problem: P) -> Result<Smpso<P>, ConfigError> {
        self.validate()?;
        let policy = SmpsoPolicy::new(
            self.mutation.build(problem.number_of_variables())?,
            problem.bounds().clone(),
            self.archive_capacity,
        )?;
        Ok(GenerationalEngine::new(
            "smpso",
            problem,
            policy,
            self.swarm_size,
            StoppingRule::max_evaluations(self.max_evaluations),
            evaluator_for(self.parallel),
            self.seed,
        ))
    }
}
