//! Differential evolution configuration.

use crate::core::{evaluator_for, Problem};
use crate::de::policy::DePolicy;
use crate::de::De;
use crate::engine::{GenerationalEngine, StoppingRule};
use crate::error::ConfigError;
use crate::operators::DifferentialCrossover;

/// Configuration for single-objective differential evolution.
///
/// ```
/// use hydroevo::de::DeConfig;
///
/// let config = DeConfig::default().with_population_size(60).with_seed(9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeConfig {
    /// Population size. Needs at least four members so every target can
    /// draw three distinct donors.
    pub population_size: usize,

    /// Crossover rate of the binomial recombination, in `[0, 1]`.
    pub cr: f64,

    /// Differential weight applied to the donor difference, in `[0, 2]`.
    pub f: f64,

    /// Evaluation budget, advanced by the population size each generation.
    pub max_evaluations: usize,

    /// Evaluate trial vectors through the rayon thread pool.
    pub parallel: bool,

    pub seed: Option<u64>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            cr: 0.5,
            f: 0.5,
            max_evaluations: 25_000,
            parallel: false,
            seed: None,
        }
    }
}

impl DeConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_cr(mut self, cr: f64) -> Self {
        self.cr = cr;
        self
    }

    pub fn with_f(mut self, f: f64) -> Self {
        self.f = f;
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
        if self.population_size < 4 {
            return Err(ConfigError::PopulationSize {
                minimum: 4,
                requested: self.population_size,
            });
        }
        DifferentialCrossover::new(self.cr, self.f)?;
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
    pub fn build<P: Problem>(&self, problem: P) -> Result<De<P>, ConfigError> {
        self.validate()?;
        let policy = DePolicy::new(
            DifferentialCrossover::new(self.cr, self.f)?,
            problem.bounds().clone(),
        );
        Ok(GenerationalEngine::new(
            "de",
            problem,
            policy,
            self.population_size,
            StoppingRule::max_evaluations(self.max_evaluations),
            evaluator_for(self.parallel),
            self.seed,
        ))
    }
}
