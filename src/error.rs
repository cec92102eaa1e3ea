//! Error taxonomy shared across the crate.
//!
//! Three failure classes with different lifecycles:
//!
//! - [`ConfigError`]: invalid setup (bounds, operator parameters, experiment
//!   wiring). Raised at construction time and never retried.
//! - [`EvaluationError`]: the external simulator rejected a solution. Aborts
//!   the current run only; an experiment proceeds with its remaining runs.
//! - [`EvolveError`]: umbrella for failures surfaced by a stepping engine.
//!
//! Cancellation is not an error and does not appear here. Internal invariant
//! violations (a replacement policy returning a wrong-sized population, an
//! empty population handed to the ranking machinery) are programming errors
//! and panic instead.

use thiserror::Error;

/// Invalid configuration detected at construction or setup time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Bounds vectors were empty.
    #[error("bounds must contain at least one variable")]
    EmptyBounds,

    /// Lower and upper bound vectors differ in length.
    #[error("bounds length mismatch: {lower} lower vs {upper} upper bounds")]
    BoundsLength { lower: usize, upper: usize },

    /// A lower bound is not strictly below its upper bound.
    #[error("invalid bound at index {index}: lower {lower} must be strictly below upper {upper}")]
    InvalidBound { index: usize, lower: f64, upper: f64 },

    /// A numeric parameter lies outside its valid range.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    ParameterRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The population is too small for the configured algorithm.
    #[error("population size must be at least {minimum}, got {requested}")]
    PopulationSize { minimum: usize, requested: usize },

    /// The mating pool cannot be divided among the crossover's parents.
    #[error("mating pool of {pool} does not divide into groups of {required} parents")]
    MatingPool { pool: usize, required: usize },

    /// A crossover operator received the wrong number of parents.
    #[error("crossover requires exactly {required} parents, got {supplied}")]
    ParentCount { required: usize, supplied: usize },

    /// Archive capacity must be positive.
    #[error("archive capacity must be at least 1")]
    ArchiveCapacity,

    /// Selection was invoked on an empty population.
    #[error("cannot select from an empty population")]
    EmptySelectionPool,

    /// Donor selection cannot draw enough distinct indices.
    #[error("selection needs {required} distinct donors, population only offers {available}")]
    DonorCount { required: usize, available: usize },

    /// Both or neither of the mutually exclusive stopping counters is active.
    #[error("exactly one of max_evaluations and stagnation_limit must be set")]
    StoppingConflict,

    /// An experiment was configured without a name.
    #[error("experiment name must not be empty")]
    EmptyName,

    /// An experiment was configured without algorithm entries.
    #[error("experiment must register at least one algorithm")]
    NoAlgorithms,

    /// An experiment was configured with zero independent runs.
    #[error("independent run count must be at least 1")]
    NoRuns,
}

/// The external simulator failed while evaluating a solution.
///
/// Carries the simulator's diagnostic verbatim. The failed solution keeps
/// whatever objective values it held before the call; other solutions are
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("evaluation failed: {message}")]
pub struct EvaluationError {
    message: String,
}

impl EvaluationError {
    /// Wraps a simulator diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The simulator's diagnostic text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Any failure surfaced by a stepping engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
