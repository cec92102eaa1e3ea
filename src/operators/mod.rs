//! Genetic operators: selection, crossover, and mutation.
//!
//! Operators are stateless once constructed and draw all randomness from
//! the RNG passed to `execute`, so a seeded algorithm replays identically.
//! Parameter validation happens at construction and returns
//! [`ConfigError`](crate::error::ConfigError) rather than panicking.

mod crossover;
mod mutation;
mod selection;
mod spec;

pub use crossover::{
    CrossoverOperator, DifferentialCrossover, SbxCrossover, SinglePointCrossover,
};
pub use mutation::{
    MutationOperator, PolynomialMutation, RangeRandomMutation, SimpleRandomMutation,
};
pub use selection::{
    BiasedRandomSelection, DifferentialSelection, SelectionOperator, SolutionComparator,
    TournamentSelection,
};
pub use spec::{CrossoverSpec, MutationSpec, SelectionSpec};

use crate::error::ConfigError;

pub(crate) fn probability_in_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ParameterRange {
            name,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

pub(crate) fn distribution_index_valid(
    name: &'static str,
    value: f64,
) -> Result<(), ConfigError> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(ConfigError::ParameterRange {
            name,
            value,
            min: 0.0,
            max: f64::INFINITY,
        });
    }
    Ok(())
}
