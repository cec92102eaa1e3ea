//! Operator parameter schemas.
//!
//! Plain-data descriptions of operator configurations, resolved to boxed
//! operators at build time. This is the explicit registry replacing
//! reflection-style operator lookup: hosts construct specs (or deserialize
//! them with the `serde` feature) and algorithm configs build the
//! operators they need.

use crate::core::Variable;
use crate::error::ConfigError;
use crate::operators::crossover::{
    CrossoverOperator, DifferentialCrossover, SbxCrossover, SinglePointCrossover,
};
use crate::operators::mutation::{
    MutationOperator, PolynomialMutation, RangeRandomMutation, SimpleRandomMutation,
};
use crate::operators::selection::{
    BiasedRandomSelection, SelectionOperator, SolutionComparator, TournamentSelection,
};

/// Parent selection schema.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionSpec {
    /// K-way tournament under the algorithm's comparator.
    Tournament { size: usize },
    /// Rank-biased random draw; bias 1 is uniform, bias up to 2 favours
    /// the head of the ranking.
    BiasedRandom { bias: f64 },
}

impl SelectionSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            SelectionSpec::Tournament { size } => {
                if size == 0 {
                    return Err(ConfigError::ParameterRange {
                        name: "tournament size",
                        value: 0.0,
                        min: 1.0,
                        max: f64::INFINITY,
                    });
                }
            }
            SelectionSpec::BiasedRandom { bias } => {
                if !(1.0..=2.0).contains(&bias) {
                    return Err(ConfigError::ParameterRange {
                        name: "selection bias",
                        value: bias,
                        min: 1.0,
                        max: 2.0,
                    });
                }
            }
        }
        Ok(())
    }

    /// Builds the operator with the comparator the algorithm selects by.
    pub fn build<T: Variable>(
        &self,
        comparator: SolutionComparator<T>,
    ) -> Result<Box<dyn SelectionOperator<T>>, ConfigError> {
        Ok(match *self {
            SelectionSpec::Tournament { size } => {
                Box::new(TournamentSelection::new(size, comparator)?)
            }
            SelectionSpec::BiasedRandom { bias } => {
                Box::new(BiasedRandomSelection::new(bias, comparator)?)
            }
        })
    }
}

/// Crossover schema.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverSpec {
    SinglePoint { probability: f64 },
    Sbx { probability: f64, distribution_index: f64 },
    /// rand/1/bin; used by the differential evolution family.
    Differential { cr: f64, f: f64 },
}

impl CrossoverSpec {
    /// Parents the built operator will require per invocation.
    pub fn number_of_required_parents(&self) -> usize {
        match self {
            CrossoverSpec::SinglePoint { .. } | CrossoverSpec::Sbx { .. } => 2,
            CrossoverSpec::Differential { .. } => 4,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // construction performs the full parameter validation
        self.build::<f64>().map(|_| ())
    }

    pub fn build<T: Variable>(&self) -> Result<Box<dyn CrossoverOperator<T>>, ConfigError> {
        Ok(match *self {
            CrossoverSpec::SinglePoint { probability } => {
                Box::new(SinglePointCrossover::new(probability)?)
            }
            CrossoverSpec::Sbx {
                probability,
                distribution_index,
            } => Box::new(SbxCrossover::new(probability, distribution_index)?),
            CrossoverSpec::Differential { cr, f } => Box::new(DifferentialCrossover::new(cr, f)?),
        })
    }
}

/// Mutation schema.
///
/// A `None` probability resolves to `1 / number_of_variables` at build
/// time, the conventional per-variable mutation rate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationSpec {
    SimpleRandom { probability: Option<f64> },
    RangeRandom { probability: Option<f64>, window: f64 },
    Polynomial {
        probability: Option<f64>,
        distribution_index: f64,
    },
}

impl MutationSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // resolve against a nominal variable count; explicit probabilities
        // and shape parameters are what need checking
        self.build::<f64>(1).map(|_| ())
    }

    pub fn build<T: Variable>(
        &self,
        number_of_variables: usize,
    ) -> Result<Box<dyn MutationOperator<T>>, ConfigError> {
        let resolved = |probability: Option<f64>| {
            probability.unwrap_or(1.0 / number_of_variables.max(1) as f64)
        };
        Ok(match *self {
            MutationSpec::SimpleRandom { probability } => {
                Box::new(SimpleRandomMutation::new(resolved(probability))?)
            }
            MutationSpec::RangeRandom { probability, window } => {
                Box::new(RangeRandomMutation::new(resolved(probability), window)?)
            }
            MutationSpec::Polynomial {
                probability,
                distribution_index,
            } => Box::new(PolynomialMutation::new(
                resolved(probability),
                distribution_index,
            )?),
        })
    }
}
