//! Selection operators.

use std::cmp::Ordering;

use rand::{Rng, RngCore};

use crate::core::{Solution, Variable};
use crate::error::ConfigError;

/// Comparator used to order candidates during selection; `Less` is better.
pub type SolutionComparator<T> = fn(&Solution<T>, &Solution<T>) -> Ordering;

/// Draws one parent from a population without mutating it.
pub trait SelectionOperator<T: Variable>: Send {
    /// Selects a parent. Fails on an empty population.
    fn execute<'a>(
        &self,
        population: &'a [Solution<T>],
        rng: &mut dyn RngCore,
    ) -> Result<&'a Solution<T>, ConfigError>;
}

/// K-way tournament under a supplied comparator.
///
/// Draws `size` candidates with replacement and keeps the one the
/// comparator orders first. Size 1 degenerates to a uniform draw; larger
/// tournaments raise selection pressure.
pub struct TournamentSelection<T: Variable> {
    size: usize,
    comparator: SolutionComparator<T>,
}

impl<T: Variable> TournamentSelection<T> {
    pub fn new(size: usize, comparator: SolutionComparator<T>) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ParameterRange {
                name: "tournament size",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        Ok(Self { size, comparator })
    }

    /// Binary tournament, the multi-objective default.
    pub fn binary(comparator: SolutionComparator<T>) -> Self {
        Self {
            size: 2,
            comparator,
        }
    }
}

impl<T: Variable> SelectionOperator<T> for TournamentSelection<T> {
    fn execute<'a>(
        &self,
        population: &'a [Solution<T>],
        rng: &mut dyn RngCore,
    ) -> Result<&'a Solution<T>, ConfigError> {
        if population.is_empty() {
            return Err(ConfigError::EmptySelectionPool);
        }
        let mut best = &population[rng.random_range(0..population.len())];
        for _ in 1..self.size {
            let challenger = &population[rng.random_range(0..population.len())];
            if (self.comparator)(challenger, best) == Ordering::Less {
                best = challenger;
            }
        }
        Ok(best)
    }
}

/// Rank-biased random selection (Whitley's linear bias).
///
/// Orders the population with the comparator and favours the head of the
/// ranking. `bias` 1 is exactly uniform random; `bias` 2 roughly doubles
/// the best solution's draw odds relative to uniform.
pub struct BiasedRandomSelection<T: Variable> {
    bias: f64,
    comparator: SolutionComparator<T>,
}

impl<T: Variable> BiasedRandomSelection<T> {
    pub fn new(bias: f64, comparator: SolutionComparator<T>) -> Result<Self, ConfigError> {
        if !(1.0..=2.0).contains(&bias) {
            return Err(ConfigError::ParameterRange {
                name: "selection bias",
                value: bias,
                min: 1.0,
                max: 2.0,
            });
        }
        Ok(Self { bias, comparator })
    }
}

impl<T: Variable> SelectionOperator<T> for BiasedRandomSelection<T> {
    fn execute<'a>(
        &self,
        population: &'a [Solution<T>],
        rng: &mut dyn RngCore,
    ) -> Result<&'a Solution<T>, ConfigError> {
        if population.is_empty() {
            return Err(ConfigError::EmptySelectionPool);
        }
        let n = population.len();
        if self.bias <= 1.0 {
            return Ok(&population[rng.random_range(0..n)]);
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| (self.comparator)(&population[a], &population[b]));

        let b = self.bias;
        let u: f64 = rng.random_range(0.0..1.0);
        let position = n as f64 * (b - (b * b - 4.0 * (b - 1.0) * u).sqrt()) / (2.0 * (b - 1.0));
        let position = (position as usize).min(n - 1);
        Ok(&population[order[position]])
    }
}

/// Donor-index selection for differential evolution.
///
/// Draws `number_of_donors` distinct indices, all different from the
/// current target index.
#[derive(Debug, Clone, Copy)]
pub struct DifferentialSelection {
    number_of_donors: usize,
}

impl DifferentialSelection {
    pub fn new(number_of_donors: usize) -> Self {
        Self { number_of_donors }
    }

    pub fn execute(
        &self,
        population_len: usize,
        current: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, ConfigError> {
        if population_len <= self.number_of_donors {
            return Err(ConfigError::DonorCount {
                required: self.number_of_donors,
                available: population_len.saturating_sub(1),
            });
        }
        let mut donors = Vec::with_capacity(self.number_of_donors);
        while donors.len() < self.number_of_donors {
            let index = rng.random_range(0..population_len);
            if index != current && !donors.contains(&index) {
                donors.push(index);
            }
        }
        Ok(donors)
    }
}
