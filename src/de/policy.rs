//! Trial generation and one-to-one replacement.

use std::cmp::Ordering;

use rand::RngCore;

use crate::core::{Bounds, Solution, Variable};
use crate::engine::{Replacement, SearchPolicy};
use crate::error::ConfigError;
use crate::operators::{CrossoverOperator, DifferentialCrossover, DifferentialSelection};
use crate::ranking::single_objective_compare;

/// Search policy of differential evolution, rand/1/bin scheme.
///
/// Builds one trial vector per population slot from three distinct donors
/// plus the slot's occupant, then keeps whichever of the two wins the
/// slot. Ties go to the trial.
pub struct DePolicy<T: Variable> {
    selection: DifferentialSelection,
    crossover: DifferentialCrossover,
    bounds: Bounds<T>,
    best: Option<Solution<T>>,
}

impl<T: Variable> DePolicy<T> {
    pub(crate) fn new(crossover: DifferentialCrossover, bounds: Bounds<T>) -> Self {
        Self {
            selection: DifferentialSelection::new(3),
            crossover,
            bounds,
            best: None,
        }
    }
}

impl<T: Variable> SearchPolicy<T> for DePolicy<T> {
    fn after_initialisation(&mut self, population: &mut [Solution<T>], _rng: &mut dyn RngCore) {
        self.best = population
            .iter()
            .min_by(|a, b| single_objective_compare(a, b))
            .cloned();
    }

    fn offspring(
        &mut self,
        population: &[Solution<T>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution<T>>, ConfigError> {
        let mut trials = Vec::with_capacity(population.len());
        for target in 0..population.len() {
            let donors = self.selection.execute(population.len(), target, rng)?;
            let parents = vec![
                population[donors[0]].clone(),
                population[donors[1]].clone(),
                population[donors[2]].clone(),
                population[target].clone(),
            ];
            trials.extend(self.crossover.execute(&parents, &self.bounds, rng)?);
        }
        Ok(trials)
    }

    fn replace(&mut self, parents: Vec<Solution<T>>, offspring: Vec<Solution<T>>) -> Replacement<T> {
        let mut next = parents;
        for (slot, trial) in next.iter_mut().zip(offspring) {
            if single_objective_compare(&trial, slot) != Ordering::Greater {
                *slot = trial;
            }
        }

        let challenger = next
            .iter()
            .min_by(|a, b| single_objective_compare(a, b))
            .cloned();
        let improved = match (self.best.as_ref(), challenger.as_ref()) {
            (Some(best), Some(candidate)) => {
                single_objective_compare(candidate, best) == Ordering::Less
            }
            (None, Some(_)) => true,
            _ => false,
        };
        if improved {
            self.best = challenger;
        }
        Replacement {
            population: next,
            improved,
        }
    }

    fn result(&self, population: &[Solution<T>]) -> Vec<Solution<T>> {
        population
            .iter()
            .min_by(|a, b| single_objective_compare(a, b))
            .cloned()
            .into_iter()
            .collect()
    }
}
