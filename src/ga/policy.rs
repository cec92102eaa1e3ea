//! Elitist generational replacement for the GA.

use std::cmp::Ordering;

use rand::RngCore;

use crate::core::{Bounds, Solution, Variable};
use crate::engine::{Replacement, SearchPolicy};
use crate::error::ConfigError;
use crate::operators::{CrossoverOperator, MutationOperator, SelectionOperator};
use crate::ranking::single_objective_compare;

/// Search policy of the single-objective GA.
///
/// Selects a full-size mating pool, mates it in parent groups, mutates
/// every child, then replaces generationally with clones of the two best
/// parents re-inserted before sorting and truncating to the population
/// size. The double elite copy is long-standing behavior of this
/// replacement and is covered by a characterization test below.
pub struct GaPolicy<T: Variable> {
    selection: Box<dyn SelectionOperator<T>>,
    crossover: Box<dyn CrossoverOperator<T>>,
    mutation: Box<dyn MutationOperator<T>>,
    bounds: Bounds<T>,
    best: Option<Solution<T>>,
}

impl<T: Variable> GaPolicy<T> {
    pub(crate) fn new(
        selection: Box<dyn SelectionOperator<T>>,
        crossover: Box<dyn CrossoverOperator<T>>,
        mutation: Box<dyn MutationOperator<T>>,
        bounds: Bounds<T>,
    ) -> Self {
        Self {
            selection,
            crossover,
            mutation,
            bounds,
            best: None,
        }
    }
}

impl<T: Variable> SearchPolicy<T> for GaPolicy<T> {
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
        let required = self.crossover.number_of_required_parents();
        if population.len() % required != 0 {
            return Err(ConfigError::MatingPool {
                pool: population.len(),
                required,
            });
        }
        let mut pool: Vec<Solution<T>> = Vec::with_capacity(population.len());
        for _ in 0..population.len() {
            pool.push(self.selection.execute(population, rng)?.clone());
        }
        let mut offspring = Vec::with_capacity(population.len());
        for parents in pool.chunks(required) {
            let mut children = self.crossover.execute(parents, &self.bounds, rng)?;
            for child in &mut children {
                self.mutation.execute(child, &self.bounds, rng);
            }
            offspring.append(&mut children);
        }
        Ok(offspring)
    }

    fn replace(
        &mut self,
        mut parents: Vec<Solution<T>>,
        offspring: Vec<Solution<T>>,
    ) -> Replacement<T> {
        let size = parents.len();
        parents.sort_by(|a, b| single_objective_compare(a, b));
        let mut next = offspring;
        next.extend(parents.iter().take(2).cloned());
        next.sort_by(|a, b| single_objective_compare(a, b));
        next.truncate(size);

        let improved = match (self.best.as_ref(), next.first()) {
            (Some(best), Some(candidate)) => {
                single_objective_compare(candidate, best) == Ordering::Less
            }
            (None, Some(_)) => true,
            _ => false,
        };
        if improved {
            self.best = next.first().cloned();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Problem;
    use crate::engine::Algorithm;
    use crate::error::EvaluationError;
    use crate::ga::GaConfig;
    use crate::operators::{
        MutationSpec, SimpleRandomMutation, SinglePointCrossover, TournamentSelection,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn policy() -> GaPolicy<f64> {
        GaPolicy::new(
            Box::new(TournamentSelection::new(2, single_objective_compare).unwrap()),
            Box::new(SinglePointCrossover::new(0.9).unwrap()),
            Box::new(SimpleRandomMutation::new(0.25).unwrap()),
            Bounds::uniform(2, 0.0, 1.0).unwrap(),
        )
    }

    fn evaluated(objective: f64) -> Solution<f64> {
        let mut s = Solution::new(vec![0.5, 0.5], 1, 0);
        s.objectives_mut()[0] = objective;
        s
    }

    // ---- Offspring ----

    #[test]
    fn offspring_matches_the_population_size() {
        let mut p = policy();
        let population: Vec<_> = [0.4, 0.1, 0.3, 0.2].map(evaluated).into();
        let mut rng = StdRng::seed_from_u64(21);
        let offspring = p.offspring(&population, &mut rng).unwrap();
        assert_eq!(offspring.len(), 4);
        assert!(offspring.iter().all(|s| !s.is_evaluated()));
        assert!(offspring
            .iter()
            .all(|s| s.variables().iter().all(|v| (0.0..=1.0).contains(v))));
    }

    #[test]
    fn offspring_rejects_an_odd_pool() {
        let mut p = policy();
        let population: Vec<_> = [0.4, 0.1, 0.3].map(evaluated).into();
        let mut rng = StdRng::seed_from_u64(22);
        assert_eq!(
            p.offspring(&population, &mut rng).unwrap_err(),
            ConfigError::MatingPool {
                pool: 3,
                required: 2
            }
        );
    }

    // ---- Replacement ----

    #[test]
    fn replacement_reinserts_the_two_best_parents() {
        let mut p = policy();
        let parents: Vec<_> = [5.0, 1.0, 3.0, 2.0, 4.0, 6.0].map(evaluated).into();
        let offspring: Vec<_> = [10.0; 6].map(evaluated).into();
        let replacement = p.replace(parents, offspring);
        assert_eq!(replacement.population.len(), 6);
        assert_eq!(replacement.population[0].objectives()[0], 1.0);
        assert_eq!(replacement.population[1].objectives()[0], 2.0);
        assert_eq!(replacement.population[2].objectives()[0], 10.0);
    }

    #[test]
    fn replacement_keeps_a_better_child() {
        let mut p = policy();
        let parents: Vec<_> = [5.0, 1.0].map(evaluated).into();
        let offspring: Vec<_> = [0.5, 9.0].map(evaluated).into();
        let replacement = p.replace(parents, offspring);
        assert_eq!(replacement.population[0].objectives()[0], 0.5);
        assert_eq!(replacement.population[1].objectives()[0], 1.0);
    }

    #[test]
    fn improvement_flag_requires_a_strictly_better_best() {
        let mut p = policy();
        let mut parents: Vec<_> = [1.0, 3.0].map(evaluated).into();
        let mut rng = StdRng::seed_from_u64(23);
        p.after_initialisation(&mut parents, &mut rng);

        let flat = p.replace(parents.clone(), [10.0, 10.0].map(evaluated).into());
        assert!(!flat.improved);

        let better = p.replace(parents, [0.25, 10.0].map(evaluated).into());
        assert!(better.improved);
    }

    // ---- Full runs ----

    struct Sphere {
        bounds: Bounds<f64>,
    }

    impl Problem for Sphere {
        type Var = f64;

        fn name(&self) -> &str {
            "sphere"
        }

        fn bounds(&self) -> &Bounds<f64> {
            &self.bounds
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), EvaluationError> {
            solution.objectives_mut()[0] = solution.variables().iter().map(|x| x * x).sum();
            Ok(())
        }
    }

    #[test]
    fn ga_converges_on_the_sphere() {
        let problem = Sphere {
            bounds: Bounds::uniform(4, -1.0, 1.0).unwrap(),
        };
        let mut algorithm = GaConfig::default()
            .with_population_size(40)
            .with_max_evaluations(4000)
            .with_mutation(MutationSpec::RangeRandom {
                probability: None,
                window: 0.1,
            })
            .with_seed(3)
            .build(problem)
            .unwrap();
        algorithm.run().unwrap();
        let result = algorithm.result();
        assert_eq!(result.len(), 1);
        assert!(
            result[0].objectives()[0] < 0.5,
            "expected convergence below 0.5, got {}",
            result[0].objectives()[0]
        );
    }

    #[test]
    fn elitism_makes_the_best_monotone() {
        let problem = Sphere {
            bounds: Bounds::uniform(3, -1.0, 1.0).unwrap(),
        };
        let mut algorithm = GaConfig::default()
            .with_population_size(20)
            .with_max_evaluations(600)
            .with_seed(4)
            .build(problem)
            .unwrap();
        let mut bests = Vec::new();
        while !algorithm.stopping_condition_reached() {
            algorithm.run_single_step().unwrap();
            bests.push(algorithm.result()[0].objectives()[0]);
        }
        for pair in bests.windows(2) {
            assert!(pair[1] <= pair[0], "best regressed: {} > {}", pair[1], pair[0]);
        }
    }

    struct Flat {
        bounds: Bounds<f64>,
    }

    impl Problem for Flat {
        type Var = f64;

        fn name(&self) -> &str {
            "flat"
        }

        fn bounds(&self) -> &Bounds<f64> {
            &self.bounds
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), EvaluationError> {
            solution.objectives_mut()[0] = 7.0;
            Ok(())
        }
    }

    #[test]
    fn flat_landscape_trips_the_stagnation_limit() {
        let problem = Flat {
            bounds: Bounds::uniform(2, 0.0, 1.0).unwrap(),
        };
        let mut algorithm = GaConfig::default()
            .with_population_size(10)
            .with_stagnation_limit(5)
            .with_seed(5)
            .build(problem)
            .unwrap();
        algorithm.run().unwrap();
        assert_eq!(algorithm.generation(), 5);
    }

    struct IntSphere {
        bounds: Bounds<i32>,
    }

    impl Problem for IntSphere {
        type Var = i32;

        fn name(&self) -> &str {
            "int-sphere"
        }

        fn bounds(&self) -> &Bounds<i32> {
            &self.bounds
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn evaluate(&self, solution: &mut Solution<i32>) -> Result<(), EvaluationError> {
            solution.objectives_mut()[0] = solution
                .variables()
                .iter()
                .map(|x| f64::from(*x).powi(2))
                .sum();
            Ok(())
        }
    }

    #[test]
    fn ga_handles_integer_variables() {
        let problem = IntSphere {
            bounds: Bounds::uniform(4, -10, 10).unwrap(),
        };
        let mut algorithm = GaConfig::default()
            .with_population_size(40)
            .with_max_evaluations(4000)
            .with_seed(6)
            .build(problem)
            .unwrap();
        algorithm.run().unwrap();
        let best = &algorithm.result()[0];
        assert!(best.variables().iter().all(|v| (-10..=10).contains(v)));
        assert!(
            best.objectives()[0] < 100.0,
            "expected clear improvement, got {}",
            best.objectives()[0]
        );
    }
}
