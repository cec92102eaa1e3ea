//! Ranking-and-crowding search policy.

use rand::RngCore;

use crate::core::{attr, Bounds, Solution, Variable};
use crate::engine::{Replacement, SearchPolicy};
use crate::error::ConfigError;
use crate::operators::{
    CrossoverOperator, MutationOperator, SelectionOperator, TournamentSelection,
};
use crate::ranking::{crowded_compare, non_dominated_subset, rank_and_crowd};

/// Search policy of NSGA-II.
///
/// Parents are drawn by binary tournament under the crowded comparator.
/// Replacement ranks the joint parent/offspring population, fills the next
/// population front by front, and truncates the first overflowing front by
/// descending crowding distance. The ranking attributes written during
/// replacement are the ones the next generation's tournaments read.
pub struct Nsga2Policy<T: Variable> {
    selection: TournamentSelection<T>,
    crossover: Box<dyn CrossoverOperator<T>>,
    mutation: Box<dyn MutationOperator<T>>,
    bounds: Bounds<T>,
}

impl<T: Variable> Nsga2Policy<T> {
    pub(crate) fn new(
        crossover: Box<dyn CrossoverOperator<T>>,
        mutation: Box<dyn MutationOperator<T>>,
        bounds: Bounds<T>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            selection: TournamentSelection::new(2, crowded_compare)?,
            crossover,
            mutation,
            bounds,
        })
    }
}

/// Fills the next population of `size` from the ranked `joint` population.
fn rank_then_truncate<T: Variable>(mut joint: Vec<Solution<T>>, size: usize) -> Vec<Solution<T>> {
    let ranking = rank_and_crowd(&mut joint);
    let mut next = Vec::with_capacity(size);
    for front in ranking.fronts {
        if next.len() + front.len() <= size {
            next.extend(front.iter().map(|&i| joint[i].clone()));
        } else {
            let mut overflow = front;
            overflow.sort_by(|&a, &b| {
                let da = joint[a].attribute(attr::CROWDING_DISTANCE).unwrap_or(0.0);
                let db = joint[b].attribute(attr::CROWDING_DISTANCE).unwrap_or(0.0);
                db.total_cmp(&da)
            });
            let room = size - next.len();
            next.extend(overflow.iter().take(room).map(|&i| joint[i].clone()));
        }
        if next.len() == size {
            break;
        }
    }
    next
}

impl<T: Variable> SearchPolicy<T> for Nsga2Policy<T> {
    fn after_initialisation(&mut self, population: &mut [Solution<T>], _rng: &mut dyn RngCore) {
        // the first generation's tournaments need ranks and crowding
        rank_and_crowd(population);
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
        parents: Vec<Solution<T>>,
        offspring: Vec<Solution<T>>,
    ) -> Replacement<T> {
        let size = parents.len();
        let mut joint = parents;
        joint.extend(offspring);
        Replacement {
            population: rank_then_truncate(joint, size),
            improved: true,
        }
    }

    fn result(&self, population: &[Solution<T>]) -> Vec<Solution<T>> {
        non_dominated_subset(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bounds, Problem};
    use crate::engine::Algorithm;
    use crate::error::EvaluationError;
    use crate::nsga2::Nsga2Config;
    use crate::ranking::pareto_compare;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::cmp::Ordering;

    fn policy() -> Nsga2Policy<f64> {
        let crossover = crate::operators::CrossoverSpec::Sbx {
            probability: 0.9,
            distribution_index: 20.0,
        };
        let mutation = crate::operators::MutationSpec::Polynomial {
            probability: Some(0.5),
            distribution_index: 20.0,
        };
        Nsga2Policy::new(
            crossover.build().unwrap(),
            mutation.build(1).unwrap(),
            Bounds::uniform(1, 0.0, 1.0).unwrap(),
        )
        .unwrap()
    }

    fn point(f1: f64, f2: f64) -> Solution<f64> {
        let mut s = Solution::new(vec![f1], 2, 0);
        s.objectives_mut().copy_from_slice(&[f1, f2]);
        s
    }

    // ---- Replacement invariants ----

    #[test]
    fn replacement_always_restores_the_population_size() {
        let mut p = policy();
        let mut rng = StdRng::seed_from_u64(31);
        for size in [2, 4, 10] {
            let parents: Vec<_> = (0..size)
                .map(|_| point(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
                .collect();
            let offspring: Vec<_> = (0..size)
                .map(|_| point(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
                .collect();
            let replacement = p.replace(parents, offspring);
            assert_eq!(replacement.population.len(), size);
        }
    }

    #[test]
    fn replacement_keeps_lower_ranks_first() {
        let mut p = policy();
        // two non-dominated parents, two dominated offspring
        let parents = vec![point(0.0, 1.0), point(1.0, 0.0)];
        let offspring = vec![point(2.0, 2.0), point(3.0, 3.0)];
        let replacement = p.replace(parents, offspring);
        let objectives: Vec<f64> = replacement
            .population
            .iter()
            .map(|s| s.objectives()[0])
            .collect();
        assert!(objectives.contains(&0.0));
        assert!(objectives.contains(&1.0));
        assert!(!objectives.contains(&3.0));
    }

    #[test]
    fn overflowing_front_is_truncated_by_crowding() {
        // one front of six trade-off points, room for four
        let xs = [0.0, 0.2, 0.25, 0.5, 0.75, 1.0];
        let joint: Vec<_> = xs.iter().map(|&x| point(x, 1.0 - x)).collect();
        let next = rank_then_truncate(joint, 4);
        let mut kept: Vec<f64> = next.iter().map(|s| s.objectives()[0]).collect();
        kept.sort_by(f64::total_cmp);
        // boundaries survive, the densest pair (0.2, 0.25) is dropped
        assert_eq!(kept, vec![0.0, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn initialisation_writes_ranking_attributes() {
        let mut p = policy();
        let mut population = vec![point(0.0, 1.0), point(1.0, 0.0), point(2.0, 2.0)];
        let mut rng = StdRng::seed_from_u64(32);
        p.after_initialisation(&mut population, &mut rng);
        assert_eq!(population[0].attribute(attr::RANK), Some(0.0));
        assert_eq!(population[2].attribute(attr::RANK), Some(1.0));
        assert!(population
            .iter()
            .all(|s| s.attribute(attr::CROWDING_DISTANCE).is_some()));
    }

    // ---- Full run ----

    struct Schaffer {
        bounds: Bounds<f64>,
    }

    impl Problem for Schaffer {
        type Var = f64;

        fn name(&self) -> &str {
            "schaffer"
        }

        fn bounds(&self) -> &Bounds<f64> {
            &self.bounds
        }

        fn number_of_objectives(&self) -> usize {
            2
        }

        fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), EvaluationError> {
            let x = solution.variables()[0];
            solution.objectives_mut()[0] = x * x;
            solution.objectives_mut()[1] = (x - 2.0) * (x - 2.0);
            Ok(())
        }
    }

    #[test]
    fn nsga2_approximates_the_schaffer_front() {
        let problem = Schaffer {
            bounds: Bounds::uniform(1, -5.0, 10.0).unwrap(),
        };
        let mut algorithm = Nsga2Config::default()
            .with_population_size(20)
            .with_max_evaluations(1000)
            .with_seed(8)
            .build(problem)
            .unwrap();
        algorithm.run().unwrap();
        let front = algorithm.result();
        assert!(!front.is_empty());
        for a in &front {
            for b in &front {
                assert_ne!(
                    pareto_compare(a.objectives(), b.objectives()),
                    Ordering::Greater,
                    "reported front contains a dominated point"
                );
            }
        }
        // the true front has f1 + f2 between 2 and 4
        assert!(front
            .iter()
            .all(|s| s.objectives()[0] + s.objectives()[1] < 8.0));
    }
}
