//! Strength-Pareto fitness and environmental selection.

use std::cmp::Ordering;

use rand::RngCore;

use crate::core::{attr, Bounds, Solution, Variable};
use crate::engine::{Replacement, SearchPolicy};
use crate::error::ConfigError;
use crate::operators::{
    CrossoverOperator, MutationOperator, SelectionOperator, TournamentSelection,
};
use crate::ranking::{dominance_compare, non_dominated_subset};

fn objective_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn strength_fitness<T: Variable>(solution: &Solution<T>) -> f64 {
    solution
        .attribute(attr::STRENGTH_FITNESS)
        .unwrap_or(f64::INFINITY)
}

/// Orders by strength fitness, lower is better.
pub(crate) fn strength_fitness_compare<T: Variable>(
    a: &Solution<T>,
    b: &Solution<T>,
) -> Ordering {
    strength_fitness(a).total_cmp(&strength_fitness(b))
}

/// Writes the SPEA2 fitness `F = R + D` into every member of `union`.
///
/// `R` sums the strengths of a member's dominators, so non-dominated
/// members end up with `F < 1`. `D` is a density estimate from the
/// distance to the k-th nearest neighbor with `k = sqrt(|union|)`.
pub(crate) fn assign_strength_fitness<T: Variable>(union: &mut [Solution<T>]) {
    let n = union.len();
    let mut strength = vec![0usize; n];
    for i in 0..n {
        for j in 0..n {
            if i != j && dominance_compare(&union[i], &union[j]) == Ordering::Less {
                strength[i] += 1;
            }
        }
    }
    let k = ((n as f64).sqrt() as usize).max(1);
    for i in 0..n {
        let mut raw = 0.0;
        for j in 0..n {
            if i != j && dominance_compare(&union[j], &union[i]) == Ordering::Less {
                raw += strength[j] as f64;
            }
        }
        let mut distances: Vec<f64> = (0..n)
            .filter(|&j| j != i)
            .map(|j| objective_distance(union[i].objectives(), union[j].objectives()))
            .collect();
        distances.sort_by(f64::total_cmp);
        let sigma = match distances.len() {
            0 => 0.0,
            len => distances[(k - 1).min(len - 1)],
        };
        union[i].set_attribute(attr::STRENGTH_FITNESS, raw + 1.0 / (sigma + 2.0));
    }
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Removes the most crowded member until `members` fits `capacity`.
///
/// Crowding is judged lexicographically over each member's sorted
/// neighbor-distance list, so a member tied on its nearest neighbor loses
/// on the second-nearest, and so on.
fn truncate_by_nearest_neighbor<T: Variable>(
    mut members: Vec<Solution<T>>,
    capacity: usize,
) -> Vec<Solution<T>> {
    while members.len() > capacity {
        let n = members.len();
        let sorted_distances: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let mut row: Vec<f64> = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| objective_distance(members[i].objectives(), members[j].objectives()))
                    .collect();
                row.sort_by(f64::total_cmp);
                row
            })
            .collect();
        let most_crowded = (0..n)
            .min_by(|&a, &b| lexicographic(&sorted_distances[a], &sorted_distances[b]))
            .expect("truncation set cannot be empty");
        members.remove(most_crowded);
    }
    members
}

/// Selects the next archive from a fitness-annotated union.
///
/// All members with `F < 1` enter; an overfull archive is truncated by
/// nearest-neighbor crowding, an underfull one is topped up with the best
/// dominated members.
pub(crate) fn environmental_selection<T: Variable>(
    union: Vec<Solution<T>>,
    capacity: usize,
) -> Vec<Solution<T>> {
    let (mut next, mut dominated): (Vec<_>, Vec<_>) = union
        .into_iter()
        .partition(|s| strength_fitness(s) < 1.0);
    if next.len() > capacity {
        next = truncate_by_nearest_neighbor(next, capacity);
    } else if next.len() < capacity {
        dominated.sort_by(|a, b| strength_fitness_compare(a, b));
        let room = capacity - next.len();
        next.extend(dominated.into_iter().take(room));
    }
    next
}

/// Search policy of SPEA2.
///
/// The population regenerates wholesale each generation; continuity lives
/// in the bounded archive, refreshed by environmental selection over the
/// offspring/archive union.
pub struct Spea2Policy<T: Variable> {
    selection: TournamentSelection<T>,
    crossover: Box<dyn CrossoverOperator<T>>,
    mutation: Box<dyn MutationOperator<T>>,
    bounds: Bounds<T>,
    archive: Vec<Solution<T>>,
    archive_capacity: usize,
}

impl<T: Variable> Spea2Policy<T> {
    pub(crate) fn new(
        crossover: Box<dyn CrossoverOperator<T>>,
        mutation: Box<dyn MutationOperator<T>>,
        bounds: Bounds<T>,
        archive_capacity: usize,
    ) -> Result<Self, ConfigError> {
        if archive_capacity == 0 {
            return Err(ConfigError::ArchiveCapacity);
        }
        Ok(Self {
            selection: TournamentSelection::new(2, strength_fitness_compare)?,
            crossover,
            mutation,
            bounds,
            archive: Vec::new(),
            archive_capacity,
        })
    }

    pub fn archive(&self) -> &[Solution<T>] {
        &self.archive
    }

    fn refresh_archive(&mut self, mut union: Vec<Solution<T>>) {
        assign_strength_fitness(&mut union);
        self.archive = environmental_selection(union, self.archive_capacity);
    }
}

impl<T: Variable> SearchPolicy<T> for Spea2Policy<T> {
    fn after_initialisation(&mut self, population: &mut [Solution<T>], _rng: &mut dyn RngCore) {
        self.refresh_archive(population.to_vec());
    }

    fn offspring(
        &mut self,
        population: &[Solution<T>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution<T>>, ConfigError> {
        let wanted = population.len();
        let required = self.crossover.number_of_required_parents();
        if wanted % required != 0 {
            return Err(ConfigError::MatingPool {
                pool: wanted,
                required,
            });
        }
        let mut pool: Vec<Solution<T>> = Vec::with_capacity(wanted);
        for _ in 0..wanted {
            pool.push(self.selection.execute(&self.archive, rng)?.clone());
        }
        let mut offspring = Vec::with_capacity(wanted);
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
        _parents: Vec<Solution<T>>,
        offspring: Vec<Solution<T>>,
    ) -> Replacement<T> {
        let mut union = offspring.clone();
        union.extend(self.archive.iter().cloned());
        self.refresh_archive(union);
        Replacement {
            population: offspring,
            improved: true,
        }
    }

    fn result(&self, _population: &[Solution<T>]) -> Vec<Solution<T>> {
        non_dominated_subset(&self.archive)
    }
}
