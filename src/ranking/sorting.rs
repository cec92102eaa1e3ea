//! Fast non-dominated sorting and crowding distance.
//!
//! References:
//! - Deb, Pratap, Agarwal, Meyarivan: "A fast and elitist multiobjective
//!   genetic algorithm: NSGA-II" (2002)

use std::cmp::Ordering;

use crate::core::{attr, Solution, Variable};
use crate::ranking::dominance::dominance_compare;

/// Front decomposition produced by [`non_dominated_sort`].
#[derive(Debug, Clone)]
pub struct Ranking {
    /// Non-domination rank per solution (0 = Pareto front).
    pub ranks: Vec<usize>,
    /// Solution indices grouped by front; `fronts[0]` holds rank-0 indices.
    pub fronts: Vec<Vec<usize>>,
}

/// Decomposes a population into fronts of equal non-domination rank.
///
/// Front 0 is the set of solutions no other solution dominates; front k+1
/// is what remains non-dominated once fronts 0..=k are removed. Every
/// solution lands in exactly one front. Dominance is feasibility-aware via
/// [`dominance_compare`](crate::ranking::dominance_compare).
///
/// Panics on an empty population.
pub fn non_dominated_sort<T: Variable>(population: &[Solution<T>]) -> Ranking {
    let n = population.len();
    assert!(n > 0, "population must not be empty");

    // domination_count[i]: how many solutions dominate i
    // dominated_by[i]: indices i dominates
    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_compare(&population[i], &population[j]) {
                Ordering::Less => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Ordering::Greater => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Ordering::Equal => {}
            }
        }
    }

    let mut ranks = vec![0usize; n];
    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    let mut rank = 0;
    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            ranks[i] = rank;
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next.push(j);
                }
            }
        }
        fronts.push(current);
        current = next;
        rank += 1;
    }

    Ranking { ranks, fronts }
}

/// Crowding distance of each member of a single front.
///
/// Fronts of one or two solutions are all boundaries and get infinite
/// distance. Interior solutions accumulate per-objective neighbour gaps
/// normalized by the objective's range; objectives with zero range
/// contribute nothing.
pub fn crowding_distance<T: Variable>(front: &[Solution<T>]) -> Vec<f64> {
    let objectives: Vec<&[f64]> = front.iter().map(|s| s.objectives()).collect();
    crowding_of(&objectives)
}

fn crowding_of(objectives: &[&[f64]]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];
    for obj in 0..m {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| objectives[a][obj].total_cmp(&objectives[b][obj]));

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let range = objectives[order[n - 1]][obj] - objectives[order[0]][obj];
        if range > 0.0 {
            for i in 1..(n - 1) {
                let gap = objectives[order[i + 1]][obj] - objectives[order[i - 1]][obj];
                distances[order[i]] += gap / range;
            }
        }
    }
    distances
}

/// Sorts the population into fronts and writes the rank and per-front
/// crowding distance into each solution's attributes.
pub fn rank_and_crowd<T: Variable>(population: &mut [Solution<T>]) -> Ranking {
    let ranking = non_dominated_sort(population);
    for (i, &rank) in ranking.ranks.iter().enumerate() {
        population[i].set_attribute(attr::RANK, rank as f64);
    }
    for front in &ranking.fronts {
        let distances = {
            let objectives: Vec<&[f64]> =
                front.iter().map(|&i| population[i].objectives()).collect();
            crowding_of(&objectives)
        };
        for (&i, distance) in front.iter().zip(distances) {
            population[i].set_attribute(attr::CROWDING_DISTANCE, distance);
        }
    }
    ranking
}

/// Clones every solution not dominated by another member.
///
/// Mutually equal duplicates are all retained. An empty input yields an
/// empty subset.
pub fn non_dominated_subset<T: Variable>(population: &[Solution<T>]) -> Vec<Solution<T>> {
    population
        .iter()
        .enumerate()
        .filter(|&(i, candidate)| {
            !population
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && dominance_compare(other, candidate) == Ordering::Less)
        })
        .map(|(_, s)| s.clone())
        .collect()
}
