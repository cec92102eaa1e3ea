//! Dominance comparators.
//!
//! All comparators assume minimization and order better solutions as
//! `Ordering::Less`, so an ascending sort puts the best solution first.
//! They are plain functions, usable directly as
//! [`SolutionComparator`](crate::operators::SolutionComparator) values.

use std::cmp::Ordering;

use crate::core::{attr, Solution, Variable};

/// Pareto dominance over raw objective vectors.
///
/// Returns `Less` when `a` dominates `b`: no worse in every objective and
/// strictly better in at least one. `Equal` means mutually non-dominating;
/// two identical vectors in particular are `Equal`. Dominance is never
/// claimed in both directions.
pub fn pareto_compare(a: &[f64], b: &[f64]) -> Ordering {
    debug_assert_eq!(a.len(), b.len(), "objective vectors must have equal length");
    let mut a_better = false;
    let mut b_better = false;
    for (&va, &vb) in a.iter().zip(b) {
        if va < vb {
            a_better = true;
        } else if vb < va {
            b_better = true;
        }
    }
    match (a_better, b_better) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Feasibility-first dominance over solutions.
///
/// A feasible solution beats any infeasible one; two infeasible solutions
/// order by overall constraint violation, closer to zero winning; two
/// feasible solutions fall through to [`pareto_compare`] on objectives.
pub fn dominance_compare<T: Variable>(a: &Solution<T>, b: &Solution<T>) -> Ordering {
    feasibility_compare(a, b).then_with(|| pareto_compare(a.objectives(), b.objectives()))
}

/// Feasibility first, then the first objective. The fitness comparator for
/// single-objective variants.
pub fn single_objective_compare<T: Variable>(a: &Solution<T>, b: &Solution<T>) -> Ordering {
    feasibility_compare(a, b).then_with(|| a.objectives()[0].total_cmp(&b.objectives()[0]))
}

/// Rank ascending, then crowding distance descending.
///
/// Reads the attributes written by
/// [`rank_and_crowd`](crate::ranking::rank_and_crowd); a solution without a
/// rank sorts last.
pub fn crowded_compare<T: Variable>(a: &Solution<T>, b: &Solution<T>) -> Ordering {
    let rank_a = a.attribute(attr::RANK).unwrap_or(f64::INFINITY);
    let rank_b = b.attribute(attr::RANK).unwrap_or(f64::INFINITY);
    rank_a.total_cmp(&rank_b).then_with(|| {
        let crowd_a = a.attribute(attr::CROWDING_DISTANCE).unwrap_or(0.0);
        let crowd_b = b.attribute(attr::CROWDING_DISTANCE).unwrap_or(0.0);
        crowd_b.total_cmp(&crowd_a)
    })
}

fn feasibility_compare<T: Variable>(a: &Solution<T>, b: &Solution<T>) -> Ordering {
    let va = a.overall_constraint_violation();
    let vb = b.overall_constraint_violation();
    match (va < 0.0, vb < 0.0) {
        (true, true) => vb.total_cmp(&va),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => Ordering::Equal,
    }
}
