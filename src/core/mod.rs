//! Solution, problem, and evaluation contracts.
//!
//! Everything an algorithm variant touches goes through these types: the
//! [`Variable`] scalar contract, deep-copy [`Solution`]s with a side-channel
//! attribute map, validated [`Bounds`], the [`Problem`] trait wrapping the
//! external simulator, and the pluggable [`SolutionListEvaluator`]
//! strategies.

mod evaluator;
mod problem;
mod solution;

pub use evaluator::{evaluator_for, ParallelEvaluator, SequentialEvaluator, SolutionListEvaluator};
pub use problem::{Bounds, Problem};
pub use solution::{attr, Solution, Variable};
