//! Population evaluation strategies.

use rayon::prelude::*;

use crate::core::problem::Problem;
use crate::core::solution::Solution;
use crate::error::EvaluationError;

/// Strategy for evaluating a population against a problem.
///
/// Decoupled from the engine so a host can substitute its own distribution
/// scheme without touching algorithm logic. Returns the number of solutions
/// evaluated so the engine can advance its evaluation budget.
pub trait SolutionListEvaluator<P: Problem>: Send {
    /// Evaluates every solution in `population` and refreshes each
    /// solution's constraint summary.
    fn evaluate(
        &self,
        population: &mut [Solution<P::Var>],
        problem: &P,
    ) -> Result<usize, EvaluationError>;
}

/// Evaluates solutions one at a time, in order.
///
/// The first failure aborts the batch immediately and is returned as-is;
/// solutions after the failing one stay unevaluated. This is the only
/// strategy safe for problems whose external resource is stateful.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEvaluator;

impl<P: Problem> SolutionListEvaluator<P> for SequentialEvaluator {
    fn evaluate(
        &self,
        population: &mut [Solution<P::Var>],
        problem: &P,
    ) -> Result<usize, EvaluationError> {
        for solution in population.iter_mut() {
            problem.evaluate(solution)?;
            solution.refresh_constraint_summary();
        }
        Ok(population.len())
    }
}

/// Fans one batch out across the rayon thread pool.
///
/// All evaluations of a batch complete (fan-in) before the engine moves to
/// the next generation. Requires `Problem::evaluate` to tolerate concurrent
/// calls: a stateless evaluator, or one that synchronizes internally. When
/// several evaluations fail, one of the failures is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelEvaluator;

impl<P: Problem> SolutionListEvaluator<P> for ParallelEvaluator {
    fn evaluate(
        &self,
        population: &mut [Solution<P::Var>],
        problem: &P,
    ) -> Result<usize, EvaluationError> {
        let count = population.len();
        population.par_iter_mut().try_for_each(|solution| {
            problem.evaluate(solution)?;
            solution.refresh_constraint_summary();
            Ok::<(), EvaluationError>(())
        })?;
        Ok(count)
    }
}

/// Picks the evaluator matching a config's `parallel` flag.
pub fn evaluator_for<P: Problem>(parallel: bool) -> Box<dyn SolutionListEvaluator<P>> {
    if parallel {
        Box::new(ParallelEvaluator)
    } else {
        Box::new(SequentialEvaluator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::problem::Bounds;
    use crate::core::solution::attr;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct HeadLoss {
        bounds: Bounds<f64>,
        // diameters below this fail the solver
        fail_below: f64,
    }

    impl HeadLoss {
        fn new(fail_below: f64) -> Self {
            Self {
                bounds: Bounds::uniform(2, 0.0, 1.0).unwrap(),
                fail_below,
            }
        }
    }

    impl Problem for HeadLoss {
        type Var = f64;

        fn name(&self) -> &str {
            "head-loss"
        }

        fn bounds(&self) -> &Bounds<f64> {
            &self.bounds
        }

        fn number_of_objectives(&self) -> usize {
            1
        }

        fn number_of_constraints(&self) -> usize {
            1
        }

        fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), EvaluationError> {
            let sum: f64 = solution.variables().iter().sum();
            if sum < self.fail_below {
                return Err(EvaluationError::new("hydraulic solver diverged"));
            }
            solution.objectives_mut()[0] = sum;
            solution.constraints_mut()[0] = sum - 0.5;
            Ok(())
        }
    }

    fn population(values: &[[f64; 2]]) -> Vec<Solution<f64>> {
        values
            .iter()
            .map(|v| Solution::new(v.to_vec(), 1, 1))
            .collect()
    }

    // ---- SequentialEvaluator ----

    #[test]
    fn sequential_evaluates_all_and_reports_the_count() {
        let problem = HeadLoss::new(-1.0);
        let mut pop = population(&[[0.1, 0.2], [0.3, 0.4]]);
        let count = SequentialEvaluator.evaluate(&mut pop, &problem).unwrap();
        assert_eq!(count, 2);
        assert!(pop.iter().all(|s| s.is_evaluated()));
    }

    #[test]
    fn sequential_writes_the_constraint_summary() {
        let problem = HeadLoss::new(-1.0);
        let mut pop = population(&[[0.1, 0.1]]);
        SequentialEvaluator.evaluate(&mut pop, &problem).unwrap();
        // constraint = 0.2 - 0.5 = -0.3
        assert!((pop[0].overall_constraint_violation() + 0.3).abs() < 1e-12);
        assert_eq!(pop[0].attribute(attr::VIOLATED_CONSTRAINTS), Some(1.0));
    }

    #[test]
    fn sequential_aborts_the_batch_on_first_failure() {
        let problem = HeadLoss::new(0.5);
        let mut pop = population(&[[0.4, 0.4], [0.1, 0.1], [0.4, 0.4]]);
        let err = SequentialEvaluator.evaluate(&mut pop, &problem).unwrap_err();
        assert_eq!(err, EvaluationError::new("hydraulic solver diverged"));
        assert!(pop[0].is_evaluated());
        assert!(!pop[1].is_evaluated());
        // the batch stopped: the third solution was never touched
        assert!(!pop[2].is_evaluated());
    }

    // ---- ParallelEvaluator ----

    #[test]
    fn parallel_evaluates_the_whole_batch() {
        let problem = HeadLoss::new(-1.0);
        let mut pop = population(&[[0.1, 0.2], [0.3, 0.4], [0.5, 0.6], [0.7, 0.8]]);
        let count = ParallelEvaluator.evaluate(&mut pop, &problem).unwrap();
        assert_eq!(count, 4);
        assert!(pop.iter().all(|s| s.is_evaluated()));
    }

    #[test]
    fn parallel_surfaces_a_failure() {
        let problem = HeadLoss::new(0.5);
        let mut pop = population(&[[0.4, 0.4], [0.1, 0.1]]);
        let err = ParallelEvaluator.evaluate(&mut pop, &problem).unwrap_err();
        assert_eq!(err, EvaluationError::new("hydraulic solver diverged"));
    }

    // ---- evaluator_for ----

    #[test]
    fn evaluator_for_honours_the_flag() {
        let problem = HeadLoss::new(-1.0);
        let mut rng = StdRng::seed_from_u64(4);
        for parallel in [false, true] {
            let evaluator = evaluator_for::<HeadLoss>(parallel);
            let mut pop = vec![problem.create_solution(&mut rng)];
            assert_eq!(evaluator.evaluate(&mut pop, &problem).unwrap(), 1);
            assert!(pop[0].is_evaluated());
        }
    }
}
