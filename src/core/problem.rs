//! Problem contract and search-space bounds.

use rand::RngCore;

use crate::core::solution::{Solution, Variable};
use crate::error::{ConfigError, EvaluationError};

/// Validated per-variable search-space bounds.
///
/// Construction fails unless `lower(i) < upper(i)` holds strictly for every
/// index, so downstream code never re-checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds<T: Variable> {
    lower: Vec<T>,
    upper: Vec<T>,
}

impl<T: Variable> Bounds<T> {
    pub fn new(lower: Vec<T>, upper: Vec<T>) -> Result<Self, ConfigError> {
        if lower.is_empty() {
            return Err(ConfigError::EmptyBounds);
        }
        if lower.len() != upper.len() {
            return Err(ConfigError::BoundsLength {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        for (index, (lo, hi)) in lower.iter().zip(&upper).enumerate() {
            if lo >= hi {
                return Err(ConfigError::InvalidBound {
                    index,
                    lower: lo.as_f64(),
                    upper: hi.as_f64(),
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Same bound for every variable.
    pub fn uniform(count: usize, lower: T, upper: T) -> Result<Self, ConfigError> {
        Self::new(vec![lower; count], vec![upper; count])
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self, index: usize) -> T {
        self.lower[index]
    }

    pub fn upper(&self, index: usize) -> T {
        self.upper[index]
    }

    /// Repairs a value into the bound at `index`.
    pub fn clamp(&self, index: usize, value: T) -> T {
        value.clamp_to(self.lower[index], self.upper[index])
    }

    /// Draws a uniform sample for the bound at `index`.
    pub fn sample(&self, index: usize, rng: &mut dyn RngCore) -> T {
        T::sample(self.lower[index], self.upper[index], rng)
    }

    /// Width of the bound at `index`, as `f64`.
    pub fn range(&self, index: usize) -> f64 {
        self.upper[index].as_f64() - self.lower[index].as_f64()
    }
}

/// An optimization problem wrapping a (possibly stateful) external
/// evaluator.
///
/// Implementations describe the search space and write objective and
/// constraint values into solutions under evaluation. Objectives are
/// minimized; constraints use the convention that negative values are
/// violations and their magnitudes add up to the overall violation.
///
/// The hydraulic solver behind a water-network problem is typically not
/// reentrant: at most one evaluation may be in flight per problem instance.
/// The sequential evaluation strategy guarantees this; the parallel one
/// requires a stateless or internally synchronized resource.
pub trait Problem: Send + Sync {
    /// Decision-variable scalar type.
    type Var: Variable;

    /// Short identifier used in logs and output paths.
    fn name(&self) -> &str;

    /// Search-space bounds, one entry per decision variable.
    fn bounds(&self) -> &Bounds<Self::Var>;

    fn number_of_variables(&self) -> usize {
        self.bounds().len()
    }

    fn number_of_objectives(&self) -> usize;

    fn number_of_constraints(&self) -> usize {
        0
    }

    fn lower_bound(&self, index: usize) -> Self::Var {
        self.bounds().lower(index)
    }

    fn upper_bound(&self, index: usize) -> Self::Var {
        self.bounds().upper(index)
    }

    /// Creates a solution with variables drawn uniformly from the bounds.
    ///
    /// Objectives stay `NaN` until the solution is evaluated.
    fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<Self::Var> {
        let bounds = self.bounds();
        let variables = (0..bounds.len()).map(|i| bounds.sample(i, rng)).collect();
        Solution::new(
            variables,
            self.number_of_objectives(),
            self.number_of_constraints(),
        )
    }

    /// Evaluates `solution` in place, writing objectives and constraints.
    ///
    /// A failure reported by the external simulator aborts only this
    /// evaluation; the solution keeps its previous contents and no other
    /// solution is affected.
    fn evaluate(&self, solution: &mut Solution<Self::Var>) -> Result<(), EvaluationError>;

    /// Releases the external evaluator resource.
    ///
    /// Called exactly once per run after the owning algorithm finishes. The
    /// default is a no-op for resourceless problems.
    fn close_resources(&mut self) {}
}
