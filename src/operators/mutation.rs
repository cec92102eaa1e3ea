//! Mutation operators.

use rand::{Rng, RngCore};

use crate::core::{Bounds, Solution, Variable};
use crate::error::ConfigError;
use crate::operators::{distribution_index_valid, probability_in_unit};

/// Perturbs one solution in place.
///
/// Every variant repairs out-of-bound variables by clamping. Invalid
/// parameters fail at construction; execution itself cannot fail.
pub trait MutationOperator<T: Variable>: Send {
    fn execute(&self, solution: &mut Solution<T>, bounds: &Bounds<T>, rng: &mut dyn RngCore);
}

/// Resamples each variable uniformly from its bounds with the configured
/// per-variable probability.
pub struct SimpleRandomMutation {
    probability: f64,
}

impl SimpleRandomMutation {
    pub fn new(probability: f64) -> Result<Self, ConfigError> {
        probability_in_unit("mutation probability", probability)?;
        Ok(Self { probability })
    }
}

impl<T: Variable> MutationOperator<T> for SimpleRandomMutation {
    fn execute(&self, solution: &mut Solution<T>, bounds: &Bounds<T>, rng: &mut dyn RngCore) {
        for i in 0..solution.variables().len() {
            if rng.random_range(0.0..1.0) < self.probability {
                solution.variables_mut()[i] = bounds.sample(i, rng);
            }
        }
    }
}

/// Resamples within a window around the current value.
///
/// The window is a fraction of each variable's bound range; mutated values
/// land within plus or minus half a window of the original and are clamped
/// afterwards.
pub struct RangeRandomMutation {
    probability: f64,
    window: f64,
}

impl RangeRandomMutation {
    pub fn new(probability: f64, window: f64) -> Result<Self, ConfigError> {
        probability_in_unit("mutation probability", probability)?;
        if window <= 0.0 || window > 1.0 || window.is_nan() {
            return Err(ConfigError::ParameterRange {
                name: "mutation window",
                value: window,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self { probability, window })
    }
}

impl<T: Variable> MutationOperator<T> for RangeRandomMutation {
    fn execute(&self, solution: &mut Solution<T>, bounds: &Bounds<T>, rng: &mut dyn RngCore) {
        for i in 0..solution.variables().len() {
            if rng.random_range(0.0..1.0) < self.probability {
                let half = self.window * bounds.range(i) / 2.0;
                let current = solution.variables()[i].as_f64();
                let value = current + rng.random_range(-half..=half);
                solution.variables_mut()[i] = bounds.clamp(i, T::from_f64(value));
            }
        }
    }
}

/// Polynomial mutation (Deb and Goyal, 1996).
///
/// Perturbs each selected variable with a polynomial-distributed delta;
/// larger distribution indices concentrate mutants near the original
/// value.
pub struct PolynomialMutation {
    probability: f64,
    distribution_index: f64,
}

impl PolynomialMutation {
    pub fn new(probability: f64, distribution_index: f64) -> Result<Self, ConfigError> {
        probability_in_unit("mutation probability", probability)?;
        distribution_index_valid("mutation distribution index", distribution_index)?;
        Ok(Self {
            probability,
            distribution_index,
        })
    }
}

impl<T: Variable> MutationOperator<T> for PolynomialMutation {
    fn execute(&self, solution: &mut Solution<T>, bounds: &Bounds<T>, rng: &mut dyn RngCore) {
        let eta = self.distribution_index;
        for i in 0..solution.variables().len() {
            if rng.random_range(0.0..1.0) > self.probability {
                continue;
            }
            let y = solution.variables()[i].as_f64();
            let lo = bounds.lower(i).as_f64();
            let hi = bounds.upper(i).as_f64();
            let span = hi - lo;

            let delta1 = (y - lo) / span;
            let delta2 = (hi - y) / span;
            let u: f64 = rng.random_range(0.0..1.0);
            let pow = 1.0 / (eta + 1.0);
            let deltaq = if u <= 0.5 {
                let xy = 1.0 - delta1;
                let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta + 1.0);
                val.powf(pow) - 1.0
            } else {
                let xy = 1.0 - delta2;
                let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta + 1.0);
                1.0 - val.powf(pow)
            };
            solution.variables_mut()[i] = bounds.clamp(i, T::from_f64(y + deltaq * span));
        }
    }
}
