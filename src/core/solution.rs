//! Candidate solutions and the decision-variable contract.

use std::collections::HashMap;

use rand::{Rng, RngCore};

/// Well-known attribute keys written by evaluators and ranking machinery.
pub mod attr {
    /// Sum of all negative constraint values (0 when feasible).
    pub const OVERALL_CONSTRAINT_VIOLATION: &str = "overall_constraint_violation";
    /// Number of violated constraints.
    pub const VIOLATED_CONSTRAINTS: &str = "violated_constraints";
    /// Generation the solution was created in.
    pub const BIRTH_GENERATION: &str = "birth_generation";
    /// Non-domination rank (0 = Pareto front).
    pub const RANK: &str = "rank";
    /// Crowding distance within the solution's front.
    pub const CROWDING_DISTANCE: &str = "crowding_distance";
    /// SPEA2 fitness: raw strength plus density, lower is better.
    pub const STRENGTH_FITNESS: &str = "strength_fitness";
}

/// Scalar decision variable.
///
/// Implemented for `f64` (continuous design variables such as pump speeds)
/// and `i32` (catalogue indices such as discrete pipe diameters). Operators
/// that blend values convert through `f64`; integer variables round on the
/// way back and rely on bound clamping for repair.
pub trait Variable: Copy + PartialOrd + Send + Sync + std::fmt::Debug + 'static {
    /// Draws a uniform sample from `[lower, upper]`.
    fn sample(lower: Self, upper: Self, rng: &mut dyn RngCore) -> Self;

    /// Clamps `self` into `[lower, upper]`.
    fn clamp_to(self, lower: Self, upper: Self) -> Self;

    /// Converts to `f64` for arithmetic blending.
    fn as_f64(self) -> f64;

    /// Converts back from `f64`; integer implementations round.
    fn from_f64(value: f64) -> Self;
}

impl Variable for f64 {
    fn sample(lower: Self, upper: Self, rng: &mut dyn RngCore) -> Self {
        rng.random_range(lower..=upper)
    }

    fn clamp_to(self, lower: Self, upper: Self) -> Self {
        self.clamp(lower, upper)
    }

    fn as_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Variable for i32 {
    fn sample(lower: Self, upper: Self, rng: &mut dyn RngCore) -> Self {
        rng.random_range(lower..=upper)
    }

    fn clamp_to(self, lower: Self, upper: Self) -> Self {
        self.clamp(lower, upper)
    }

    fn as_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        value.round() as i32
    }
}

/// A candidate solution: decision variables plus evaluated objective and
/// constraint values and a side-channel attribute map.
///
/// The objective and constraint arrays are sized at construction and never
/// resized afterwards; accessors hand out slices so the lengths cannot
/// change. Objectives hold `f64::NAN` until the solution is evaluated.
///
/// Cloning produces a deep, independent copy. Operators clone parents
/// before modifying anything, so population members are never aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<T: Variable> {
    variables: Vec<T>,
    objectives: Vec<f64>,
    constraints: Vec<f64>,
    attributes: HashMap<&'static str, f64>,
}

impl<T: Variable> Solution<T> {
    /// Creates an unevaluated solution over the given variables.
    pub fn new(variables: Vec<T>, number_of_objectives: usize, number_of_constraints: usize) -> Self {
        Self {
            variables,
            objectives: vec![f64::NAN; number_of_objectives],
            constraints: vec![0.0; number_of_constraints],
            attributes: HashMap::new(),
        }
    }

    /// Returns an unevaluated copy carrying only this solution's variables.
    ///
    /// Objectives reset to `NaN`, constraints to zero, attributes cleared.
    pub fn fresh_copy(&self) -> Self {
        Self::new(
            self.variables.clone(),
            self.objectives.len(),
            self.constraints.len(),
        )
    }

    pub fn variables(&self) -> &[T] {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut [T] {
        &mut self.variables
    }

    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    pub fn objectives_mut(&mut self) -> &mut [f64] {
        &mut self.objectives
    }

    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut [f64] {
        &mut self.constraints
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether every objective has been written.
    pub fn is_evaluated(&self) -> bool {
        self.objectives.iter().all(|value| !value.is_nan())
    }

    /// Reads a side-channel attribute.
    pub fn attribute(&self, key: &'static str) -> Option<f64> {
        self.attributes.get(key).copied()
    }

    /// Writes a side-channel attribute, replacing any previous value.
    pub fn set_attribute(&mut self, key: &'static str, value: f64) {
        self.attributes.insert(key, value);
    }

    /// Sum of negative constraint values; 0 for feasible solutions.
    pub fn overall_constraint_violation(&self) -> f64 {
        self.attribute(attr::OVERALL_CONSTRAINT_VIOLATION).unwrap_or(0.0)
    }

    /// Recomputes the constraint summary attributes from the constraint
    /// values. Called by the evaluation strategies after every evaluation.
    pub fn refresh_constraint_summary(&mut self) {
        if self.constraints.is_empty() {
            return;
        }
        let violation: f64 = self.constraints.iter().filter(|v| **v < 0.0).sum();
        let violated = self.constraints.iter().filter(|v| **v < 0.0).count();
        self.set_attribute(attr::OVERALL_CONSTRAINT_VIOLATION, violation);
        self.set_attribute(attr::VIOLATED_CONSTRAINTS, violated as f64);
    }
}
