//! Stepwise evolutionary engine.
//!
//! [`GenerationalEngine`] drives a [`SearchPolicy`] one generation per
//! [`Algorithm::run_single_step`] call. Keeping the loop outside the engine
//! lets a host interleave search with progress reporting and cancellation
//! checks; [`Algorithm::run`] is provided for callers that just want the
//! final population.

use std::mem;

use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::core::{attr, Problem, Solution, SolutionListEvaluator, Variable};
use crate::error::{ConfigError, EvolveError};

/// Lifecycle of a stepwise search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineState {
    /// No step has run; the population does not exist yet.
    NotStarted,
    /// Initialized and below the stopping threshold.
    Running,
    /// The stopping rule is satisfied. Further steps perform no work.
    Terminated,
}

/// Termination criterion, advanced once per step.
///
/// Exactly one rule is active per engine. `MaxEvaluations` counts every
/// call into the problem, the initial population included; `Stagnation`
/// counts consecutive generations without a strict improvement of the best
/// solution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoppingRule {
    MaxEvaluations { limit: usize, evaluations: usize },
    Stagnation { limit: usize, stagnant: usize },
}

impl StoppingRule {
    /// Stops once `limit` solutions have been evaluated.
    pub fn max_evaluations(limit: usize) -> Self {
        StoppingRule::MaxEvaluations {
            limit,
            evaluations: 0,
        }
    }

    /// Stops after `limit` consecutive generations without improvement.
    pub fn stagnation(limit: usize) -> Self {
        StoppingRule::Stagnation { limit, stagnant: 0 }
    }

    /// Advances the active counter with the outcome of one step.
    pub(crate) fn advance(&mut self, evaluated: usize, improved: bool) {
        match self {
            StoppingRule::MaxEvaluations { evaluations, .. } => *evaluations += evaluated,
            StoppingRule::Stagnation { stagnant, .. } => {
                if improved {
                    *stagnant = 0;
                } else {
                    *stagnant += 1;
                }
            }
        }
    }

    pub fn satisfied(&self) -> bool {
        match *self {
            StoppingRule::MaxEvaluations { limit, evaluations } => evaluations >= limit,
            StoppingRule::Stagnation { limit, stagnant } => stagnant >= limit,
        }
    }

    /// Fraction of the budget consumed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let (used, limit) = match *self {
            StoppingRule::MaxEvaluations { limit, evaluations } => (evaluations, limit),
            StoppingRule::Stagnation { limit, stagnant } => (stagnant, limit),
        };
        if limit == 0 {
            return 1.0;
        }
        (used as f64 / limit as f64).min(1.0)
    }
}

/// Snapshot returned by every step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepStatus {
    pub state: EngineState,
    /// Generations completed; 0 right after initialization.
    pub generation: usize,
    /// Total problem evaluations so far.
    pub evaluations: usize,
    /// Stopping-rule progress in `[0, 1]`.
    pub progress: f64,
}

/// A resumable optimization run.
///
/// Implementations are driven one generation at a time. After the stopping
/// rule is satisfied, [`run_single_step`](Algorithm::run_single_step)
/// becomes a no-op that keeps returning the terminal status.
pub trait Algorithm<T: Variable>: Send {
    /// Short identifier used in logs and output paths.
    fn name(&self) -> &str;

    /// Runs initialization on the first call, one generation afterwards.
    fn run_single_step(&mut self) -> Result<StepStatus, EvolveError>;

    fn stopping_condition_reached(&self) -> bool;

    /// Final solutions according to the variant: a best-of singleton for
    /// single-objective searches, a non-dominated set otherwise.
    fn result(&self) -> Vec<Solution<T>>;

    /// One-line human-readable progress description.
    fn status(&self) -> String;

    /// Releases the wrapped problem's external resource.
    fn close_resources(&mut self);

    /// Drives steps until the stopping rule is satisfied.
    fn run(&mut self) -> Result<StepStatus, EvolveError> {
        let mut status = self.run_single_step()?;
        while !self.stopping_condition_reached() {
            status = self.run_single_step()?;
        }
        Ok(status)
    }
}

/// Next population plus whether the step strictly improved the best
/// solution (feeds the stagnation rule).
#[derive(Debug, Clone)]
pub struct Replacement<T: Variable> {
    pub population: Vec<Solution<T>>,
    pub improved: bool,
}

/// The variant seam: everything that differs between algorithm families.
///
/// The engine owns the population, the RNG, the evaluation strategy and the
/// stopping rule; the policy decides how offspring are produced and which
/// solutions survive. Policies may keep their own state across generations
/// (velocity vectors, external archives, fitness caches).
pub trait SearchPolicy<T: Variable>: Send {
    /// Runs once, after the initial population has been evaluated.
    fn after_initialisation(&mut self, _population: &mut [Solution<T>], _rng: &mut dyn RngCore) {}

    /// Produces the next batch of unevaluated candidate solutions.
    fn offspring(
        &mut self,
        population: &[Solution<T>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution<T>>, ConfigError>;

    /// Merges parents and evaluated offspring into the next population.
    ///
    /// The returned population must keep the configured size; a size change
    /// is a programming error and makes the engine panic.
    fn replace(&mut self, parents: Vec<Solution<T>>, offspring: Vec<Solution<T>>)
        -> Replacement<T>;

    /// Extracts the reportable result from the final population.
    fn result(&self, population: &[Solution<T>]) -> Vec<Solution<T>>;
}

/// Generic generational engine: initialization, then
/// offspring/evaluate/replace per step, under a single stopping rule.
pub struct GenerationalEngine<P: Problem, S: SearchPolicy<P::Var>> {
    name: String,
    problem: P,
    policy: S,
    evaluator: Box<dyn SolutionListEvaluator<P>>,
    stopping: StoppingRule,
    population_size: usize,
    population: Vec<Solution<P::Var>>,
    rng: StdRng,
    state: EngineState,
    generation: usize,
    evaluations: usize,
}

impl<P: Problem, S: SearchPolicy<P::Var>> GenerationalEngine<P, S> {
    pub fn new(
        name: impl Into<String>,
        problem: P,
        policy: S,
        population_size: usize,
        stopping: StoppingRule,
        evaluator: Box<dyn SolutionListEvaluator<P>>,
        seed: Option<u64>,
    ) -> Self {
        let rng = seed.map_or_else(
            || StdRng::seed_from_u64(rand::random()),
            StdRng::seed_from_u64,
        );
        Self {
            name: name.into(),
            problem,
            policy,
            evaluator,
            stopping,
            population_size,
            population: Vec::new(),
            rng,
            state: EngineState::NotStarted,
            generation: 0,
            evaluations: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn population(&self) -> &[Solution<P::Var>] {
        &self.population
    }

    fn step_status(&self) -> StepStatus {
        StepStatus {
            state: self.state,
            generation: self.generation,
            evaluations: self.evaluations,
            progress: self.stopping.progress(),
        }
    }

    fn initialise(&mut self) -> Result<(), EvolveError> {
        let mut population: Vec<Solution<P::Var>> = (0..self.population_size)
            .map(|_| self.problem.create_solution(&mut self.rng))
            .collect();
        let evaluated = self.evaluator.evaluate(&mut population, &self.problem)?;
        for solution in &mut population {
            solution.set_attribute(attr::BIRTH_GENERATION, 0.0);
        }
        self.policy.after_initialisation(&mut population, &mut self.rng);
        self.population = population;
        self.evaluations += evaluated;
        self.stopping.advance(evaluated, true);
        self.state = if self.stopping.satisfied() {
            EngineState::Terminated
        } else {
            EngineState::Running
        };
        debug!(
            "{}: initialized {} solutions on {}",
            self.name,
            self.population_size,
            self.problem.name()
        );
        Ok(())
    }

    fn evolve(&mut self) -> Result<(), EvolveError> {
        self.generation += 1;
        let mut offspring = self.policy.offspring(&self.population, &mut self.rng)?;
        for child in &mut offspring {
            child.set_attribute(attr::BIRTH_GENERATION, self.generation as f64);
        }
        let evaluated = self.evaluator.evaluate(&mut offspring, &self.problem)?;
        let parents = mem::take(&mut self.population);
        let replacement = self.policy.replace(parents, offspring);
        assert_eq!(
            replacement.population.len(),
            self.population_size,
            "replacement changed the population size"
        );
        self.population = replacement.population;
        self.evaluations += evaluated;
        self.stopping.advance(evaluated, replacement.improved);
        if self.stopping.satisfied() {
            self.state = EngineState::Terminated;
        }
        debug!(
            "{}: generation {} done, {} evaluations",
            self.name, self.generation, self.evaluations
        );
        Ok(())
    }
}

impl<P: Problem, S: SearchPolicy<P::Var>> Algorithm<P::Var> for GenerationalEngine<P, S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn run_single_step(&mut self) -> Result<StepStatus, EvolveError> {
        match self.state {
            EngineState::NotStarted => self.initialise()?,
            EngineState::Running => self.evolve()?,
            EngineState::Terminated => {}
        }
        Ok(self.step_status())
    }

    fn stopping_condition_reached(&self) -> bool {
        self.state == EngineState::Terminated
    }

    fn result(&self) -> Vec<Solution<P::Var>> {
        self.policy.result(&self.population)
    }

    fn status(&self) -> String {
        format!(
            "{} [{:?}] generation {}, {} evaluations, {:.0}% of budget",
            self.name,
            self.state,
            self.generation,
            self.evaluations,
            self.stopping.progress() * 100.0
        )
    }

    fn close_resources(&mut self) {
        self.problem.close_resources();
    }
}
