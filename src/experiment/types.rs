//! Experiment entries and result records.

use std::time::Duration;

use crate::core::{Solution, Variable};
use crate::engine::Algorithm;
use crate::error::EvolveError;

/// One algorithm instance bound to one freshly built problem.
///
/// Its lifecycle is exactly one independent run; the wrapped problem owns
/// its own simulator resource for that run's duration.
pub struct ExperimentAlgorithm<T: Variable> {
    pub(crate) tag: String,
    pub(crate) problem_tag: String,
    pub(crate) run: usize,
    pub(crate) multi_objective: bool,
    pub(crate) algorithm: Box<dyn Algorithm<T>>,
}

impl<T: Variable> ExperimentAlgorithm<T> {
    /// Algorithm tag, also the directory name in persisted output.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn problem_tag(&self) -> &str {
        &self.problem_tag
    }

    /// Zero-based run index.
    pub fn run(&self) -> usize {
        self.run
    }
}

/// Terminal status of one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The stopping rule was satisfied and a result collected.
    Completed,
    /// The run aborted on an engine error; later entries still execute.
    Failed(EvolveError),
    /// The cancellation flag was observed at a generation boundary.
    Cancelled,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Record of one finished or aborted entry.
#[derive(Debug, Clone)]
pub struct RunReport<T: Variable> {
    pub algorithm: String,
    pub problem: String,
    /// Zero-based run index.
    pub run: usize,
    pub outcome: RunOutcome,
    /// Final solutions; empty for failed and cancelled runs.
    pub solutions: Vec<Solution<T>>,
    /// Problem evaluations the run consumed.
    pub evaluations: usize,
    pub elapsed: Duration,
}

/// Everything an experiment produced.
#[derive(Debug, Clone)]
pub struct ExperimentResult<T: Variable> {
    pub name: String,
    /// One report per executed entry, in execution order. Entries skipped
    /// after a cancellation have no report.
    pub reports: Vec<RunReport<T>>,
    /// Non-dominated subset of the union of completed multi-objective runs;
    /// empty for single-objective and cancelled experiments.
    pub reference_front: Vec<Solution<T>>,
}

impl<T: Variable> ExperimentResult<T> {
    /// Reports whose runs completed.
    pub fn completed(&self) -> impl Iterator<Item = &RunReport<T>> + '_ {
        self.reports
            .iter()
            .filter(|report| report.outcome.is_completed())
    }

    pub fn was_cancelled(&self) -> bool {
        self.reports
            .iter()
            .any(|report| report.outcome == RunOutcome::Cancelled)
    }
}
