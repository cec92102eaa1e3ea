//! Sequential experiment execution.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use log::{info, warn};

use crate::core::{Solution, Variable};
use crate::engine::StepStatus;
use crate::experiment::monitor::{ProgressUpdate, RunMonitor};
use crate::experiment::output;
use crate::experiment::types::{ExperimentAlgorithm, ExperimentResult, RunOutcome, RunReport};
use crate::ranking::non_dominated_subset;

/// An ordered list of independent runs, executed one at a time.
///
/// Built by [`ExperimentBuilder`](crate::experiment::ExperimentBuilder) and
/// immutable afterwards, except for [`deduplicate`](Experiment::deduplicate).
pub struct Experiment<T: Variable> {
    name: String,
    output_dir: Option<PathBuf>,
    entries: Vec<ExperimentAlgorithm<T>>,
}

impl<T: Variable> fmt::Debug for Experiment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Experiment")
            .field("name", &self.name)
            .field("output_dir", &self.output_dir)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<T: Variable> Experiment<T> {
    pub(crate) fn new(
        name: String,
        output_dir: Option<PathBuf>,
        entries: Vec<ExperimentAlgorithm<T>>,
    ) -> Self {
        Self {
            name,
            output_dir,
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[ExperimentAlgorithm<T>] {
        &self.entries
    }

    /// Drops entries duplicating an earlier (algorithm, run) pair.
    pub fn deduplicate(&mut self) {
        let mut seen = HashSet::new();
        self.entries
            .retain(|entry| seen.insert((entry.tag.clone(), entry.run)));
    }

    /// Runs every entry in order, then reduces the completed multi-objective
    /// runs to a reference front.
    ///
    /// A single active worker: the next entry starts only after the previous
    /// one finished and released its problem resource. Cancellation is
    /// observed at generation boundaries only; the cancelled entry reports an
    /// empty result, the remaining entries are skipped, and no reference
    /// front is produced. A failed run is recorded and the experiment moves
    /// on. Persistence failures are logged and leave the in-memory reports
    /// untouched.
    pub fn run(self, monitor: &RunMonitor) -> ExperimentResult<T> {
        let total = self.entries.len();
        let problem_tag = self.entries.first().map(|entry| entry.problem_tag.clone());
        let mut reports = Vec::with_capacity(total);
        let mut front_pool: Vec<Solution<T>> = Vec::new();
        let mut cancelled = false;

        let mut queue = self.entries.into_iter();
        for (index, mut entry) in queue.by_ref().enumerate() {
            info!(
                "experiment {}: {} run {} on {} ({}/{})",
                self.name,
                entry.tag,
                entry.run,
                entry.problem_tag,
                index + 1,
                total
            );
            let started = Instant::now();
            let mut last_status: Option<StepStatus> = None;
            let outcome = loop {
                if monitor.is_cancelled() {
                    break RunOutcome::Cancelled;
                }
                match entry.algorithm.run_single_step() {
                    Ok(status) => {
                        monitor.publish(ProgressUpdate {
                            algorithm: entry.tag.clone(),
                            run: entry.run,
                            message: entry.algorithm.status(),
                            progress: (index as f64 + status.progress) / total as f64,
                        });
                        let done = entry.algorithm.stopping_condition_reached();
                        last_status = Some(status);
                        if done {
                            break RunOutcome::Completed;
                        }
                    }
                    Err(error) => break RunOutcome::Failed(error),
                }
            };

            let solutions = match &outcome {
                RunOutcome::Completed => entry.algorithm.result(),
                _ => Vec::new(),
            };
            entry.algorithm.close_resources();

            match &outcome {
                RunOutcome::Completed => {
                    if entry.multi_objective {
                        front_pool.extend(solutions.iter().cloned());
                    }
                    if let Some(root) = &self.output_dir {
                        let directory = output::run_directory(
                            root,
                            &self.name,
                            &entry.tag,
                            &entry.problem_tag,
                            entry.run,
                        );
                        if let Err(error) = output::write_run(&directory, &solutions) {
                            warn!(
                                "experiment {}: failed to persist {} run {}: {}",
                                self.name, entry.tag, entry.run, error
                            );
                        }
                    }
                }
                RunOutcome::Failed(error) => {
                    warn!(
                        "experiment {}: {} run {} failed: {}",
                        self.name, entry.tag, entry.run, error
                    );
                }
                RunOutcome::Cancelled => {
                    cancelled = true;
                    info!(
                        "experiment {}: cancelled during {} run {}",
                        self.name, entry.tag, entry.run
                    );
                }
            }

            reports.push(RunReport {
                algorithm: entry.tag,
                problem: entry.problem_tag,
                run: entry.run,
                outcome,
                solutions,
                evaluations: last_status.map_or(0, |status| status.evaluations),
                elapsed: started.elapsed(),
            });
            if cancelled {
                break;
            }
        }
        for mut skipped in queue {
            skipped.algorithm.close_resources();
        }

        let reference_front = if cancelled {
            Vec::new()
        } else {
            non_dominated_subset(&front_pool)
        };
        if !cancelled && !reference_front.is_empty() {
            if let (Some(root), Some(problem)) = (&self.output_dir, &problem_tag) {
                if let Err(error) =
                    output::write_reference_front(root, &self.name, problem, &reference_front)
                {
                    warn!(
                        "experiment {}: failed to persist the reference front: {}",
                        self.name, error
                    );
                }
            }
        }

        info!(
            "experiment {} finished: {} of {} runs completed",
            self.name,
            reports
                .iter()
                .filter(|report| report.outcome.is_completed())
                .count(),
            total
        );
        ExperimentResult {
            name: self.name,
            reports,
            reference_front,
        }
    }
}
