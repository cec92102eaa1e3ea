//! Experiment assembly.

use std::path::PathBuf;

use crate::catalog::AlgorithmSpec;
use crate::core::Problem;
use crate::error::ConfigError;
use crate::experiment::runner::Experiment;
use crate::experiment::types::ExperimentAlgorithm;

/// Assembles an [`Experiment`] from algorithm specs and a problem factory.
///
/// `build` materializes one entry per (algorithm, run) pair, constructing a
/// fresh problem for each so every run owns its own simulator resource.
/// A seeded spec fans out to one seed per run (`seed + run`), keeping runs
/// independent but the whole experiment reproducible; unseeded specs draw
/// a random seed per run.
pub struct ExperimentBuilder<P: Problem> {
    name: String,
    factory: Box<dyn Fn() -> P>,
    runs: usize,
    output_dir: Option<PathBuf>,
    specs: Vec<AlgorithmSpec>,
}

impl<P: Problem + 'static> ExperimentBuilder<P> {
    pub fn new(name: impl Into<String>, factory: impl Fn() -> P + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Box::new(factory),
            runs: 1,
            output_dir: None,
            specs: Vec::new(),
        }
    }

    /// Number of independent runs per algorithm.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Directory the runner persists TSV output under. Without one, results
    /// stay in memory only.
    pub fn with_output_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(directory.into());
        self
    }

    /// Registers one algorithm variant.
    pub fn with_algorithm(mut self, spec: AlgorithmSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn build(self) -> Result<Experiment<P::Var>, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.specs.is_empty() {
            return Err(ConfigError::NoAlgorithms);
        }
        if self.runs == 0 {
            return Err(ConfigError::NoRuns);
        }
        for spec in &self.specs {
            spec.validate()?;
        }

        let mut entries = Vec::with_capacity(self.specs.len() * self.runs);
        for spec in &self.specs {
            for run in 0..self.runs {
                let per_run = match spec.seed() {
                    Some(seed) => spec.clone().with_seed(seed + run as u64),
                    None => spec.clone(),
                };
                let problem = (self.factory)();
                let problem_tag = problem.name().to_string();
                entries.push(ExperimentAlgorithm {
                    tag: spec.tag().to_string(),
                    problem_tag,
                    run,
                    multi_objective: spec.is_multi_objective(),
                    algorithm: per_run.build(problem)?,
                });
            }
        }
        Ok(Experiment::new(self.name, self.output_dir, entries))
    }
}
