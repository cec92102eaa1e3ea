//! Batch orchestration: independent runs reduced to a reference front.
//!
//! An [`Experiment`] owns an ordered list of (algorithm, run) entries, each
//! bound to a freshly constructed problem. The runner drives them one at a
//! time, persists per-run TSV output when a directory is configured, and
//! reduces the completed multi-objective runs to the non-dominated subset
//! of their union. Hosts observe progress and request cancellation through
//! a [`RunMonitor`]; [`spawn_experiment`] moves the whole run onto a
//! dedicated worker thread.

mod builder;
mod monitor;
mod output;
mod runner;
mod types;

pub use builder::ExperimentBuilder;
pub use monitor::{spawn_experiment, ProgressUpdate, RunMonitor};
pub use runner::Experiment;
pub use types::{ExperimentAlgorithm, ExperimentResult, RunOutcome, RunReport};
