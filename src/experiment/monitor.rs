//! Host-facing progress and cancellation channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crate::core::Variable;
use crate::experiment::runner::Experiment;
use crate::experiment::types::ExperimentResult;

/// Snapshot of experiment progress, published once per generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Tag of the entry being driven.
    pub algorithm: String,
    /// Zero-based run index of the entry.
    pub run: usize,
    /// Status line of the running algorithm.
    pub message: String,
    /// Fraction of the whole experiment completed, in `[0, 1]`.
    pub progress: f64,
}

/// Cancellation flag plus a single-slot, last-value-wins progress mailbox.
///
/// `publish` overwrites the slot and `take_latest` empties it: intermediate
/// updates are dropped, only the most recent is ever delivered, and a slow
/// reader is never flooded.
#[derive(Debug, Default)]
pub struct RunMonitor {
    cancelled: AtomicBool,
    latest: Mutex<Option<ProgressUpdate>>,
}

impl RunMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the running experiment to stop at the next generation boundary.
    ///
    /// Cooperative: the generation in flight still finishes, so callers must
    /// not assume immediate termination.
    pub fn request_cancellation(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Replaces the mailbox content with `update`.
    pub fn publish(&self, update: ProgressUpdate) {
        let mut slot = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(update);
    }

    /// Takes the most recent update, leaving the mailbox empty.
    pub fn take_latest(&self) -> Option<ProgressUpdate> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Runs `experiment` on a dedicated worker thread.
///
/// Returns the join handle carrying the terminal result plus the monitor the
/// host polls for progress and uses to request cancellation.
pub fn spawn_experiment<T: Variable>(
    experiment: Experiment<T>,
) -> (JoinHandle<ExperimentResult<T>>, Arc<RunMonitor>) {
    let monitor = Arc::new(RunMonitor::new());
    let worker = Arc::clone(&monitor);
    let handle = thread::spawn(move || experiment.run(&worker));
    (handle, monitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(message: &str) -> ProgressUpdate {
        ProgressUpdate {
            algorithm: "ga".into(),
            run: 0,
            message: message.into(),
            progress: 0.5,
        }
    }

    // ---- Mailbox ----

    #[test]
    fn publishes_coalesce_to_the_latest() {
        let monitor = RunMonitor::new();
        monitor.publish(update("first"));
        monitor.publish(update("second"));
        assert_eq!(monitor.take_latest().map(|u| u.message), Some("second".into()));
        assert_eq!(monitor.take_latest(), None);
    }

    #[test]
    fn an_empty_mailbox_yields_nothing() {
        let monitor = RunMonitor::new();
        assert_eq!(monitor.take_latest(), None);
    }

    // ---- Cancellation ----

    #[test]
    fn cancellation_flag_latches() {
        let monitor = RunMonitor::new();
        assert!(!monitor.is_cancelled());
        monitor.request_cancellation();
        assert!(monitor.is_cancelled());
        monitor.request_cancellation();
        assert!(monitor.is_cancelled());
    }
}
