//! Bounded worker-pool scheduler for conversion batches.
//!
//! The driving thread dispatches jobs in input order onto OS worker
//! threads, keeping at most the budgeted number in flight, and blocks
//! on a completion channel rather than busy-polling. Observable
//! contract: a job's output file is written before it counts as
//! completed, progress never exceeds true completed/total, and the
//! dispatch counter reflects dispatch order, not completion order.
//!
//! Per-job failures are logged and still count toward completion (the
//! batch is best-effort); only setup errors abort before dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::BatchError;
use crate::job::ConversionJob;

/// Inclusive bounds for the concurrency budget.
pub const MIN_JOBS: usize = 1;
/// Upper bound on concurrent workers.
pub const MAX_JOBS: usize = 1024;

/// A unit of batch work. Implemented by [`ConversionJob`]; tests
/// substitute instrumented stubs.
pub trait Work: Send {
    /// Execute the work, including writing any output.
    ///
    /// # Errors
    ///
    /// Implementations surface their failure; the scheduler logs it and
    /// carries on.
    fn execute(&self) -> Result<(), BatchError>;

    /// Human-readable identifier for logging.
    fn label(&self) -> String;
}

impl Work for ConversionJob {
    fn execute(&self) -> Result<(), BatchError> {
        self.run()
    }

    fn label(&self) -> String {
        self.input.display().to_string()
    }
}

/// Shared batch counters: the only state crossing worker threads.
///
/// Workers bump `completed` only after their output write finished, so
/// an observer never sees progress ahead of the files on disk.
#[derive(Debug)]
pub struct BatchState {
    total: usize,
    dispatched: AtomicUsize,
    completed: AtomicUsize,
}

impl BatchState {
    fn new(total: usize) -> Self {
        Self {
            total,
            dispatched: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Total number of jobs in the batch.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Jobs handed to a worker so far.
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    /// Jobs finished (successfully or not) so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Fractional progress in `[0.0, 1.0]`, monotonically
    /// non-decreasing, exactly `1.0` once the batch settles.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed() as f32 / self.total as f32
    }
}

/// Summary of a settled batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of jobs that ran, failed or not.
    pub completed: usize,
    /// Failure descriptions, one per failed job, in completion order.
    pub failures: Vec<String>,
}

/// Fans a batch of jobs out over up to `budget` worker threads.
pub struct Scheduler {
    budget: usize,
    state: Arc<BatchState>,
}

impl Scheduler {
    /// Create a scheduler for `total` jobs with the given concurrency
    /// budget.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Config`] if `budget` is outside
    /// `MIN_JOBS..=MAX_JOBS`.
    pub fn new(total: usize, budget: usize) -> Result<Self, BatchError> {
        if !(MIN_JOBS..=MAX_JOBS).contains(&budget) {
            return Err(BatchError::Config(format!(
                "job count must be between {MIN_JOBS} and {MAX_JOBS}, got {budget}"
            )));
        }
        Ok(Self {
            budget,
            state: Arc::new(BatchState::new(total)),
        })
    }

    /// Shared handle to the batch counters, for progress observers.
    #[must_use]
    pub fn state(&self) -> Arc<BatchState> {
        Arc::clone(&self.state)
    }

    /// Run the batch to completion.
    ///
    /// Jobs are dispatched in vector order, so callers rendering
    /// dispatch-ordered output names can assign them at job-build
    /// time. Completion order across workers is unspecified.
    #[must_use]
    pub fn run<J: Work + 'static>(self, jobs: Vec<J>) -> BatchReport {
        let (done_tx, done_rx) = mpsc::channel::<(String, Result<(), BatchError>)>();
        let mut handles = Vec::with_capacity(jobs.len());
        let mut report = BatchReport::default();
        let mut running = 0usize;

        for work in jobs {
            // Budget full: block until one worker finishes.
            if running == self.budget {
                if let Ok(outcome) = done_rx.recv() {
                    Self::record(&mut report, outcome);
                    running -= 1;
                }
            }

            let index = self.state.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(job = %work.label(), index, "dispatching");

            let state = Arc::clone(&self.state);
            let tx = done_tx.clone();
            handles.push(thread::spawn(move || {
                let label = work.label();
                let result = work.execute();
                // Output (if any) is on disk before this increment.
                state.completed.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send((label, result));
            }));
            running += 1;
        }

        // Drain the remaining in-flight workers.
        drop(done_tx);
        while let Ok(outcome) = done_rx.recv() {
            Self::record(&mut report, outcome);
        }
        for handle in handles {
            let _ = handle.join();
        }

        tracing::info!(
            completed = report.completed,
            failed = report.failures.len(),
            "batch settled"
        );
        report
    }

    fn record(report: &mut BatchReport, (label, result): (String, Result<(), BatchError>)) {
        report.completed += 1;
        if let Err(error) = result {
            tracing::warn!(job = %label, %error, "job failed");
            report.failures.push(format!("{label}: {error}"));
        }
    }
}
