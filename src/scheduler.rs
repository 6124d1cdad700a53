// src/scheduler.rs
//! The bounded worker pool.
//!
//! A fixed number of worker threads claim targets left-to-right through a
//! shared atomic cursor, the only mutable state shared between units.
//! Whenever a unit finishes, its slot immediately claims the next
//! unclaimed target. Results flow over a channel into a single collector
//! on the calling thread, which serializes all merging. There is no
//! guarantee about completion order, only that every target is processed
//! exactly once and concurrency never exceeds the pool size.

use crate::catalog::Target;
use crate::error::HarnessError;
use crate::results::Fragment;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Cooperative cancellation shared between the caller and the pool.
/// Cancelling stops workers from claiming new targets; in-flight units
/// drain normally.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why one target failed to produce a fragment.
#[derive(Debug)]
pub struct UnitFailure {
    pub target: String,
    pub reason: String,
}

/// Everything a run produced. Execution failures are distinct from
/// verdict failures: they mean a target never yielded a fragment.
#[derive(Debug, Default)]
pub struct RunReport {
    pub fragments: Vec<Fragment>,
    pub failures: Vec<UnitFailure>,
}

impl RunReport {
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The unit of work: one target in, one fragment (or failure) out.
pub type UnitJob = dyn Fn(&Target) -> Result<Fragment, HarnessError> + Send + Sync;

type UnitOutcome = Result<Fragment, UnitFailure>;

pub struct Scheduler {
    jobs: usize,
    timeout: Option<Duration>,
    cancel: CancelToken,
}

impl Scheduler {
    /// A pool of `jobs` slots (at least one).
    #[must_use]
    pub fn new(jobs: usize) -> Self {
        Self {
            jobs: jobs.max(1),
            timeout: None,
            cancel: CancelToken::new(),
        }
    }

    /// Bounds each unit by a wall-clock deadline. A unit that exceeds it
    /// is abandoned and recorded as a fragment-level failure.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token for cancelling this run from another thread.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs `job` once per target. Greedy and work-conserving: slots
    /// rebind the moment a unit completes, successfully or not. Returns
    /// when the ready queue is exhausted and every in-flight unit has
    /// completed (or the run was cancelled and the pool drained).
    #[must_use]
    pub fn run(&self, targets: Vec<Target>, job: Arc<UnitJob>) -> RunReport {
        let mut report = RunReport::default();
        if targets.is_empty() {
            return report;
        }

        let targets = Arc::new(targets);
        let cursor = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<UnitOutcome>();

        let pool = self.jobs.min(targets.len());
        let mut workers = Vec::with_capacity(pool);
        for _ in 0..pool {
            let targets = Arc::clone(&targets);
            let cursor = Arc::clone(&cursor);
            let job = Arc::clone(&job);
            let cancel = self.cancel.clone();
            let tx = tx.clone();
            let timeout = self.timeout;

            workers.push(thread::spawn(move || loop {
                if cancel.is_cancelled() {
                    break;
                }
                // Exactly one worker claims each index.
                let idx = cursor.fetch_add(1, Ordering::SeqCst);
                let Some(target) = targets.get(idx) else {
                    break;
                };
                let outcome = run_unit(target, &job, timeout);
                if tx.send(outcome).is_err() {
                    break;
                }
            }));
        }
        drop(tx);

        // Single collector: merges happen on this thread only.
        for outcome in rx {
            match outcome {
                Ok(fragment) => report.fragments.push(fragment),
                Err(failure) => report.failures.push(failure),
            }
        }

        for worker in workers {
            let _ = worker.join();
        }
        report
    }
}

fn run_unit(target: &Target, job: &Arc<UnitJob>, timeout: Option<Duration>) -> UnitOutcome {
    let Some(limit) = timeout else {
        return (**job)(target).map_err(|e| failure(target, &e.to_string()));
    };

    // The analysis runs on its own thread so a hung unit can be
    // abandoned. After the deadline the receiver is dropped; a late
    // result hits a closed channel and is discarded, never merged.
    let (utx, urx) = mpsc::channel();
    let job = Arc::clone(job);
    let owned = target.clone();
    thread::spawn(move || {
        let _ = utx.send((*job)(&owned));
    });

    match urx.recv_timeout(limit) {
        Ok(result) => result.map_err(|e| failure(target, &e.to_string())),
        Err(_) => failure_err(target, &format!("unit timed out after {limit:?}")),
    }
}

fn failure(target: &Target, reason: &str) -> UnitFailure {
    UnitFailure {
        target: target.name.clone(),
        reason: reason.to_string(),
    }
}

fn failure_err(target: &Target, reason: &str) -> UnitOutcome {
    Err(failure(target, reason))
}
