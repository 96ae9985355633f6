//! Batched asset preloading.
//!
//! Warming caches for dozens of large media files all at once saturates the
//! I/O path, so the preloader issues fixed-size batches and waits between
//! them. The scheduler is independent of any media API: callers begin the
//! actual fetches through a [`FetchBackend`] and report completions back.
//! Time is supplied by the caller, which keeps scheduling deterministic
//! under test. Dropping the scheduler cancels everything not yet issued.

use std::time::{Duration, Instant};

/// The seam through which fetches actually start.
///
/// `begin` must not block; completion is reported to the scheduler via
/// [`BatchPreloader::mark_done`] whenever the fetch resolves.
pub trait FetchBackend {
    fn begin(&mut self, path: &str);
}

/// Adapter so a closure can serve as a backend in tests and simple hosts.
pub struct FnFetch<F: FnMut(&str)>(pub F);

impl<F: FnMut(&str)> FetchBackend for FnFetch<F> {
    fn begin(&mut self, path: &str) {
        (self.0)(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Paths issued per batch; clamped to at least 1.
    pub batch_size: usize,
    /// Pause between one batch completing and the next being issued.
    pub batch_delay: Duration,
    /// Pause before the very first batch.
    pub start_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    WaitingToStart { until: Instant },
    BatchInFlight,
    BetweenBatches { until: Instant },
    Finished,
}

/// Issues paths in fixed-size batches with delays between them.
///
/// A batch is complete when every member is marked done; failures count
/// toward completion so one broken asset never stalls the plan.
#[derive(Debug)]
pub struct BatchPreloader {
    queue: Vec<String>,
    next_index: usize,
    outstanding: Vec<String>,
    succeeded: usize,
    failed: usize,
    config: BatchConfig,
    phase: Phase,
}

impl BatchPreloader {
    pub fn new(paths: Vec<String>, config: BatchConfig, now: Instant) -> Self {
        let phase = if paths.is_empty() {
            Phase::Finished
        } else {
            Phase::WaitingToStart {
                until: now + config.start_delay,
            }
        };
        Self {
            queue: paths,
            next_index: 0,
            outstanding: Vec::new(),
            succeeded: 0,
            failed: 0,
            config,
            phase,
        }
    }

    /// Returns the paths whose fetch should begin now (possibly none).
    ///
    /// Call once per tick with a monotonically non-decreasing `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<String> {
        match self.phase {
            Phase::WaitingToStart { until } | Phase::BetweenBatches { until } if now >= until => {
                self.issue_batch()
            }
            _ => Vec::new(),
        }
    }

    fn issue_batch(&mut self) -> Vec<String> {
        let size = self.config.batch_size.max(1);
        let end = (self.next_index + size).min(self.queue.len());
        let batch: Vec<String> = self.queue[self.next_index..end].to_vec();
        self.next_index = end;
        self.outstanding = batch.clone();
        self.phase = Phase::BatchInFlight;
        batch
    }

    /// Records completion of `path`. Success and failure both count toward
    /// batch completion; paths not in the current batch are ignored.
    pub fn mark_done(&mut self, path: &str, ok: bool, now: Instant) {
        let Some(pos) = self.outstanding.iter().position(|p| p == path) else {
            return;
        };
        self.outstanding.remove(pos);
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }

        if self.outstanding.is_empty() && self.phase == Phase::BatchInFlight {
            self.phase = if self.next_index >= self.queue.len() {
                Phase::Finished
            } else {
                Phase::BetweenBatches {
                    until: now + self.config.batch_delay,
                }
            };
        }
    }

    /// True once every batch has been issued and completed.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}
