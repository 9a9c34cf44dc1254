//! Progress reporting.
//!
//! The orchestrator reports a [`ProgressInfo`] snapshot after every unit of
//! remote work. Reporters are invoked synchronously, in order, from the
//! task driving the run.

use kickoff_models::ProgressInfo;
use tokio::sync::watch;

/// Sink for progress snapshots.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: ProgressInfo);
}

impl<F> ProgressReporter for F
where
    F: Fn(ProgressInfo) + Send + Sync,
{
    fn report(&self, progress: ProgressInfo) {
        self(progress)
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _progress: ProgressInfo) {}
}

/// Publishes the latest snapshot on a `watch` channel.
///
/// Receivers only ever see the most recent value, which is what a progress
/// bar wants.
#[derive(Debug)]
pub struct WatchReporter {
    tx: watch::Sender<ProgressInfo>,
}

impl WatchReporter {
    /// Creates a reporter and the receiver observing it.
    pub fn channel() -> (Self, watch::Receiver<ProgressInfo>) {
        let (tx, rx) = watch::channel(ProgressInfo::new(0, 0, ""));
        (Self { tx }, rx)
    }
}

impl ProgressReporter for WatchReporter {
    fn report(&self, progress: ProgressInfo) {
        // Works with or without live receivers.
        self.tx.send_replace(progress);
    }
}

/// Step counter against a fixed total.
pub(crate) struct StepCounter<'a> {
    reporter: &'a dyn ProgressReporter,
    total: usize,
    current: usize,
}

impl<'a> StepCounter<'a> {
    pub(crate) fn new(reporter: &'a dyn ProgressReporter, total: usize) -> Self {
        Self {
            reporter,
            total,
            current: 0,
        }
    }

    /// Advances one step and reports it.
    pub(crate) fn step(&mut self, message: impl Into<String>) {
        self.current += 1;
        self.note(message);
    }

    /// Reports without advancing.
    pub(crate) fn note(&self, message: impl Into<String>) {
        self.reporter
            .report(ProgressInfo::new(self.total, self.current, message));
    }

    /// Reports `(total, total)`.
    pub(crate) fn finish(&mut self, message: impl Into<String>) {
        self.current = self.total;
        self.note(message);
    }

    pub(crate) fn current(&self) -> usize {
        self.current
    }
}
