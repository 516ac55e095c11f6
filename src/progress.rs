//! Progress reporting from a running search.

use indicatif::ProgressBar;

/// Informational snapshot; never alters the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Most recent candidate tried.
    pub last_attempt: String,
    /// Candidates tried so far in this search.
    pub attempts: u64,
}

/// Receives progress events. Called from the thread driving the search, never
/// from a parallel worker.
pub trait ProgressSink {
    fn report(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent),
{
    fn report(&self, event: &ProgressEvent) {
        self(event)
    }
}

impl ProgressSink for ProgressBar {
    fn report(&self, event: &ProgressEvent) {
        self.set_position(event.attempts);
        self.set_message(event.last_attempt.clone());
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ProgressSink for Silent {
    fn report(&self, _event: &ProgressEvent) {}
}
