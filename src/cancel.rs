use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared abort flag for one search.
///
/// Searches poll it between candidates; a probe already in flight always runs
/// to completion. Cancelling twice, or after the search resolved, does nothing.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
