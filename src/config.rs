use std::num::NonZeroUsize;
use std::thread;

/// Progress and yield every 10 attempts during brute force.
pub const BRUTE_FORCE_CADENCE: usize = 10;
/// Dictionary searches report every 5 attempts.
pub const DICTIONARY_CADENCE: usize = 5;
/// Parallel workers send an intermediate progress message every 1000 attempts.
pub const WORKER_CADENCE: usize = 1000;

/// Tuning knobs shared by every strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Worker threads for parallel strategies; 0 picks the hardware parallelism.
    pub threads: usize,
    pub brute_force_cadence: usize,
    pub dictionary_cadence: usize,
    pub worker_cadence: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            threads: 0,
            brute_force_cadence: BRUTE_FORCE_CADENCE,
            dictionary_cadence: DICTIONARY_CADENCE,
            worker_cadence: WORKER_CADENCE,
        }
    }
}

impl SearchConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Resolved worker count, never below one.
    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}

/// A cadence of zero would never fire; treat it as every attempt.
pub(crate) fn cadence(value: usize) -> u64 {
    value.max(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_threads_win() {
        assert_eq!(SearchConfig::default().with_threads(3).worker_count(), 3);
    }

    #[test]
    fn auto_threads_is_at_least_one() {
        assert!(SearchConfig::default().worker_count() >= 1);
    }

    #[test]
    fn zero_cadence_is_one() {
        assert_eq!(cadence(0), 1);
        assert_eq!(cadence(10), 10);
    }
}
