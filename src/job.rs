//! One end-to-end recovery attempt.

use std::time::Instant;

use log::info;

use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::probe::Probe;
use crate::progress::ProgressSink;
use crate::search::{self, BruteForceParams, SearchResult};

/// Which candidates to try and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Enumerate on the calling thread.
    BruteForce(BruteForceParams),
    /// Walk a wordlist on the calling thread.
    Dictionary(Vec<String>),
    /// Split a wordlist across worker threads.
    ParallelDictionary(Vec<String>),
    /// Split the enumeration space across worker threads.
    ParallelBruteForce(BruteForceParams),
}

impl Strategy {
    /// Candidate count, if it fits in `u128`.
    pub fn candidate_count(&self) -> Option<u128> {
        match self {
            Strategy::BruteForce(params) | Strategy::ParallelBruteForce(params) => {
                params.space_size()
            }
            Strategy::Dictionary(words) | Strategy::ParallelDictionary(words) => {
                Some(words.len() as u128)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Strategy::BruteForce(_) => "brute force",
            Strategy::Dictionary(_) => "dictionary",
            Strategy::ParallelDictionary(_) => "parallel dictionary",
            Strategy::ParallelBruteForce(_) => "parallel brute force",
        }
    }
}

/// Probe, strategy and cancellation for a single search.
///
/// Consumed by [`SearchJob::run`]; every worker it starts is gone by the time
/// `run` returns.
pub struct SearchJob<'p, P: ?Sized> {
    probe: &'p P,
    strategy: Strategy,
    config: SearchConfig,
    cancel: CancelToken,
}

impl<'p, P> SearchJob<'p, P>
where
    P: Probe + ?Sized,
{
    pub fn new(probe: &'p P, strategy: Strategy) -> Self {
        SearchJob {
            probe,
            strategy,
            config: SearchConfig::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle for cancelling this job from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn run<S>(self, progress: &S) -> Result<SearchResult>
    where
        S: ProgressSink + ?Sized,
    {
        let start = Instant::now();
        info!("starting {} search", self.strategy.name());

        let result = match &self.strategy {
            Strategy::BruteForce(params) => {
                search::sequential_search(self.probe, params, &self.cancel, progress, &self.config)
            }
            Strategy::Dictionary(words) => {
                search::dictionary_search(self.probe, words, &self.cancel, progress, &self.config)
            }
            Strategy::ParallelDictionary(words) => search::parallel_dictionary_search(
                self.probe,
                words,
                &self.cancel,
                progress,
                &self.config,
            ),
            Strategy::ParallelBruteForce(params) => search::parallel_brute_force(
                self.probe,
                params,
                &self.cancel,
                progress,
                &self.config,
            ),
        };

        match &result {
            Ok(SearchResult::Found { .. }) => info!("password found in {:.2?}", start.elapsed()),
            Ok(SearchResult::NotFound) => {
                info!("search space exhausted in {:.2?}", start.elapsed())
            }
            Err(e) => info!("search ended after {:.2?}: {e}", start.elapsed()),
        }
        result
    }
}
