use std::thread;

use log::{debug, info};

use super::{BruteForceParams, SearchResult, resolve};
use crate::cancel::CancelToken;
use crate::config::{SearchConfig, cadence};
use crate::error::{RecoverError, Result};
use crate::probe::Probe;
use crate::progress::{ProgressEvent, ProgressSink};

/// Tries every candidate of `params` in enumeration order on the calling thread.
///
/// Every `brute_force_cadence` attempts a progress event is emitted and the
/// thread yields. Cancellation is checked before each probe, so at most one
/// probe runs after the token is cancelled.
pub fn sequential_search<P, S>(
    probe: &P,
    params: &BruteForceParams,
    cancel: &CancelToken,
    progress: &S,
    config: &SearchConfig,
) -> Result<SearchResult>
where
    P: Probe + ?Sized,
    S: ProgressSink + ?Sized,
{
    params.validate()?;
    info!(
        "brute force over {} symbols, length {}..={}",
        params.alphabet.len(),
        params.min_len,
        params.max_len
    );

    let step = cadence(config.brute_force_cadence);
    match drive(probe, params.candidates(), step, cancel, progress)? {
        Some(password) => resolve(probe, password),
        None => Ok(SearchResult::NotFound),
    }
}

/// Tries every word in list order on the calling thread.
///
/// An empty list resolves to `NotFound` without touching the probe.
pub fn dictionary_search<P, S>(
    probe: &P,
    words: &[String],
    cancel: &CancelToken,
    progress: &S,
    config: &SearchConfig,
) -> Result<SearchResult>
where
    P: Probe + ?Sized,
    S: ProgressSink + ?Sized,
{
    if words.is_empty() {
        debug!("empty wordlist, nothing to try");
        return Ok(SearchResult::NotFound);
    }
    info!("dictionary search over {} candidates", words.len());

    let step = cadence(config.dictionary_cadence);
    match drive(probe, words, step, cancel, progress)? {
        Some(password) => resolve(probe, password),
        None => Ok(SearchResult::NotFound),
    }
}

/// Shared loop: returns the matching candidate, `None` once the candidates run
/// out, or `Cancelled`.
fn drive<P, S, I>(
    probe: &P,
    candidates: I,
    step: u64,
    cancel: &CancelToken,
    progress: &S,
) -> Result<Option<String>>
where
    P: Probe + ?Sized,
    S: ProgressSink + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut attempts: u64 = 0;

    for candidate in candidates {
        if cancel.is_cancelled() {
            info!("search cancelled after {attempts} attempts");
            return Err(RecoverError::Cancelled);
        }

        let candidate = candidate.as_ref();
        if probe.check(candidate) {
            info!("password found after {} attempts", attempts + 1);
            return Ok(Some(candidate.to_string()));
        }

        attempts += 1;
        if attempts % step == 0 {
            progress.report(&ProgressEvent {
                last_attempt: candidate.to_string(),
                attempts,
            });
            thread::yield_now();
        }
    }

    debug!("candidates exhausted after {attempts} attempts");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::charset::{Alphabet, Charset};
    use crate::probe::ProbeError;
    use crate::progress::Silent;
    use crate::search::testing::FakeProbe;

    fn config() -> SearchConfig {
        SearchConfig::default()
    }

    #[test]
    fn exhaustion_probes_whole_space() {
        let probe = FakeProbe::rejecting();
        let params = BruteForceParams::new(Alphabet::custom("abc"), 3);
        let result =
            sequential_search(&probe, &params, &CancelToken::new(), &Silent, &config()).unwrap();
        assert_eq!(result, SearchResult::NotFound);
        assert_eq!(probe.calls(), 3 + 9 + 27);
    }

    #[test]
    fn stops_at_first_match() {
        // a, b, aa, ab, ba: the fifth candidate.
        let probe = FakeProbe::accepting("ba");
        let params = BruteForceParams::new(Alphabet::custom("ab"), 2);
        let result =
            sequential_search(&probe, &params, &CancelToken::new(), &Silent, &config()).unwrap();
        assert_eq!(result.password(), Some("ba"));
        assert_eq!(probe.calls(), 5);
        assert_eq!(*probe.seen.lock().unwrap(), vec!["a", "b", "aa", "ab", "ba"]);
    }

    #[test]
    fn found_result_carries_decrypted_bytes() {
        let probe = FakeProbe::accepting("0007");
        let params = BruteForceParams::new(Charset::Numeric, 4);
        let result =
            sequential_search(&probe, &params, &CancelToken::new(), &Silent, &config()).unwrap();
        match result {
            SearchResult::Found { password, decrypted } => {
                assert_eq!(password, "0007");
                assert_eq!(decrypted, b"plain:0007".to_vec());
            }
            SearchResult::NotFound => panic!("expected a match"),
        }
        assert_eq!(probe.calls(), 10 + 100 + 1_000 + 8);
    }

    struct CancellingProbe {
        after: usize,
        token: CancelToken,
        inner: FakeProbe,
    }

    impl Probe for CancellingProbe {
        fn check(&self, candidate: &str) -> bool {
            let hit = self.inner.check(candidate);
            if self.inner.calls.load(Ordering::SeqCst) == self.after {
                self.token.cancel();
            }
            hit
        }

        fn unlock(&self, password: &str) -> std::result::Result<Vec<u8>, ProbeError> {
            self.inner.unlock(password)
        }
    }

    #[test]
    fn cancellation_stops_within_one_probe() {
        let token = CancelToken::new();
        let probe = CancellingProbe {
            after: 37,
            token: token.clone(),
            inner: FakeProbe::rejecting(),
        };
        let params = BruteForceParams::new(Charset::Numeric, 3);
        let err = sequential_search(&probe, &params, &token, &Silent, &config()).unwrap_err();
        assert!(matches!(err, RecoverError::Cancelled));
        assert!(probe.inner.calls() <= 38);
    }

    #[test]
    fn pre_cancelled_search_never_probes() {
        let token = CancelToken::new();
        token.cancel();
        let probe = FakeProbe::accepting("a");
        let words = vec!["a".to_string()];
        let err = dictionary_search(&probe, &words, &token, &Silent, &config()).unwrap_err();
        assert!(matches!(err, RecoverError::Cancelled));
        assert_eq!(probe.calls(), 0);
    }

    #[test]
    fn invalid_params_fail_before_probing() {
        let probe = FakeProbe::rejecting();
        let params = BruteForceParams::new(Alphabet::custom(""), 4);
        let err = sequential_search(&probe, &params, &CancelToken::new(), &Silent, &config())
            .unwrap_err();
        assert!(matches!(err, RecoverError::InvalidParameters(_)));
        assert_eq!(probe.calls(), 0);
    }

    #[test]
    fn empty_wordlist_is_not_found() {
        let probe = FakeProbe::accepting("x");
        let result =
            dictionary_search(&probe, &[], &CancelToken::new(), &Silent, &config()).unwrap();
        assert_eq!(result, SearchResult::NotFound);
        assert_eq!(probe.calls(), 0);
    }

    #[test]
    fn dictionary_keeps_list_order() {
        let probe = FakeProbe::accepting("gamma");
        let words: Vec<String> = ["alpha", "beta", "gamma", "delta"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let result =
            dictionary_search(&probe, &words, &CancelToken::new(), &Silent, &config()).unwrap();
        assert_eq!(result.password(), Some("gamma"));
        assert_eq!(*probe.seen.lock().unwrap(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn progress_is_batched() {
        let events = RefCell::new(Vec::new());
        let sink = |event: &ProgressEvent| events.borrow_mut().push(event.clone());
        let probe = FakeProbe::rejecting();
        let params = BruteForceParams::new(Charset::Numeric, 2);
        sequential_search(&probe, &params, &CancelToken::new(), &sink, &config()).unwrap();

        let events = events.into_inner();
        // 110 attempts at the default cadence of 10.
        assert_eq!(events.len(), 11);
        assert_eq!(events[0].attempts, 10);
        assert_eq!(events[0].last_attempt, "9");
        assert_eq!(events.last().map(|e| e.attempts), Some(110));
        assert_eq!(events.last().map(|e| e.last_attempt.as_str()), Some("99"));
    }

    #[test]
    fn dictionary_cadence_is_configurable() {
        let count = RefCell::new(0);
        let sink = |_: &ProgressEvent| *count.borrow_mut() += 1;
        let probe = FakeProbe::rejecting();
        let words: Vec<String> = (0..12).map(|i| i.to_string()).collect();
        let config = SearchConfig {
            dictionary_cadence: 3,
            ..SearchConfig::default()
        };
        dictionary_search(&probe, &words, &CancelToken::new(), &sink, &config).unwrap();
        assert_eq!(count.into_inner(), 4);
    }
}
