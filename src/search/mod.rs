//! Search strategies.
//!
//! `sequential` runs on the caller's thread and yields between progress
//! reports; `parallel` spreads disjoint batches over a worker pool and
//! resolves on the first success any worker reports.

mod parallel;
mod sequential;

pub use parallel::{parallel_brute_force, parallel_dictionary_search, partition};
pub use sequential::{dictionary_search, sequential_search};

use crate::charset::Alphabet;
use crate::error::{RecoverError, Result};
use crate::generator::{self, Enumerator};
use crate::probe::Probe;

/// Terminal outcome of a search that was not cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Found {
        password: String,
        decrypted: Vec<u8>,
    },
    NotFound,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }

    pub fn password(&self) -> Option<&str> {
        match self {
            SearchResult::Found { password, .. } => Some(password),
            SearchResult::NotFound => None,
        }
    }
}

/// Alphabet and length range for brute-force enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BruteForceParams {
    pub alphabet: Alphabet,
    pub min_len: usize,
    pub max_len: usize,
}

impl BruteForceParams {
    pub fn new(alphabet: impl Into<Alphabet>, max_len: usize) -> Self {
        BruteForceParams {
            alphabet: alphabet.into(),
            min_len: 1,
            max_len,
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.alphabet.is_empty() {
            return Err(RecoverError::InvalidParameters(
                "the candidate alphabet is empty".into(),
            ));
        }
        if self.max_len == 0 {
            return Err(RecoverError::InvalidParameters(
                "maximum length must be at least 1".into(),
            ));
        }
        if self.min_len > self.max_len {
            return Err(RecoverError::InvalidParameters(format!(
                "minimum length ({}) must be less than or equal to maximum length ({})",
                self.min_len, self.max_len
            )));
        }
        Ok(())
    }

    pub fn candidates(&self) -> Enumerator {
        Enumerator::new(&self.alphabet, self.min_len, self.max_len)
    }

    /// Candidate count, `None` if it overflows `u128`.
    pub fn space_size(&self) -> Option<u128> {
        generator::search_space_size(self.alphabet.len(), self.min_len, self.max_len)
    }
}

/// Runs the full decryption for a found password.
fn resolve<P: Probe + ?Sized>(probe: &P, password: String) -> Result<SearchResult> {
    let decrypted = probe.unlock(&password)?;
    Ok(SearchResult::Found {
        password,
        decrypted,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Charset;

    #[test]
    fn params_reject_degenerate_ranges() {
        assert!(BruteForceParams::new(Alphabet::custom(""), 3).validate().is_err());
        assert!(BruteForceParams::new(Charset::Numeric, 0).validate().is_err());
        assert!(
            BruteForceParams::new(Charset::Numeric, 2)
                .with_min_len(3)
                .validate()
                .is_err()
        );
        assert!(BruteForceParams::new(Charset::Numeric, 4).validate().is_ok());
    }

    #[test]
    fn params_size_the_space() {
        let params = BruteForceParams::new(Charset::Numeric, 4).with_min_len(2);
        assert_eq!(params.space_size(), Some(100 + 1_000 + 10_000));
        assert_eq!(params.candidates().next().as_deref(), Some("00"));
    }

    #[test]
    fn failed_unlock_keeps_the_probe_error() {
        use std::error::Error as _;

        use crate::probe::ProbeError;
        use testing::FakeProbe;

        let err = resolve(&FakeProbe::rejecting(), "0042".to_string()).unwrap_err();
        assert!(matches!(err, RecoverError::Unlock(ProbeError::IncorrectPassword)));
        assert!(err.source().is_some());
    }
}
