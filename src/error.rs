use thiserror::Error;

use crate::probe::ProbeError;

/// Errors surfaced by a password search.
///
/// A wrong candidate is never an error; it only advances the search.
#[derive(Error, Debug)]
pub enum RecoverError {
    /// Rejected before any candidate was probed.
    #[error("invalid search parameters: {0}")]
    InvalidParameters(String),

    /// The caller aborted the search before it completed.
    #[error("search cancelled")]
    Cancelled,

    #[error("search space too large to partition")]
    SearchSpaceTooLarge,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to initialize thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The found password did not unlock the document on the final pass.
    #[error("unexpected error re-opening PDF with discovered password: {0}")]
    Unlock(#[from] ProbeError),
}

pub type Result<T> = std::result::Result<T, RecoverError>;
