//! Password recovery for encrypted PDF documents.
//!
//! Candidates come from brute-force enumeration over an alphabet
//! ([`generator::Enumerator`]) or from a wordlist ([`wordlist`]). Each one is
//! handed to a [`Probe`], which answers whether it opens the document. A
//! search runs either on the caller's thread with cooperative yielding and a
//! [`CancelToken`], or across a worker pool that stops on the first success.
//!
//! ```no_run
//! use pdf_pwrecover::{BruteForceParams, Charset, PdfProbe, SearchJob, Silent, Strategy};
//!
//! let bytes = std::fs::read("locked.pdf")?;
//! let probe = PdfProbe::from_bytes(&bytes)?;
//! let params = BruteForceParams::new(Charset::Numeric, 4);
//! let result = SearchJob::new(&probe, Strategy::BruteForce(params)).run(&Silent)?;
//! println!("{:?}", result.password());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cancel;
pub mod charset;
pub mod config;
pub mod error;
pub mod generator;
pub mod job;
pub mod probe;
pub mod progress;
pub mod search;
pub mod wordlist;

pub use cancel::CancelToken;
pub use charset::{Alphabet, Charset, Classes};
pub use config::SearchConfig;
pub use error::{RecoverError, Result};
pub use generator::{Enumerator, search_space_size};
pub use job::{SearchJob, Strategy};
pub use probe::{PdfProbe, Probe, ProbeError};
pub use progress::{ProgressEvent, ProgressSink, Silent};
pub use search::{
    BruteForceParams, SearchResult, dictionary_search, parallel_brute_force,
    parallel_dictionary_search, sequential_search,
};
pub use wordlist::WordlistMode;
