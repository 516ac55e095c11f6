//! Parallel search: disjoint batches on a worker pool, one coordinator.
//!
//! Workers share nothing mutable. Each one walks its own batch in order and
//! talks to the coordinator only through a channel; the coordinator owns every
//! counter. On the first success it raises the stop flag, stops forwarding
//! progress, and waits for the pool scope to drain before unlocking the
//! document, so no worker outlives the call.
//!
//! The password returned is the first success the coordinator receives, which
//! is not necessarily the earliest matching candidate in list order.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, trace, warn};
use rayon::ThreadPoolBuilder;

use super::{BruteForceParams, SearchResult, resolve};
use crate::cancel::CancelToken;
use crate::charset::Alphabet;
use crate::config::{SearchConfig, cadence};
use crate::error::{RecoverError, Result};
use crate::generator::{Enumerator, combinations};
use crate::probe::Probe;
use crate::progress::{ProgressEvent, ProgressSink};

/// Smallest index range handed to one worker during parallel brute force.
const MIN_RANGE: u64 = 1000;
/// Index ranges per worker thread and length; keeps idle threads fed.
const RANGES_PER_THREAD: u64 = 4;

/// Slice of the candidate space owned by one worker.
#[derive(Debug, Clone)]
enum WorkerBatch<'a> {
    Words(&'a [String]),
    Range {
        alphabet: &'a Alphabet,
        len: usize,
        start: u64,
        count: u64,
    },
}

/// Worker to coordinator. `attempts` is cumulative for the batch.
#[derive(Debug)]
enum WorkerMessage {
    Progress {
        batch: usize,
        attempts: u64,
        last_attempt: String,
    },
    Success {
        batch: usize,
        password: String,
    },
    Exhausted {
        batch: usize,
        attempts: u64,
        last_attempt: Option<String>,
    },
    /// Left the batch early on a stop request or cancellation.
    Halted {
        batch: usize,
        attempts: u64,
    },
    Fault {
        batch: usize,
        reason: String,
    },
}

/// How the coordinator's receive loop ended.
enum Settled {
    Found(String),
    Exhausted,
    Cancelled,
}

/// Splits `len` items into at most `workers` contiguous, near-equal ranges.
/// The last range absorbs the remainder; no range is empty.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, len);
    let size = len / workers;

    (0..workers)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == workers { len } else { start + size };
            start..end
        })
        .collect()
}

/// Splits `words` across the worker pool and returns the first match any
/// worker reports.
///
/// An empty list resolves to `NotFound` without starting a pool.
pub fn parallel_dictionary_search<P, S>(
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

    let ranges = partition(words.len(), config.worker_count());
    let threads = ranges.len();
    let batches: Vec<WorkerBatch<'_>> = ranges
        .into_iter()
        .map(|range| WorkerBatch::Words(&words[range]))
        .collect();

    info!(
        "parallel dictionary search over {} candidates with {} workers",
        words.len(),
        threads
    );
    coordinate(probe, batches, threads, cancel, progress, config)
}

/// Brute force with every length split into index ranges across the pool.
/// Shorter lengths are queued first.
pub fn parallel_brute_force<P, S>(
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
    let total = params
        .space_size()
        .filter(|&n| n <= u64::MAX as u128)
        .ok_or(RecoverError::SearchSpaceTooLarge)?;

    let threads = config.worker_count();
    let mut batches: Vec<WorkerBatch<'_>> = Vec::new();
    for len in params.min_len..=params.max_len {
        let combos = combinations(params.alphabet.len(), len)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or(RecoverError::SearchSpaceTooLarge)?;
        let chunk = MIN_RANGE.max(combos / (threads as u64 * RANGES_PER_THREAD));

        let mut start = 0;
        while start < combos {
            let end = combos.min(start + chunk);
            batches.push(WorkerBatch::Range {
                alphabet: &params.alphabet,
                len,
                start,
                count: end - start,
            });
            start = end;
        }
    }

    info!(
        "parallel brute force over {} candidates in {} ranges with {} workers",
        total,
        batches.len(),
        threads
    );
    coordinate(probe, batches, threads, cancel, progress, config)
}

fn coordinate<P, S>(
    probe: &P,
    batches: Vec<WorkerBatch<'_>>,
    threads: usize,
    cancel: &CancelToken,
    progress: &S,
    config: &SearchConfig,
) -> Result<SearchResult>
where
    P: Probe + ?Sized,
    S: ProgressSink + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(RecoverError::Cancelled);
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("probe-{i}"))
        .build()?;

    let stop = AtomicBool::new(false);
    let step = cadence(config.worker_cadence);
    let batch_count = batches.len();
    let (sender, receiver) = crossbeam_channel::unbounded::<WorkerMessage>();

    // The scope returns only after every spawned worker has finished.
    let settled = pool.in_place_scope(|scope| {
        for (index, batch) in batches.into_iter().enumerate() {
            let sender = sender.clone();
            let stop = &stop;
            scope.spawn(move |_| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    run_batch(probe, index, batch, stop, cancel, step, &sender)
                }));
                if let Err(payload) = outcome {
                    let _ = sender.send(WorkerMessage::Fault {
                        batch: index,
                        reason: panic_reason(&*payload),
                    });
                }
            });
        }
        drop(sender);

        collect(receiver, batch_count, &stop, progress)
    });

    match settled {
        Settled::Found(password) => resolve(probe, password),
        Settled::Exhausted => Ok(SearchResult::NotFound),
        Settled::Cancelled => Err(RecoverError::Cancelled),
    }
}

/// Coordinator loop. Consumes `receiver` so that late messages from workers
/// still winding down are dropped rather than reported.
fn collect<S>(
    receiver: Receiver<WorkerMessage>,
    batch_count: usize,
    stop: &AtomicBool,
    progress: &S,
) -> Settled
where
    S: ProgressSink + ?Sized,
{
    let mut tested = vec![0u64; batch_count];
    let mut total: u64 = 0;
    let mut finished = 0;
    let mut halted = 0;

    let mut record = |batch: usize, attempts: u64| -> u64 {
        total += attempts.saturating_sub(tested[batch]);
        tested[batch] = attempts;
        total
    };

    while finished < batch_count {
        let Ok(message) = receiver.recv() else {
            // Every sender is gone; nothing more can arrive.
            break;
        };

        match message {
            WorkerMessage::Success { batch, password } => {
                stop.store(true, Ordering::Release);
                info!("worker {batch} found the password");
                return Settled::Found(password);
            }
            WorkerMessage::Progress {
                batch,
                attempts,
                last_attempt,
            } => {
                let attempts = record(batch, attempts);
                progress.report(&ProgressEvent {
                    last_attempt,
                    attempts,
                });
            }
            WorkerMessage::Exhausted {
                batch,
                attempts,
                last_attempt,
            } => {
                finished += 1;
                let attempts = record(batch, attempts);
                trace!("batch {batch} exhausted, {finished}/{batch_count} done");
                if let Some(last_attempt) = last_attempt {
                    progress.report(&ProgressEvent {
                        last_attempt,
                        attempts,
                    });
                }
            }
            WorkerMessage::Halted { batch, attempts } => {
                finished += 1;
                halted += 1;
                record(batch, attempts);
                trace!("batch {batch} halted after {attempts} attempts");
            }
            WorkerMessage::Fault { batch, reason } => {
                finished += 1;
                warn!("worker for batch {batch} failed: {reason}");
            }
        }
    }

    debug!("all {batch_count} batches settled after {total} attempts");
    if halted > 0 {
        Settled::Cancelled
    } else {
        Settled::Exhausted
    }
}

fn run_batch<P>(
    probe: &P,
    index: usize,
    batch: WorkerBatch<'_>,
    stop: &AtomicBool,
    cancel: &CancelToken,
    step: u64,
    sender: &Sender<WorkerMessage>,
) where
    P: Probe + ?Sized,
{
    match batch {
        WorkerBatch::Words(words) => {
            run_worker(probe, index, words, stop, cancel, step, sender)
        }
        WorkerBatch::Range {
            alphabet,
            len,
            start,
            count,
        } => {
            let candidates = Enumerator::starting_at(alphabet, len, start).take(count as usize);
            run_worker(probe, index, candidates, stop, cancel, step, sender)
        }
    }
}

/// Worker body: probe each candidate of one batch in order.
fn run_worker<P, I>(
    probe: &P,
    batch: usize,
    candidates: I,
    stop: &AtomicBool,
    cancel: &CancelToken,
    step: u64,
    sender: &Sender<WorkerMessage>,
) where
    P: Probe + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut attempts: u64 = 0;
    let mut last: Option<I::Item> = None;

    for candidate in candidates {
        if stop.load(Ordering::Acquire) || cancel.is_cancelled() {
            let _ = sender.send(WorkerMessage::Halted { batch, attempts });
            return;
        }

        if probe.check(candidate.as_ref()) {
            let _ = sender.send(WorkerMessage::Success {
                batch,
                password: candidate.as_ref().to_string(),
            });
            return;
        }

        attempts += 1;
        if attempts % step == 0 {
            let _ = sender.send(WorkerMessage::Progress {
                batch,
                attempts,
                last_attempt: candidate.as_ref().to_string(),
            });
        }
        last = Some(candidate);
    }

    let _ = sender.send(WorkerMessage::Exhausted {
        batch,
        attempts,
        last_attempt: last.map(|c| c.as_ref().to_string()),
    });
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
