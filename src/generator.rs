//! Odometer-style enumeration of every string over an alphabet.
//!
//! Candidates come out length-major: all strings of the shortest length in
//! alphabet order, then the next length, and so on. The sequence is lazy and
//! finite but grows exponentially with the maximum length; 62 symbols at
//! length 6 is already more than 56 billion candidates.

use crate::charset::Alphabet;

/// Lazy candidate sequence over an alphabet and a length range.
///
/// The state is the array of alphabet indices of the next candidate. Each call
/// to `next` renders that array and then increments it, carrying leftward;
/// when the leftmost position overflows the length grows by one.
#[derive(Debug, Clone)]
pub struct Enumerator {
    symbols: Vec<char>,
    indices: Vec<usize>,
    max_len: usize,
    done: bool,
}

impl Enumerator {
    /// Every string with length in `min_len..=max_len`. A `min_len` of zero is
    /// treated as one; an empty alphabet or an empty range yields nothing.
    pub fn new(alphabet: &Alphabet, min_len: usize, max_len: usize) -> Self {
        let min_len = min_len.max(1);
        Enumerator {
            symbols: alphabet.symbols().to_vec(),
            indices: vec![0; min_len],
            max_len,
            done: alphabet.is_empty() || max_len == 0 || min_len > max_len,
        }
    }

    /// Strings of exactly `len` symbols, starting from the `index`-th one in
    /// enumeration order. Combine with `take` to walk a disjoint index range.
    pub fn starting_at(alphabet: &Alphabet, len: usize, mut index: u64) -> Self {
        let mut enumerator = Enumerator::new(alphabet, len, len);
        if enumerator.done {
            return enumerator;
        }

        let base = alphabet.len() as u64;
        for slot in enumerator.indices.iter_mut().rev() {
            *slot = (index % base) as usize;
            index /= base;
        }
        // Anything left over means the index is past the last candidate.
        if index > 0 {
            enumerator.done = true;
        }
        enumerator
    }

    fn render(&self) -> String {
        self.indices.iter().map(|&i| self.symbols[i]).collect()
    }

    fn advance(&mut self) {
        let base = self.symbols.len();
        for slot in self.indices.iter_mut().rev() {
            *slot += 1;
            if *slot < base {
                return;
            }
            *slot = 0;
        }

        let next_len = self.indices.len() + 1;
        if next_len > self.max_len {
            self.done = true;
        } else {
            self.indices = vec![0; next_len];
        }
    }
}

impl Iterator for Enumerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let candidate = self.render();
        self.advance();
        Some(candidate)
    }
}

/// Number of candidates with length `min_len..=max_len` over `alphabet_len`
/// symbols, or `None` if the count overflows `u128`.
pub fn search_space_size(alphabet_len: usize, min_len: usize, max_len: usize) -> Option<u128> {
    let mut total: u128 = 0;
    for len in min_len.max(1)..=max_len {
        total = total.checked_add(combinations(alphabet_len, len)?)?;
    }
    Some(total)
}

/// Number of candidates of exactly `len` symbols.
pub fn combinations(alphabet_len: usize, len: usize) -> Option<u128> {
    let exp = u32::try_from(len).ok()?;
    (alphabet_len as u128).checked_pow(exp)
}
