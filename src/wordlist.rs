//! Dictionary candidates: the built-in common-password list, mutation rules,
//! and user-supplied dictionary files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use log::debug;

use crate::error::Result;

/// Frequently used PDF passwords and defaults, tried before the generated ranges.
const HEAD: &[&str] = &[
    "0000", "1111", "1234", "12345", "123456", "12345678", "111111", "888888", "password", "123",
    "789", "admin", "root", "qwerty", "1q2w3e", "Welcome1", "Pdf123",
];

const TAIL: &[&str] = &[
    "user", "pdf", "unlock", "open", "secret", "secure", "private", "file", "test", "guest",
    "abcd", "zxcv", "asdf", "qwert",
];

const LATEST_YEAR: u32 = 2025;
const YEAR_COUNT: u32 = 30;
const QUICK_LEN: usize = 20;

const RULE_YEARS: &[&str] = &["2023", "2024", "2025", "2026"];
const RULE_SYMBOLS: &[&str] = &["!", "@", "#", "$"];

/// How much of the built-in dictionary to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum WordlistMode {
    /// The first few entries of the common list.
    Quick,
    /// The common list as is.
    #[default]
    Full,
    /// The common list expanded by every mutation rule.
    Turbo,
}

/// The built-in list: common passwords, `0000`-`0099`, `000000`-`000099`,
/// the last thirty years, then common words.
pub fn common_passwords() -> Vec<String> {
    let mut words: Vec<String> = HEAD.iter().map(|w| w.to_string()).collect();
    words.extend((0..100).map(|i| format!("{i:04}")));
    words.extend((0..100).map(|i| format!("{i:06}")));
    words.extend((0..YEAR_COUNT).map(|i| (LATEST_YEAR - i).to_string()));
    words.extend(TAIL.iter().map(|w| w.to_string()));
    words
}

/// Same mode, same list, same order.
pub fn build(mode: WordlistMode) -> Vec<String> {
    let mut words = common_passwords();
    match mode {
        WordlistMode::Quick => {
            words.truncate(QUICK_LEN);
            words
        }
        WordlistMode::Full => words,
        WordlistMode::Turbo => apply_rules(&words),
    }
}

/// Expands every word with its capitalized form and year, `@year`, symbol and
/// `123` suffixes, then drops repeats keeping first occurrences.
pub fn apply_rules<S: AsRef<str>>(base: &[S]) -> Vec<String> {
    let mut mutated: Vec<String> = Vec::with_capacity(base.len() * 14);

    for word in base {
        let word = word.as_ref();
        mutated.push(word.to_string());
        mutated.push(capitalize(word));
        mutated.extend(RULE_YEARS.iter().map(|y| format!("{word}{y}")));
        mutated.extend(RULE_YEARS.iter().map(|y| format!("{word}@{y}")));
        mutated.extend(RULE_SYMBOLS.iter().map(|s| format!("{word}{s}")));
        mutated.push(format!("{word}123"));
    }

    dedup(mutated)
}

/// Reads a dictionary file with one candidate per line.
///
/// Line endings are stripped, blank lines skipped and repeats dropped; the
/// remaining order is the file order.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let words: Vec<String> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    let words = dedup(words);
    debug!("loaded {} candidates from {}", words.len(), path.display());
    Ok(words)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn dedup(words: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(words.len());
    words
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .collect()
}
