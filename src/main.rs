//! Command-line entry point for the PDF password recovery utility.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Instant;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;

use pdf_pwrecover::{
    Alphabet, BruteForceParams, CancelToken, Charset, Classes, PdfProbe, RecoverError,
    SearchConfig, SearchJob, SearchResult, Strategy, WordlistMode, wordlist,
};

const EXIT_INVALID: i32 = 1;
const EXIT_NOT_FOUND: i32 = 2;
const EXIT_ERROR: i32 = 3;
const EXIT_CANCELLED: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Enumerate every candidate on one thread
    Brute,
    /// Try a wordlist on one thread
    Dictionary,
    /// Split a wordlist across worker threads
    ParallelDictionary,
    /// Split the enumeration across worker threads
    ParallelBrute,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// CLI arguments supported by pdf-pwrecover.
struct Cli {
    /// Path to the password-protected PDF
    #[arg(short = 'i', long = "input", value_name = "PDF", required = true)]
    input: PathBuf,

    /// Search strategy
    #[arg(long = "mode", value_enum, default_value_t = Mode::Brute)]
    mode: Mode,

    /// Minimum password length to brute-force
    #[arg(long = "min", default_value_t = 1)]
    min: usize,

    /// Maximum password length to brute-force
    #[arg(long = "max", default_value_t = 4)]
    max: usize,

    /// Named candidate alphabet (ignored when a class flag is given)
    #[arg(long = "charset", value_enum, default_value_t = Charset::Numeric)]
    charset: Charset,

    /// Include digits in the candidate alphabet
    #[arg(short = 'd', long = "digit", action = ArgAction::SetTrue)]
    digit: bool,

    /// Include alphabetic characters in the candidate alphabet
    #[arg(short = 'a', long = "alphabet", action = ArgAction::SetTrue)]
    alphabet: bool,

    /// Include common symbols in the candidate alphabet
    #[arg(short = 's', long = "symbol", action = ArgAction::SetTrue)]
    symbol: bool,

    /// Dictionary file with one candidate per line (replaces the built-in list)
    #[arg(long = "wordlist", value_name = "FILE")]
    wordlist: Option<PathBuf>,

    /// Portion of the built-in dictionary to use
    #[arg(long = "wordlist-mode", value_enum, default_value_t = WordlistMode::Full)]
    wordlist_mode: WordlistMode,

    /// Number of worker threads for parallel modes (0 = all cores)
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    threads: usize,

    /// Write the decrypted PDF here once the password is found
    #[arg(short = 'o', long = "output", value_name = "PDF")]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn alphabet(&self) -> Alphabet {
        let mut classes = Classes::default();
        if self.digit {
            classes |= Classes::DIGITS;
        }
        if self.alphabet {
            classes |= Classes::LOWER | Classes::UPPER;
        }
        if self.symbol {
            classes |= Classes::SYMBOLS;
        }

        if classes.is_empty() {
            self.charset.alphabet()
        } else {
            Alphabet::from_classes(classes)
        }
    }

    fn words(&self) -> anyhow::Result<Vec<String>> {
        match &self.wordlist {
            Some(path) => wordlist::load(path)
                .map_err(|e| anyhow!("failed to read wordlist {}: {e}", path.display())),
            None => Ok(wordlist::build(self.wordlist_mode)),
        }
    }

    fn strategy(&self) -> anyhow::Result<Strategy> {
        let brute = || {
            let params = BruteForceParams::new(self.alphabet(), self.max).with_min_len(self.min);
            params.validate().map_err(|e| anyhow!("{e}"))?;
            Ok::<_, anyhow::Error>(params)
        };

        Ok(match self.mode {
            Mode::Brute => Strategy::BruteForce(brute()?),
            Mode::ParallelBrute => Strategy::ParallelBruteForce(brute()?),
            Mode::Dictionary => Strategy::Dictionary(self.words()?),
            Mode::ParallelDictionary => Strategy::ParallelDictionary(self.words()?),
        })
    }
}

/// Entrypoint that validates flags, loads the document, and runs the search.
fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);

    if args.min > args.max {
        eprintln!(
            "Error: --min ({}) must be less than or equal to --max ({}).",
            args.min, args.max
        );
        exit(EXIT_INVALID);
    }

    let strategy = args.strategy().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        exit(EXIT_INVALID);
    });

    let start = Instant::now();

    println!("PDF: {}", args.input.display());
    println!("Mode: {:?}", args.mode);
    if let Strategy::BruteForce(params) | Strategy::ParallelBruteForce(params) = &strategy {
        println!("Min length: {}", params.min_len);
        println!("Max length: {}", params.max_len);
        println!("Charset size: {}", params.alphabet.len());
    }

    let total_attempts = match strategy.candidate_count() {
        Some(0) => {
            println!("Nothing to try: empty search space.");
            println!("Elapsed: {:.2?}", start.elapsed());
            return;
        }
        Some(n) if n <= u64::MAX as u128 => n as u64,
        _ => {
            eprintln!("Error: total search space too large to track with progress bar.");
            exit(EXIT_INVALID);
        }
    };
    println!("Candidates: {}", total_attempts);

    let probe = load_probe(&args.input).unwrap_or_else(|e| {
        eprintln!("Failed to load PDF: {e:#}");
        exit(EXIT_INVALID);
    });

    if !probe.is_encrypted() {
        println!("Not Encrypted");
        println!("Elapsed: {:.2?}", start.elapsed());
        return;
    }

    let progress = ProgressBar::new(total_attempts);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {percent:>3}% [{wide_bar:.cyan/blue}] {msg} ({eta} remaining)",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let config = SearchConfig::default().with_threads(args.threads);
    let job = SearchJob::new(&probe, strategy).with_config(config);
    if let Err(e) = ctrlc::set_handler(interrupt_handler(job.cancel_token())) {
        warn!("Ctrl-C will not cancel the search: {e}");
    }
    let result = job.run(&progress);

    progress.finish_and_clear();

    let elapsed = start.elapsed();
    let code = report(&result, args.output.as_deref());
    println!("Elapsed: {:.2?}", elapsed);
    if code != 0 {
        exit(code);
    }
}

/// Cancels the running search; installed as the Ctrl-C handler.
fn interrupt_handler(cancel: CancelToken) -> impl Fn() + Send + 'static {
    move || {
        eprintln!("Interrupted, stopping workers...");
        cancel.cancel();
    }
}

/// Prints the outcome and returns the process exit code.
fn report(result: &pdf_pwrecover::Result<SearchResult>, output: Option<&Path>) -> i32 {
    match result {
        Ok(SearchResult::Found {
            password,
            decrypted,
        }) => {
            println!("Password found: {}", password);

            if let Some(output) = output {
                if let Err(e) = write_output(output, decrypted) {
                    eprintln!("Error: {e:#}");
                    return EXIT_ERROR;
                }
                println!("Decrypted PDF written to {}", output.display());
            }

            println!("Done");
            0
        }
        Ok(SearchResult::NotFound) => {
            println!("Password not found in provided search space.");
            EXIT_NOT_FOUND
        }
        Err(RecoverError::Cancelled) => {
            println!("Search cancelled.");
            EXIT_CANCELLED
        }
        Err(e) => {
            eprintln!("Decryption error: {}", e);
            EXIT_ERROR
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_probe(path: &Path) -> anyhow::Result<PdfProbe> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    PdfProbe::from_bytes(&bytes).map_err(|e| anyhow!("parsing {}: {e}", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pdf-pwrecover").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn class_flags_override_charset() {
        let cli = parse(&["-i", "x.pdf", "--charset", "alpha-lower", "-d"]);
        assert_eq!(cli.alphabet(), Charset::Numeric.alphabet());

        let cli = parse(&["-i", "x.pdf", "-d", "-a"]);
        assert_eq!(cli.alphabet(), Charset::Alphanumeric.alphabet());
    }

    #[test]
    fn defaults_to_numeric_brute_force() {
        let cli = parse(&["-i", "x.pdf"]);
        match cli.strategy().unwrap() {
            Strategy::BruteForce(params) => {
                assert_eq!(params.alphabet, Charset::Numeric.alphabet());
                assert_eq!((params.min_len, params.max_len), (1, 4));
            }
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn dictionary_modes_use_wordlist_mode() {
        let cli = parse(&[
            "-i",
            "x.pdf",
            "--mode",
            "parallel-dictionary",
            "--wordlist-mode",
            "quick",
        ]);
        match cli.strategy().unwrap() {
            Strategy::ParallelDictionary(words) => assert_eq!(words.len(), 20),
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn missing_input_is_rejected() {
        assert!(Cli::try_parse_from(["pdf-pwrecover"]).is_err());
    }

    struct Rejecting;

    impl pdf_pwrecover::Probe for Rejecting {
        fn check(&self, _candidate: &str) -> bool {
            false
        }

        fn unlock(&self, _password: &str) -> Result<Vec<u8>, pdf_pwrecover::ProbeError> {
            Err(pdf_pwrecover::ProbeError::IncorrectPassword)
        }
    }

    #[test]
    fn interrupt_cancels_the_job_and_exits_with_four() {
        let params = BruteForceParams::new(Charset::Numeric, 4);
        let job = SearchJob::new(&Rejecting, Strategy::BruteForce(params));
        interrupt_handler(job.cancel_token())();

        let result = job.run(&pdf_pwrecover::Silent);
        assert!(matches!(result, Err(RecoverError::Cancelled)));
        assert_eq!(report(&result, None), EXIT_CANCELLED);
    }

    #[test]
    fn outcomes_map_to_exit_codes() {
        assert_eq!(report(&Ok(SearchResult::NotFound), None), EXIT_NOT_FOUND);
        let found = SearchResult::Found {
            password: "42".into(),
            decrypted: b"%PDF".to_vec(),
        };
        assert_eq!(report(&Ok(found), None), 0);
        let err = Err(RecoverError::SearchSpaceTooLarge);
        assert_eq!(report(&err, None), EXIT_ERROR);
    }
}
