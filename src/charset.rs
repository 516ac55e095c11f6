//! Symbol classes and the ordered alphabets enumerated by brute force.

use clap::ValueEnum;

pub const DIGITS: &str = "0123456789";
pub const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Extended symbol characters that can be included in the brute-force alphabet.
pub const SYMBOLS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '-', '_', '=', '+', '[', ']', '{', '}', '|',
    '\\', ':', ';', '"', '\'', ',', '.', '<', '>', '/', '?', '`', '~',
];

/// Named symbol class, each mapping to a fixed ordered alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Charset {
    Numeric,
    AlphaLower,
    AlphaMixed,
    Alphanumeric,
    AllPrintable,
}

impl Charset {
    pub fn alphabet(self) -> Alphabet {
        let classes = match self {
            Charset::Numeric => Classes::DIGITS,
            Charset::AlphaLower => Classes::LOWER,
            Charset::AlphaMixed => Classes::LOWER | Classes::UPPER,
            Charset::Alphanumeric => Classes::DIGITS | Classes::LOWER | Classes::UPPER,
            Charset::AllPrintable => {
                Classes::DIGITS | Classes::LOWER | Classes::UPPER | Classes::SYMBOLS
            }
        };
        Alphabet::from_classes(classes)
    }
}

/// Symbol classes selectable individually from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classes(u8);

impl Classes {
    pub const DIGITS: Classes = Classes(0b0001);
    pub const LOWER: Classes = Classes(0b0010);
    pub const UPPER: Classes = Classes(0b0100);
    pub const SYMBOLS: Classes = Classes(0b1000);

    pub fn contains(self, other: Classes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Classes {
    type Output = Classes;

    fn bitor(self, rhs: Classes) -> Classes {
        Classes(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Classes {
    fn bitor_assign(&mut self, rhs: Classes) {
        self.0 |= rhs.0;
    }
}

/// An ordered, duplicate-free list of symbols.
///
/// Order is significant: it fixes the enumeration order of every candidate
/// generated over this alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Digits, then lowercase, then uppercase, then symbols.
    pub fn from_classes(classes: Classes) -> Self {
        let mut symbols: Vec<char> = Vec::new();
        if classes.contains(Classes::DIGITS) {
            symbols.extend(DIGITS.chars());
        }
        if classes.contains(Classes::LOWER) {
            symbols.extend(LOWER.chars());
        }
        if classes.contains(Classes::UPPER) {
            symbols.extend(UPPER.chars());
        }
        if classes.contains(Classes::SYMBOLS) {
            symbols.extend(SYMBOLS.iter().copied());
        }
        Alphabet { symbols }
    }

    /// Keeps the first occurrence of every character, in input order.
    pub fn custom(chars: &str) -> Self {
        let mut symbols: Vec<char> = Vec::with_capacity(chars.len());
        for ch in chars.chars() {
            if !symbols.contains(&ch) {
                symbols.push(ch);
            }
        }
        Alphabet { symbols }
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl From<Charset> for Alphabet {
    fn from(charset: Charset) -> Self {
        charset.alphabet()
    }
}
