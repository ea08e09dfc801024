//! # Report Module - End-of-Session Diagnostics
//!
//! Built exactly once, when a session finishes. The report compares the final
//! typed text with the target text in two ways:
//!
//! - **Letters**: position by position over the shorter of the two texts. Every
//!   mismatch counts against the character that was *expected* there, so the list
//!   names the letters the user struggles with rather than the keys they hit.
//! - **Words**: whitespace token `i` against target word `i`.
//!
//! ```rust
//! use tally::{Configuration, SessionReport, WordSequence, WrongWords};
//!
//! let words = WordSequence::new(["cat", "dog", "bird"]).unwrap();
//! let report = SessionReport::build("cat xog bird ", &words, &Configuration::default());
//!
//! assert_eq!(report.wrong_letter_frequency[0].char, 'd');
//! assert!(matches!(report.wrong_words, Some(WrongWords::Listed(ref list)) if list.len() == 1));
//! assert_eq!(report.words_correct, 2);
//! ```

use std::collections::HashMap;

use crate::{Configuration, WordSequence};

/// How often an expected character was mistyped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterCount {
    pub char: char,
    pub count: usize,
}

/// A committed token that differs from its target word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMismatch {
    pub expected: String,
    pub typed: String,
}

/// The mismatched words, or only their number when there are too many to list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrongWords {
    Listed(Vec<WordMismatch>),
    Count(usize),
}

impl WrongWords {
    /// Number of mismatched words, listed or not
    pub fn len(&self) -> usize {
        match self {
            Self::Listed(list) => list.len(),
            Self::Count(count) => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Diagnostic summary of one finished session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Most mistyped expected characters, descending by count
    pub wrong_letter_frequency: Vec<LetterCount>,
    /// `None` when every compared word matched
    pub wrong_words: Option<WrongWords>,
    /// Compared tokens equal to their target word
    pub words_correct: usize,
    /// Whitespace tokens in the final text
    pub words_typed: usize,
}

impl SessionReport {
    pub fn build(text: &str, words: &WordSequence, config: &Configuration) -> Self {
        let (mismatches, words_correct, words_typed) = word_diff(text, words);

        let wrong_words = match mismatches.len() {
            0 => None,
            count if count > config.word_list_limit => Some(WrongWords::Count(count)),
            _ => Some(WrongWords::Listed(mismatches)),
        };

        Self {
            wrong_letter_frequency: letter_frequency(
                text,
                &words.target_text(),
                config.letter_report_limit,
            ),
            wrong_words,
            words_correct,
            words_typed,
        }
    }
}

/// Mistyped expected characters, top `limit` by count
///
/// Equal counts keep the order in which the letters were first mistyped.
pub fn letter_frequency(typed: &str, target: &str, limit: usize) -> Vec<LetterCount> {
    let mut counts: Vec<LetterCount> = Vec::new();
    let mut slots: HashMap<char, usize> = HashMap::new();

    for (typed, expected) in typed.chars().zip(target.chars()) {
        if typed == expected {
            continue;
        }

        let slot = *slots.entry(expected).or_insert_with(|| {
            counts.push(LetterCount {
                char: expected,
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }

    // Stable: ties stay in first-occurrence order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

// Mismatched words in order, plus the correct and typed word counts
fn word_diff(text: &str, words: &WordSequence) -> (Vec<WordMismatch>, usize, usize) {
    let mut mismatches = Vec::new();
    let mut words_correct = 0;

    for (typed, expected) in text.split_whitespace().zip(words.iter()) {
        if typed == expected {
            words_correct += 1;
        } else {
            mismatches.push(WordMismatch {
                expected: expected.to_string(),
                typed: typed.to_string(),
            });
        }
    }

    (mismatches, words_correct, text.split_whitespace().count())
}
