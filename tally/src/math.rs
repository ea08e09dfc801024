use std::fmt;

use crate::{CharacterTally, Milliseconds, minutes};

/// Words Per Minute
///
/// Counts committed target words, not characters: a word is a word regardless
/// of its length.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wpm(pub u32);

impl Wpm {
    /// Calculate Words Per Minute
    ///
    /// * `completed_words` - How many target words are fully typed
    /// * `elapsed_ms` - Time since the first keystroke, `None` if the clock never started
    ///
    pub fn calculate(completed_words: usize, elapsed_ms: Option<Milliseconds>) -> Self {
        let Some(elapsed_ms) = elapsed_ms else {
            return Self(0);
        };

        let minutes = minutes(elapsed_ms);
        if minutes == 0.0 {
            return Self(0);
        }

        Self((completed_words as f64 / minutes).round() as u32)
    }
}

impl fmt::Display for Wpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typing accuracy
///
/// The percentage of forward-typed characters that were correct, between 0 and 100.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Accuracy(pub u32);

impl Accuracy {
    /// Calculate typing Accuracy
    ///
    /// 0 until at least one character has been typed.
    pub fn calculate(tally: CharacterTally) -> Self {
        if tally.total_typed == 0 {
            return Self(0);
        }

        let ratio = tally.total_correct as f64 / tally.total_typed as f64;
        Self((ratio * 100.0).round() as u32)
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Whole seconds in `elapsed_ms`
pub fn whole_seconds(elapsed_ms: Milliseconds) -> u64 {
    elapsed_ms / 1000
}

/// Format elapsed time as `m:ss`
pub fn format_clock(elapsed_ms: Milliseconds) -> String {
    let seconds = whole_seconds(elapsed_ms);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
