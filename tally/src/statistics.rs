use crate::{
    CharacterTally, Milliseconds,
    math::{Accuracy, Wpm, format_clock, whole_seconds},
};

/// Metrics recomputed after every accepted edit
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LiveMetrics {
    pub wpm: Wpm,
    pub accuracy: Accuracy,
    /// Target words fully typed so far
    pub completed_words: usize,
    /// `None` until the first keystroke
    pub elapsed_ms: Option<Milliseconds>,
}

impl LiveMetrics {
    pub fn calculate(
        completed_words: usize,
        tally: CharacterTally,
        elapsed_ms: Option<Milliseconds>,
    ) -> Self {
        Self {
            wpm: Wpm::calculate(completed_words, elapsed_ms),
            accuracy: Accuracy::calculate(tally),
            completed_words,
            elapsed_ms,
        }
    }
}

/// Metrics computed once, when the session finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalMetrics {
    pub words_per_minute: Wpm,
    /// In `0..=100`
    pub accuracy_percent: Accuracy,
    pub elapsed_seconds: u64,
    pub elapsed_ms: Milliseconds,
    pub total_chars_typed: usize,
    pub total_chars_correct: usize,
}

impl FinalMetrics {
    /// Final metrics from the frozen elapsed time
    ///
    /// WPM uses the precise milliseconds; `elapsed_seconds` is only the
    /// whole-second display value.
    pub fn calculate(
        completed_words: usize,
        tally: CharacterTally,
        frozen_elapsed_ms: Milliseconds,
    ) -> Self {
        Self {
            words_per_minute: Wpm::calculate(completed_words, Some(frozen_elapsed_ms)),
            accuracy_percent: Accuracy::calculate(tally),
            elapsed_seconds: whole_seconds(frozen_elapsed_ms),
            elapsed_ms: frozen_elapsed_ms,
            total_chars_typed: tally.total_typed,
            total_chars_correct: tally.total_correct,
        }
    }
}

/// What the periodic tick refreshes: the clock and the WPM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockDisplay {
    pub elapsed_ms: Milliseconds,
    /// `m:ss`
    pub formatted: String,
    pub wpm: Wpm,
}

impl ClockDisplay {
    pub fn new(elapsed_ms: Milliseconds, completed_words: usize) -> Self {
        Self {
            elapsed_ms,
            formatted: format_clock(elapsed_ms),
            wpm: Wpm::calculate(completed_words, Some(elapsed_ms)),
        }
    }
}
