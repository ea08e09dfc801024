//! # Reconciler Module - Forward Input Accounting
//!
//! This module compares the user's growing input against the target words and keeps
//! the cumulative character tally that accuracy is derived from.
//!
//! ## Key Responsibilities
//!
//! - **Forward Detection**: Only snapshots that strictly extend the previous one are
//!   tallied. Deletions, paste-replace and reordering leave the tally untouched.
//! - **Per-character Expectation**: Each appended character is compared against the
//!   expected text as it exists right before that character, so a word finished in
//!   the middle of a pasted batch moves the expectation forward in lock-step.
//! - **Monotonic Tallies**: Counters only grow. A deleted mistake stays counted.
//!
//! ## Reconciliation Flow
//!
#![doc = simple_mermaid::mermaid!("../diagrams/reconcile_flow.mmd")]
//!
//! ## Usage Example
//!
//! ```rust
//! use tally::reconciler::InputReconciler;
//! use tally::WordSequence;
//!
//! let words = WordSequence::new(["cat", "dog"]).unwrap();
//! let mut reconciler = InputReconciler::new();
//!
//! reconciler.accept("cax", &words);
//! assert_eq!(reconciler.tally().total_typed, 3);
//! assert_eq!(reconciler.tally().total_correct, 2);
//!
//! // Deleting is invisible to the tally
//! reconciler.accept("ca", &words);
//! assert_eq!(reconciler.tally().total_typed, 3);
//! ```

use crate::{WordSequence, completion};

/// Cumulative character counters for one session
///
/// Invariant: `total_correct <= total_typed`. Both only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterTally {
    /// Every character appended through a forward edit
    pub total_typed: usize,
    /// Appended characters that matched the expected character
    pub total_correct: usize,
}

impl CharacterTally {
    /// Tally the characters `new_text` appends to `previous_text`
    ///
    /// Returns how many characters were tallied; 0 if `new_text` is not a strict
    /// forward extension of `previous_text`.
    ///
    /// ```rust
    /// use tally::{CharacterTally, WordSequence};
    ///
    /// let words = WordSequence::new(["cat", "dog"]).unwrap();
    /// let mut tally = CharacterTally::default();
    ///
    /// // "cat dog" pasted in one go is still compared word by word
    /// assert_eq!(tally.reconcile("", "cat dog", &words), 7);
    /// assert_eq!(tally.total_correct, 7);
    /// ```
    pub fn reconcile(&mut self, previous_text: &str, new_text: &str, words: &WordSequence) -> usize {
        let Some(appended) = forward_extension(previous_text, new_text) else {
            return 0;
        };

        let mut snapshot = String::with_capacity(new_text.len());
        snapshot.push_str(previous_text);
        let mut position = previous_text.chars().count();
        let mut tallied = 0;

        for typed in appended.chars() {
            // Undefined past the expected text: typed, never correct
            let expected = completion::expected_char(&snapshot, words, position);

            self.total_typed += 1;
            if expected == Some(typed) {
                self.total_correct += 1;
            }

            snapshot.push(typed);
            position += 1;
            tallied += 1;
        }

        tallied
    }
}

/// The characters `new_text` appends to `previous_text`, if it strictly extends it
pub fn forward_extension<'a>(previous_text: &str, new_text: &'a str) -> Option<&'a str> {
    new_text
        .strip_prefix(previous_text)
        .filter(|appended| !appended.is_empty())
}

/// Owner of the typed text and its character tally
///
/// Every snapshot handed to [`InputReconciler::accept`] replaces the typed text,
/// whatever its relation to the previous one; only forward extensions move the
/// tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputReconciler {
    /// The last accepted (normalized) snapshot
    text: String,
    tally: CharacterTally,
}

impl InputReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The typed text as of the last accepted snapshot
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tally(&self) -> CharacterTally {
        self.tally
    }

    /// Whether `snapshot` differs from the current typed text
    pub fn changes_text(&self, snapshot: &str) -> bool {
        self.text != snapshot
    }

    /// Reconcile a new snapshot and make it the current typed text
    ///
    /// `snapshot` is expected to be line-break normalized already. Returns the
    /// number of characters tallied.
    pub fn accept(&mut self, snapshot: &str, words: &WordSequence) -> usize {
        let tallied = self.tally.reconcile(&self.text, snapshot, words);
        self.text.clear();
        self.text.push_str(snapshot);
        tallied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> WordSequence {
        WordSequence::new(["cat", "dog", "bird"]).unwrap()
    }

    fn type_one_by_one(text: &str, words: &WordSequence) -> InputReconciler {
        let mut reconciler = InputReconciler::new();
        let mut snapshot = String::new();
        for char in text.chars() {
            snapshot.push(char);
            reconciler.accept(&snapshot, words);
        }
        reconciler
    }

    #[test]
    fn test_forward_extension() {
        assert_eq!(forward_extension("", "c"), Some("c"));
        assert_eq!(forward_extension("ca", "cat "), Some("t "));
        assert_eq!(forward_extension("cat", "cat"), None);
        assert_eq!(forward_extension("cat", "ca"), None);
        assert_eq!(forward_extension("cat", "cot d"), None);
    }

    #[test]
    fn test_correct_typing() {
        let words = words();
        let reconciler = type_one_by_one("cat dog bird", &words);
        assert_eq!(
            reconciler.tally(),
            CharacterTally {
                total_typed: 12,
                total_correct: 12
            }
        );
        assert_eq!(reconciler.text(), "cat dog bird");
    }

    #[test]
    fn test_wrong_character() {
        let words = words();
        let reconciler = type_one_by_one("cat xog", &words);
        assert_eq!(reconciler.tally().total_typed, 7);
        assert_eq!(reconciler.tally().total_correct, 6);
    }

    #[test]
    fn test_non_forward_edits_are_ignored() {
        let words = words();
        let mut reconciler = type_one_by_one("cax", &words);
        let before = reconciler.tally();

        // Deletion
        assert_eq!(reconciler.accept("ca", &words), 0);
        assert_eq!(reconciler.tally(), before);
        assert_eq!(reconciler.text(), "ca");

        // Paste-replace of equal length
        assert_eq!(reconciler.accept("xy", &words), 0);
        assert_eq!(reconciler.tally(), before);

        // Same text again
        assert_eq!(reconciler.accept("xy", &words), 0);
        assert_eq!(reconciler.tally(), before);
    }

    #[test]
    fn test_delete_and_retype_keeps_the_mistake() {
        let words = words();
        let mut reconciler = type_one_by_one("cax", &words);
        reconciler.accept("ca", &words);
        reconciler.accept("cat", &words);

        assert_eq!(reconciler.text(), "cat");
        assert_eq!(reconciler.tally().total_typed, 4);
        assert_eq!(reconciler.tally().total_correct, 3);
    }

    #[test]
    fn test_overflowing_word_is_never_correct() {
        let words = words();
        // "catt": only the delimiter may follow a fully typed word
        let reconciler = type_one_by_one("catt", &words);
        assert_eq!(reconciler.tally().total_typed, 4);
        assert_eq!(reconciler.tally().total_correct, 3);

        // Past the end of the whole sequence
        let reconciler = type_one_by_one("cat dog birdy", &words);
        assert_eq!(reconciler.tally().total_typed, 13);
        assert_eq!(reconciler.tally().total_correct, 12);
    }

    #[test]
    fn test_batch_expectation_moves_with_each_word() {
        let words = words();
        let mut tally = CharacterTally::default();
        // The space at position 3 is only expected once "cat" itself is visible, and
        // "dog" only once the space has committed "cat".
        assert_eq!(tally.reconcile("", "cat dog bird", &words), 12);
        assert_eq!(tally.total_correct, 12);
    }

    #[test]
    fn test_delivery_order_does_not_change_the_tally() {
        let words = words();
        let target = "cat dxg bird ";
        let one_by_one = type_one_by_one(target, &words).tally();

        let mut chunked = InputReconciler::new();
        for end in [2, 5, 6, 11, 13] {
            chunked.accept(&target[..end], &words);
        }

        let mut pasted = CharacterTally::default();
        pasted.reconcile("", target, &words);

        assert_eq!(one_by_one, chunked.tally());
        assert_eq!(one_by_one, pasted);
        // 'x' and the space after the final word are wrong
        assert_eq!(one_by_one.total_typed, 13);
        assert_eq!(one_by_one.total_correct, 11);
    }

    #[test]
    fn test_unicode_positions() {
        let words = WordSequence::new(["дом", "мир"]).unwrap();
        let reconciler = type_one_by_one("дом мер", &words);
        assert_eq!(reconciler.tally().total_typed, 7);
        assert_eq!(reconciler.tally().total_correct, 6);
    }

    #[test]
    fn test_correct_never_exceeds_typed() {
        let words = words();
        let mut reconciler = InputReconciler::new();
        for snapshot in ["c", "ca", "cat", "ca", "cab ", "cab d", "", "zzz", "zzz dog bird"] {
            reconciler.accept(snapshot, &words);
            let tally = reconciler.tally();
            assert!(tally.total_correct <= tally.total_typed);
        }
    }
}
