//! # Completion Module - Word Commit Detection
//!
//! Derives how far along the word sequence a raw text snapshot is. Nothing here
//! is stored: every value is recomputed from the snapshot, so completion can never
//! drift from the text it describes.
//!
//! ## Rules
//!
//! - The snapshot is split on whitespace runs, empty tokens dropped.
//! - A trailing whitespace commits every token; otherwise the last token is the
//!   word in progress.
//! - The final word also counts as committed once it is typed exactly, since
//!   nothing follows it to delimit it.
//!
//! ```rust
//! use tally::{completion, WordSequence};
//!
//! let words = WordSequence::new(["cat", "dog", "bird"]).unwrap();
//!
//! assert_eq!(completion::completed_count("cat do"), 1);
//! assert_eq!(completion::expected_text("cat do", &words), "cat dog");
//! assert_eq!(completion::completed_word_count("cat dog bird", &words), 3);
//! ```

use crate::WordSequence;

/// Number of whitespace-delimited tokens the user has committed
pub fn completed_count(text: &str) -> usize {
    let tokens = text.split_whitespace().count();
    if tokens == 0 {
        return 0;
    }

    if text.ends_with(char::is_whitespace) {
        tokens
    } else {
        tokens - 1
    }
}

/// The word currently being typed: everything after the last whitespace
pub fn current_word(text: &str) -> &str {
    text.rsplit(char::is_whitespace).next().unwrap_or(text)
}

// How many target words the expected text spans for this snapshot
fn expected_word_span(text: &str, words: &WordSequence) -> usize {
    let committed = completed_count(text);
    if committed >= words.len() {
        words.len()
    } else {
        committed + 1
    }
}

/// Committed words plus the word in progress, joined by single spaces
pub fn expected_text(text: &str, words: &WordSequence) -> String {
    words.joined_prefix(expected_word_span(text, words))
}

/// Character expected at `position` of the snapshot
///
/// This is [`expected_text`] followed by the space that commits the word in
/// progress, when another word follows it. `None` past its end.
pub fn expected_char(text: &str, words: &WordSequence, position: usize) -> Option<char> {
    words.char_in_prefix(expected_word_span(text, words), position)
}

/// Number of target words fully typed, in `0..=N`
///
/// Equals [`completed_count`] (capped at N), except that an exactly typed final
/// word with no trailing delimiter completes the sequence.
pub fn completed_word_count(text: &str, words: &WordSequence) -> usize {
    let total = words.len();
    let committed = completed_count(text);

    if committed >= total {
        return total;
    }

    if committed + 1 == total && words.last() == Some(current_word(text)) {
        return total;
    }

    committed
}

/// Whether the snapshot completes the whole sequence
pub fn is_complete(text: &str, words: &WordSequence) -> bool {
    !words.is_empty() && completed_word_count(text, words) == words.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> WordSequence {
        WordSequence::new(["cat", "dog", "bird"]).unwrap()
    }

    #[test]
    fn test_completed_count() {
        assert_eq!(completed_count(""), 0);
        assert_eq!(completed_count("   "), 0);
        assert_eq!(completed_count("ca"), 0);
        assert_eq!(completed_count("cat"), 0);
        assert_eq!(completed_count("cat "), 1);
        assert_eq!(completed_count("cat d"), 1);
        assert_eq!(completed_count("cat   dog  "), 2);
        assert_eq!(completed_count("cat\tdog"), 1);
    }

    #[test]
    fn test_current_word() {
        assert_eq!(current_word(""), "");
        assert_eq!(current_word("ca"), "ca");
        assert_eq!(current_word("cat "), "");
        assert_eq!(current_word("cat do"), "do");
        assert_eq!(current_word("дом ми"), "ми");
    }

    #[test]
    fn test_expected_text() {
        let words = words();
        assert_eq!(expected_text("", &words), "cat");
        assert_eq!(expected_text("ca", &words), "cat");
        assert_eq!(expected_text("cat ", &words), "cat dog");
        assert_eq!(expected_text("cat dog b", &words), "cat dog bird");
        // More committed tokens than words: the full target
        assert_eq!(expected_text("a b c d e ", &words), "cat dog bird");
    }

    #[test]
    fn test_expected_char() {
        let words = words();
        let cases = [
            ("", "cat "),
            ("c", "cat "),
            ("cat ", "cat dog "),
            ("cat do", "cat dog "),
            ("cat dog bi", "cat dog bird"),
            ("x y z w ", "cat dog bird"),
        ];
        for (text, expected) in cases {
            let expected: Vec<char> = expected.chars().collect();
            for position in 0..expected.len() + 2 {
                assert_eq!(
                    expected_char(text, &words, position),
                    expected.get(position).copied(),
                    "text={text:?} position={position}"
                );
            }
        }
    }

    #[test]
    fn test_completed_word_count() {
        let words = words();
        assert_eq!(completed_word_count("", &words), 0);
        assert_eq!(completed_word_count("ca", &words), 0);
        assert_eq!(completed_word_count("cat dog bir", &words), 2);
        assert_eq!(completed_word_count("cat dog bird", &words), 3);
        assert_eq!(completed_word_count("cat dog bird ", &words), 3);
        // Wrong last word without delimiter is still in progress
        assert_eq!(completed_word_count("cat dog birds", &words), 2);
        // Wrong last word with delimiter is committed anyway
        assert_eq!(completed_word_count("cat dog birds ", &words), 3);
        // Capped at N
        assert_eq!(completed_word_count("a b c d e f ", &words), 3);
    }

    #[test]
    fn test_single_word_terminal_case() {
        let words = WordSequence::new(["hi"]).unwrap();
        assert_eq!(completed_word_count("h", &words), 0);
        assert_eq!(completed_word_count("hi", &words), 1);
        assert!(is_complete("hi", &words));
        assert!(!is_complete("ho", &words));
    }

    #[test]
    fn test_completion_is_monotonic_while_typing_forward() {
        let words = words();
        let target = "cat dog bird";
        let mut previous = 0;
        for end in target.char_indices().map(|(index, _)| index).chain([target.len()]) {
            let count = completed_word_count(&target[..end], &words);
            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(previous, 3);
    }
}
