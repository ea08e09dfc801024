//! Highlighting signal for presentation layers
//!
//! A [`Highlight`] is a snapshot of how every target word relates to the typed
//! text. It is plain data: terminal, web or test renderers all consume the same
//! value.

use crate::{WordSequence, completion};

/// State of one target word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordStatus {
    /// Not reached yet
    Pending,
    /// Being typed
    Current,
    /// Committed and equal to the target word
    Correct,
    /// Committed with a mismatch
    Wrong,
}

/// State of one character of the word in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterStatus {
    Correct,
    Wrong,
    Untyped,
}

/// Per-word and per-character highlight of the current snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    /// One entry per target word
    pub words: Vec<WordStatus>,
    /// Index of the word in progress, `None` once every word is committed
    pub current_word: Option<usize>,
    /// Status of each target character of the word in progress, followed by
    /// one [`CharacterStatus::Wrong`] per character typed beyond it
    pub characters: Vec<CharacterStatus>,
    /// Cursor position inside the word in progress, in characters
    pub cursor: usize,
}

impl Highlight {
    /// Highlight `text` against `words`
    ///
    /// ```rust
    /// use tally::{CharacterStatus, Highlight, WordSequence, WordStatus};
    ///
    /// let words = WordSequence::new(["cat", "dog"]).unwrap();
    /// let highlight = Highlight::build("cat dx", &words);
    ///
    /// assert_eq!(highlight.words, vec![WordStatus::Correct, WordStatus::Current]);
    /// assert_eq!(
    ///     highlight.characters,
    ///     vec![CharacterStatus::Correct, CharacterStatus::Wrong, CharacterStatus::Untyped]
    /// );
    /// assert_eq!(highlight.cursor, 2);
    /// ```
    pub fn build(text: &str, words: &WordSequence) -> Self {
        let committed = completion::completed_count(text).min(words.len());
        let complete = completion::is_complete(text, words);

        let mut statuses = Vec::with_capacity(words.len());
        for (index, (typed, target)) in text.split_whitespace().zip(words.iter()).enumerate() {
            if index >= committed {
                break;
            }
            statuses.push(if typed == target {
                WordStatus::Correct
            } else {
                WordStatus::Wrong
            });
        }

        if complete && committed < words.len() {
            // The exactly typed final word has no delimiter
            statuses.push(WordStatus::Correct);
            return Self {
                words: statuses,
                ..Self::default()
            };
        }

        let Some(target) = words.get(committed) else {
            return Self {
                words: statuses,
                ..Self::default()
            };
        };

        statuses.push(WordStatus::Current);
        statuses.resize(words.len(), WordStatus::Pending);

        let typed: Vec<char> = completion::current_word(text).chars().collect();
        let mut characters: Vec<CharacterStatus> = target
            .chars()
            .enumerate()
            .map(|(index, expected)| match typed.get(index) {
                Some(char) if *char == expected => CharacterStatus::Correct,
                Some(_) => CharacterStatus::Wrong,
                None => CharacterStatus::Untyped,
            })
            .collect();

        let target_len = characters.len();
        characters.extend(typed.iter().skip(target_len).map(|_| CharacterStatus::Wrong));

        Self {
            words: statuses,
            current_word: Some(committed),
            characters,
            cursor: typed.len(),
        }
    }

    /// Number of characters typed beyond the current target word
    pub fn overflow(&self, words: &WordSequence) -> usize {
        let target_len = self
            .current_word
            .and_then(|index| words.get(index))
            .map_or(0, |word| word.chars().count());
        self.characters.len().saturating_sub(target_len)
    }
}
