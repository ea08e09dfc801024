//! # Words Module - Target Word Storage
//!
//! A [`WordSequence`] is the ordered list of words a user has to reproduce in
//! one session. It is created once per session and never mutated; a reset
//! replaces it wholesale.
//!
//! Data layout example: `["cat", "dog"]`
//! ```text
//! Words:    [c][a][t]   [d][o][g]
//! Target:   [c][a][t][ ][d][o][g]
//! Offsets:   0  1  2  3  4  5  6
//! ```
//!
//! Positions are counted in `char`s, so multi-byte words (Cyrillic, accented
//! Latin) line up with typed input the same way ASCII does.

/// Ordered, immutable sequence of target words
///
/// Words never contain whitespace: any whitespace inside a supplied entry
/// splits it, and empty entries are dropped. This keeps the target text
/// (words joined by single spaces) consistent with how typed input is
/// tokenized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSequence {
    words: Vec<String>,
}

impl WordSequence {
    /// Create a sequence from supplied words
    ///
    /// Returns `None` if no non-empty word remains.
    ///
    /// ```rust
    /// use tally::WordSequence;
    ///
    /// let words = WordSequence::new(["cat", "dog"]).unwrap();
    /// assert_eq!(words.len(), 2);
    /// assert_eq!(words.target_text(), "cat dog");
    ///
    /// assert!(WordSequence::new(Vec::<String>::new()).is_none());
    /// assert!(WordSequence::new(["", "  "]).is_none());
    /// ```
    pub fn new<I, S>(words: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .flat_map(|word| {
                word.as_ref()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        if words.is_empty() {
            return None;
        }

        Some(Self { words })
    }

    /// Number of words (N)
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Get word by index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Words `[0..count)` joined by single spaces
    pub fn joined_prefix(&self, count: usize) -> String {
        self.words[..count.min(self.words.len())].join(" ")
    }

    /// The full target text: all words joined by single spaces
    pub fn target_text(&self) -> String {
        self.words.join(" ")
    }

    /// Character at `position` of the first `count` words joined by single spaces
    ///
    /// When more words follow the prefix, the separating space after it is part of
    /// the prefix too: it is what the user has to type to commit the last word.
    /// Walks the words instead of building the joined string.
    pub fn char_in_prefix(&self, count: usize, position: usize) -> Option<char> {
        let count = count.min(self.words.len());
        let mut offset = position;
        for (index, word) in self.words[..count].iter().enumerate() {
            if index > 0 {
                if offset == 0 {
                    return Some(' ');
                }
                offset -= 1;
            }

            let len = word.chars().count();
            if offset < len {
                return word.chars().nth(offset);
            }
            offset -= len;
        }

        (count > 0 && count < self.words.len() && offset == 0).then_some(' ')
    }
}
