//! Character trigram model for pseudo-words
//!
//! Trained in memory on a lexicon: for every pair of preceding characters it
//! keeps a smoothed distribution over the next one. Sampling from it yields
//! words that read like the training language without being in it.

use std::collections::{HashMap, HashSet};

use rand::{Rng, seq::IndexedRandom};

// Word boundary markers, never part of a normalized word
const START: char = '\u{0}';
const END: char = '\u{1}';

pub const MIN_WORD_LEN: usize = 2;
pub const MAX_WORD_LEN: usize = 14;
pub const DEFAULT_SMOOTHING: f64 = 0.5;

const ATTEMPTS_PER_WORD: usize = 50;
const ATTEMPTS_PER_REQUESTED_WORD: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct TrigramModel {
    transitions: HashMap<(char, char), Vec<(char, f64)>>,
}

// Lowercase letters only
fn normalize(word: &str) -> String {
    word.chars()
        .flat_map(char::to_lowercase)
        .filter(|char| char.is_alphabetic())
        .collect()
}

impl TrigramModel {
    /// Train on `words` with add-`smoothing` smoothing
    pub fn train<I, S>(words: I, smoothing: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Vecs instead of maps keep followers in first-seen order
        let mut counts: HashMap<(char, char), Vec<(char, usize)>> = HashMap::new();

        for word in words {
            let word = normalize(word.as_ref());
            if word.is_empty() {
                continue;
            }

            let sequence: Vec<char> = [START, START]
                .into_iter()
                .chain(word.chars())
                .chain([END])
                .collect();

            for window in sequence.windows(3) {
                let followers = counts.entry((window[0], window[1])).or_default();
                match followers.iter_mut().find(|(char, _)| *char == window[2]) {
                    Some((_, count)) => *count += 1,
                    None => followers.push((window[2], 1)),
                }
            }
        }

        let transitions = counts
            .into_iter()
            .map(|(key, followers)| {
                let seen: usize = followers.iter().map(|(_, count)| count).sum();
                let total = seen as f64 + smoothing * (followers.len() + 1) as f64;
                let probabilities = followers
                    .into_iter()
                    .map(|(char, count)| (char, (count as f64 + smoothing) / total))
                    .collect();
                (key, probabilities)
            })
            .collect();

        Self { transitions }
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Sample one word of `MIN_WORD_LEN..=MAX_WORD_LEN` characters
    pub fn generate_word<R: Rng>(&self, rng: &mut R) -> Option<String> {
        for _ in 0..ATTEMPTS_PER_WORD {
            let mut word = String::new();
            let mut length = 0;
            let (mut first, mut second) = (START, START);

            while let Some(followers) = self.transitions.get(&(first, second)) {
                let Ok((next, _)) = followers.choose_weighted(rng, |(_, weight)| *weight) else {
                    break;
                };
                if *next == END {
                    break;
                }

                word.push(*next);
                length += 1;
                if length >= MAX_WORD_LEN {
                    break;
                }
                (first, second) = (second, *next);
            }

            if (MIN_WORD_LEN..=MAX_WORD_LEN).contains(&length) {
                return Some(word);
            }
        }

        None
    }

    /// Sample up to `count` distinct words
    ///
    /// May return fewer when the model keeps producing duplicates or words of
    /// the wrong length.
    pub fn generate<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut words = Vec::with_capacity(count);
        let mut seen = HashSet::new();

        for _ in 0..count * ATTEMPTS_PER_REQUESTED_WORD {
            if words.len() >= count {
                break;
            }
            if let Some(word) = self.generate_word(rng)
                && seen.insert(word.clone())
            {
                words.push(word);
            }
        }

        words
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::generator::lexicon;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Ёлка!"), "ёлка");
        assert_eq!(normalize("don't"), "dont");
        assert_eq!(normalize("42"), "");
    }

    #[test]
    fn test_train_probabilities() {
        let model = TrigramModel::train(["ab", "ac"], DEFAULT_SMOOTHING);

        // After two starts, "a" was seen twice: (2 + 0.5) / (2 + 0.5 * 2)
        let followers = &model.transitions[&(START, START)];
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].0, 'a');
        assert!((followers[0].1 - 2.5 / 3.0).abs() < f64::EPSILON);

        // "b" and "c" follow "a" once each
        let followers = &model.transitions[&(START, 'a')];
        assert_eq!(followers.iter().map(|(char, _)| *char).collect::<Vec<_>>(), vec!['b', 'c']);
        assert!(followers.iter().all(|(_, weight)| (*weight - 1.5 / 3.5).abs() < f64::EPSILON));
    }

    #[test]
    fn test_empty_model_generates_nothing() {
        let model = TrigramModel::train(["1", ""], DEFAULT_SMOOTHING);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(model.is_empty());
        assert_eq!(model.generate_word(&mut rng), None);
        assert!(model.generate(10, &mut rng).is_empty());
    }

    #[test]
    fn test_generated_words() {
        let model = TrigramModel::train(lexicon::WORDS_RU, DEFAULT_SMOOTHING);
        let mut rng = StdRng::seed_from_u64(42);
        let words = model.generate(30, &mut rng);

        assert!(!words.is_empty());
        assert!(words.len() <= 30);

        let unique: HashSet<&String> = words.iter().collect();
        assert_eq!(unique.len(), words.len());

        for word in &words {
            let length = word.chars().count();
            assert!((MIN_WORD_LEN..=MAX_WORD_LEN).contains(&length), "{word}");
            assert!(word.chars().all(char::is_alphabetic), "{word}");
        }
    }
}
