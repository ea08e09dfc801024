use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tally::{GenerationMode, Language, SupplyRequest, WordSupplier};

pub mod lexicon;
pub mod model;

use model::TrigramModel;

const MIN_SYLLABLES: usize = 2;
const MAX_SYLLABLES: usize = 4;

fn lexicon(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ru => lexicon::WORDS_RU,
        Language::En => lexicon::WORDS_EN,
    }
}

fn syllables(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ru => lexicon::SYLLABLES_RU,
        Language::En => lexicon::SYLLABLES_EN,
    }
}

/// Real words from the lexicon
///
/// Without replacement while the lexicon is large enough, with replacement
/// beyond that.
pub fn real_words<R: Rng>(count: usize, language: Language, rng: &mut R) -> Vec<String> {
    let words = lexicon(language);

    if count <= words.len() {
        return words
            .choose_multiple(rng, count)
            .map(|word| word.to_string())
            .collect();
    }

    (0..count)
        .filter_map(|_| words.choose(rng))
        .map(|word| word.to_string())
        .collect()
}

/// Pseudo-words glued from 2 to 4 random syllables
pub fn syllable_words<R: Rng>(
    count: usize,
    language: Language,
    rng: &mut R,
) -> Vec<String> {
    let table = syllables(language);
    (0..count)
        .map(|_| {
            let length = rng.random_range(MIN_SYLLABLES..=MAX_SYLLABLES);
            (0..length)
                .filter_map(|_| table.choose(rng).copied())
                .collect::<String>()
        })
        .collect()
}

/// Generates words locally, without any network
///
/// Trigram models are trained on first use per language and kept for later
/// requests.
#[derive(Debug)]
pub struct LocalSupplier<R = StdRng> {
    rng: R,
    models: HashMap<Language, TrigramModel>,
}

impl LocalSupplier<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for LocalSupplier<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> LocalSupplier<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            models: HashMap::new(),
        }
    }

    pub fn generate(&mut self, request: &SupplyRequest) -> Vec<String> {
        let count = request
            .count
            .clamp(SupplyRequest::MIN_COUNT, SupplyRequest::MAX_COUNT);

        let words = match request.mode {
            GenerationMode::Words => real_words(count, request.language, &mut self.rng),
            GenerationMode::Syllable => syllable_words(count, request.language, &mut self.rng),
            GenerationMode::Model => self.model_words(count, request.language),
        };

        tracing::debug!(
            requested = count,
            generated = words.len(),
            mode = %request.mode,
            language = %request.language,
            "generated words"
        );
        words
    }

    // Model output, topped up with real words when the model falls short
    fn model_words(&mut self, count: usize, language: Language) -> Vec<String> {
        let model = self.models.entry(language).or_insert_with(|| {
            tracing::debug!(%language, "training word model");
            TrigramModel::train(lexicon(language), model::DEFAULT_SMOOTHING)
        });

        let mut words = model.generate(count, &mut self.rng);
        if words.len() < count {
            let missing = count - words.len();
            words.extend(real_words(missing, language, &mut self.rng));
        }
        words.truncate(count);
        words
    }
}

impl<R: Rng> WordSupplier for LocalSupplier<R> {
    fn supply(&mut self, request: &SupplyRequest) -> Vec<String> {
        self.generate(request)
    }
}
