//! Word supply seam
//!
//! The engine never produces words itself. A [`WordSupplier`] answers a
//! [`SupplyRequest`]; an empty answer is tolerated and leaves the session
//! un-started.

use std::fmt;

/// How the supplier should come up with words
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationMode {
    /// Real words from a lexicon
    #[default]
    Words,
    /// Pseudo-words from a language model trained on the lexicon
    Model,
    /// Pseudo-words glued together from syllables
    Syllable,
}

impl GenerationMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::Model => "model",
            Self::Syllable => "syllable",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one word request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SupplyRequest {
    pub count: usize,
    pub mode: GenerationMode,
    pub language: Language,
}

impl SupplyRequest {
    pub const MIN_COUNT: usize = 10;
    pub const MAX_COUNT: usize = 100;
    pub const DEFAULT_COUNT: usize = 25;

    /// Create a request, clamping `count` to the supported range
    pub fn new(count: usize, mode: GenerationMode, language: Language) -> Self {
        Self {
            count: count.clamp(Self::MIN_COUNT, Self::MAX_COUNT),
            mode,
            language,
        }
    }
}

impl Default for SupplyRequest {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_COUNT,
            GenerationMode::default(),
            Language::default(),
        )
    }
}

/// Source of target words
pub trait WordSupplier {
    /// Produce words for `request`. No retries: an empty result is an answer.
    fn supply(&mut self, request: &SupplyRequest) -> Vec<String>;
}

impl<F> WordSupplier for F
where
    F: FnMut(&SupplyRequest) -> Vec<String>,
{
    fn supply(&mut self, request: &SupplyRequest) -> Vec<String> {
        self(request)
    }
}
