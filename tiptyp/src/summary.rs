use std::fmt;

use serde::{Deserialize, Serialize};
use tally::{
    FinalMetrics, Highlight, LetterCount, LiveMetrics, SaveStatus, SessionReport, WordMismatch,
    WordSequence, WordStatus, WrongWords, math::format_clock,
};

use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_config: SessionConfig,
    pub metrics: SerializableMetrics,
    pub report: SerializableReport,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub generator: String,
    pub language: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableMetrics {
    pub words_per_minute: u32,
    pub accuracy_percent: u32,
    pub elapsed_seconds: u64,
    pub total_chars_typed: usize,
    pub total_chars_correct: usize,
}

impl From<&FinalMetrics> for SerializableMetrics {
    fn from(metrics: &FinalMetrics) -> Self {
        Self {
            words_per_minute: metrics.words_per_minute.0,
            accuracy_percent: metrics.accuracy_percent.0,
            elapsed_seconds: metrics.elapsed_seconds,
            total_chars_typed: metrics.total_chars_typed,
            total_chars_correct: metrics.total_chars_correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableLetter {
    pub letter: char,
    pub count: usize,
}

impl From<&LetterCount> for SerializableLetter {
    fn from(letter: &LetterCount) -> Self {
        Self {
            letter: letter.char,
            count: letter.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableMismatch {
    pub expected: String,
    pub typed: String,
}

impl From<&WordMismatch> for SerializableMismatch {
    fn from(mismatch: &WordMismatch) -> Self {
        Self {
            expected: mismatch.expected.clone(),
            typed: mismatch.typed.clone(),
        }
    }
}

/// Either the full list or `{"count": n}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializableWrongWords {
    List(Vec<SerializableMismatch>),
    Count(usize),
}

impl From<&WrongWords> for SerializableWrongWords {
    fn from(wrong_words: &WrongWords) -> Self {
        match wrong_words {
            WrongWords::Listed(list) => Self::List(list.iter().map(Into::into).collect()),
            WrongWords::Count(count) => Self::Count(*count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableReport {
    pub wrong_letter_frequency: Vec<SerializableLetter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrong_words: Option<SerializableWrongWords>,
    pub words_correct: usize,
    pub words_typed: usize,
}

impl From<&SessionReport> for SerializableReport {
    fn from(report: &SessionReport) -> Self {
        Self {
            wrong_letter_frequency: report
                .wrong_letter_frequency
                .iter()
                .map(Into::into)
                .collect(),
            wrong_words: report.wrong_words.as_ref().map(Into::into),
            words_correct: report.words_correct,
            words_typed: report.words_typed,
        }
    }
}

impl SessionSummary {
    pub fn new(
        settings: &Settings,
        metrics: &FinalMetrics,
        report: &SessionReport,
        save_status: &SaveStatus,
    ) -> Self {
        Self {
            session_config: SessionConfig {
                generator: settings.generator.to_string(),
                language: settings.language.to_string(),
                word_count: settings.word_count,
            },
            metrics: metrics.into(),
            report: report.into(),
            saved: *save_status == SaveStatus::Saved,
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metrics = &self.metrics;
        let report = &self.report;

        writeln!(f, "Speed:    {} wpm", metrics.words_per_minute)?;
        writeln!(f, "Accuracy: {}%", metrics.accuracy_percent)?;
        writeln!(f, "Time:     {}", format_clock(metrics.elapsed_seconds * 1000))?;
        writeln!(
            f,
            "Words:    {} of {} correct",
            report.words_correct, report.words_typed
        )?;

        if !report.wrong_letter_frequency.is_empty() {
            let letters: Vec<String> = report
                .wrong_letter_frequency
                .iter()
                .map(|letter| format!("{} x{}", letter.letter, letter.count))
                .collect();
            writeln!(f, "Letters:  {}", letters.join(", "))?;
        }

        match &report.wrong_words {
            Some(SerializableWrongWords::List(list)) => {
                writeln!(f, "Mistakes:")?;
                for mismatch in list {
                    writeln!(f, "  {} -> {}", mismatch.expected, mismatch.typed)?;
                }
            }
            Some(SerializableWrongWords::Count(count)) => {
                writeln!(f, "Mistakes: {count} words")?;
            }
            None => {}
        }

        Ok(())
    }
}

/// One-line live status: clock, speed, accuracy and progress
pub fn status_line(metrics: &LiveMetrics, total_words: usize) -> String {
    format!(
        "[{}] {} wpm  {}  {}/{}",
        format_clock(metrics.elapsed_ms.unwrap_or_default()),
        metrics.wpm,
        metrics.accuracy,
        metrics.completed_words,
        total_words
    )
}

/// The target words marked up by their status
///
/// Wrong words are wrapped in `~`, the current word in brackets with the number
/// of extra characters typed beyond it.
pub fn highlight_line(highlight: &Highlight, words: &WordSequence) -> String {
    let overflow = highlight.overflow(words);
    words
        .iter()
        .zip(&highlight.words)
        .map(|(word, status)| match status {
            WordStatus::Pending | WordStatus::Correct => word.to_string(),
            WordStatus::Wrong => format!("~{word}~"),
            WordStatus::Current if overflow > 0 => format!("[{word}+{overflow}]"),
            WordStatus::Current => format!("[{word}]"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use tally::{CharacterTally, Configuration};

    use super::*;

    fn finished() -> (FinalMetrics, SessionReport) {
        let words = WordSequence::new(["cat", "dog", "bird"]).unwrap();
        let metrics = FinalMetrics::calculate(
            3,
            CharacterTally {
                total_typed: 13,
                total_correct: 12,
            },
            65_000,
        );
        let report = SessionReport::build("cat xog bird ", &words, &Configuration::default());
        (metrics, report)
    }

    #[test]
    fn test_json_shape() {
        let (metrics, report) = finished();
        let summary = SessionSummary::new(
            &Settings::default(),
            &metrics,
            &report,
            &SaveStatus::Saved,
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["metrics"]["accuracy_percent"], 92);
        assert_eq!(json["report"]["wrong_words"]["list"][0]["expected"], "dog");
        assert_eq!(json["report"]["wrong_letter_frequency"][0]["letter"], "d");
        assert_eq!(json["session_config"]["generator"], "words");
        assert_eq!(json["saved"], true);

        let decoded: SessionSummary = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, summary);
    }

    #[test]
    fn test_wrong_words_omitted_when_empty() {
        let words = WordSequence::new(["hi"]).unwrap();
        let report = SessionReport::build("hi", &words, &Configuration::default());
        let serializable = SerializableReport::from(&report);

        let json = serde_json::to_value(&serializable).unwrap();
        assert!(json.get("wrong_words").is_none());

        let serializable = SerializableWrongWords::from(&WrongWords::Count(20));
        assert_eq!(serde_json::to_string(&serializable).unwrap(), r#"{"count":20}"#);
    }

    #[test]
    fn test_text_summary() {
        let (metrics, report) = finished();
        let summary = SessionSummary::new(
            &Settings::default(),
            &metrics,
            &report,
            &SaveStatus::NotAttempted,
        );
        let text = summary.to_string();

        assert!(text.contains("Speed:    3 wpm"));
        assert!(text.contains("Time:     1:05"));
        assert!(text.contains("Words:    2 of 3 correct"));
        assert!(text.contains("dog -> xog"));
    }

    #[test]
    fn test_highlight_line() {
        let words = WordSequence::new(["cat", "dog", "bird"]).unwrap();
        let line = highlight_line(&Highlight::build("cxt dogs", &words), &words);
        assert_eq!(line, "~cat~ [dog+1] bird");
    }

    #[test]
    fn test_status_line() {
        let metrics = LiveMetrics::calculate(
            1,
            CharacterTally {
                total_typed: 4,
                total_correct: 3,
            },
            Some(5_000),
        );
        assert_eq!(status_line(&metrics, 25), "[0:05] 12 wpm  75%  1/25");
    }
}
