pub mod clock;
pub mod completion;
pub mod config;
pub mod math;
pub mod persist;
pub mod reconciler;
pub mod render;
pub mod report;
pub mod session;
pub mod statistics;
pub mod supply;
pub mod words;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Configuration;
pub use math::{Accuracy, Wpm};
pub use persist::{ResultSink, SaveError, SaveStatus};
pub use reconciler::CharacterTally;
pub use render::{CharacterStatus, Highlight, WordStatus};
pub use report::{LetterCount, SessionReport, WordMismatch, WrongWords};
pub use session::{EditFeedback, Phase, SessionController, SessionTicket};
pub use statistics::{ClockDisplay, FinalMetrics, LiveMetrics};
pub use supply::{GenerationMode, Language, SupplyRequest, WordSupplier};
pub use words::WordSequence;

// Types for more general type-safety
type Milliseconds = u64;
type Minutes = f64;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

// Get the minutes elapsed from a millisecond count
pub(crate) fn minutes(elapsed_ms: Milliseconds) -> Minutes {
    elapsed_ms as f64 / MILLIS_PER_MINUTE
}

/// Replace every line break (`\r\n`, `\r` or `\n`) with a single space.
///
/// Raw input snapshots pass through this before reconciliation, so a newline
/// commits a word exactly like a space does.
pub fn normalize_line_breaks(raw: &str) -> std::borrow::Cow<'_, str> {
    if !raw.contains(['\r', '\n']) {
        return std::borrow::Cow::Borrowed(raw);
    }

    let mut normalized = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(char) = chars.next() {
        match char {
            '\r' => {
                chars.next_if_eq(&'\n');
                normalized.push(' ');
            }
            '\n' => normalized.push(' '),
            other => normalized.push(other),
        }
    }
    std::borrow::Cow::Owned(normalized)
}
