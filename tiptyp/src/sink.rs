use tally::{FinalMetrics, ResultSink, SaveError, SessionReport};

/// Records finished sessions as structured log events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ResultSink for LogSink {
    fn save(&mut self, metrics: &FinalMetrics, report: &SessionReport) -> Result<(), SaveError> {
        tracing::info!(
            target: "tiptyp::results",
            wpm = metrics.words_per_minute.0,
            accuracy = metrics.accuracy_percent.0,
            elapsed_seconds = metrics.elapsed_seconds,
            chars_typed = metrics.total_chars_typed,
            chars_correct = metrics.total_chars_correct,
            words_correct = report.words_correct,
            words_typed = report.words_typed,
            "session result"
        );
        Ok(())
    }
}
