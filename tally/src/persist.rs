//! Result persistence seam
//!
//! A finished session hands its metrics and report to a [`ResultSink`] once.
//! Whatever the sink does, the local metrics stay valid: a failure only shows up
//! as [`SaveStatus::Failed`].

use crate::{FinalMetrics, SessionReport};

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Result store is unavailable: {0}")]
    Unavailable(String),
    #[error("Result store rejected the session: {0}")]
    Rejected(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outcome of handing a finished session to the sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    /// No sink, or the session has not finished
    #[default]
    NotAttempted,
    Saved,
    Failed(String),
}

/// Receiver of finished sessions
pub trait ResultSink {
    fn save(&mut self, metrics: &FinalMetrics, report: &SessionReport) -> Result<(), SaveError>;
}

/// Hand one finished session to `sink`
pub fn save_to(
    sink: &mut dyn ResultSink,
    metrics: &FinalMetrics,
    report: &SessionReport,
) -> SaveStatus {
    match sink.save(metrics, report) {
        Ok(()) => SaveStatus::Saved,
        Err(err) => {
            tracing::warn!(error = %err, "saving session result failed");
            SaveStatus::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CharacterTally;

    struct Failing;

    impl ResultSink for Failing {
        fn save(&mut self, _: &FinalMetrics, _: &SessionReport) -> Result<(), SaveError> {
            Err(SaveError::Unavailable("offline".to_string()))
        }
    }

    #[derive(Default)]
    struct Recording(Vec<FinalMetrics>);

    impl ResultSink for Recording {
        fn save(&mut self, metrics: &FinalMetrics, _: &SessionReport) -> Result<(), SaveError> {
            self.0.push(*metrics);
            Ok(())
        }
    }

    fn metrics() -> FinalMetrics {
        FinalMetrics::calculate(
            3,
            CharacterTally {
                total_typed: 12,
                total_correct: 12,
            },
            6_000,
        )
    }

    #[test]
    fn test_save_status() {
        let report = SessionReport::default();

        let mut recording = Recording::default();
        assert_eq!(save_to(&mut recording, &metrics(), &report), SaveStatus::Saved);
        assert_eq!(recording.0, vec![metrics()]);

        let status = save_to(&mut Failing, &metrics(), &report);
        assert_eq!(
            status,
            SaveStatus::Failed("Result store is unavailable: offline".to_string())
        );
    }
}
