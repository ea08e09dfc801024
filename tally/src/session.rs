//! # Session Module - Typing Session State Machine
//!
//! This module provides the high-level interface a typing trainer drives. A
//! [`SessionController`] owns every piece of mutable session state and exposes
//! read-only projections of it to the presentation layer.
//!
//! ## Key Features
//!
//! - **Snapshot Input**: The host hands over the whole typed text on every edit;
//!   the controller works out what changed.
//! - **Single Owner**: Words, text, tallies, clock and pending tick live in one
//!   value that a reset replaces wholesale.
//! - **Stale Supply Protection**: Words arrive with the [`SessionTicket`] of the
//!   reset that asked for them, so late answers are dropped.
//! - **Cooperative Clock**: The periodic tick is a scheduled value the host polls;
//!   clearing it cancels it.
//!
//! ## Session Lifecycle
//!
#![doc = simple_mermaid::mermaid!("../diagrams/session_lifecycle.mmd")]
//!
//! ## Usage Example
//!
//! ```rust
//! use tally::{ManualClock, Phase, SessionController};
//!
//! let clock = ManualClock::new();
//! let mut session = SessionController::with_clock(clock.clone());
//!
//! let ticket = session.reset();
//! session.supply(ticket, ["cat", "dog"]);
//!
//! session.input("cat ");
//! assert_eq!(session.phase(), Phase::Running);
//!
//! clock.advance_millis(3_000);
//! let feedback = session.input("cat dog").unwrap();
//! assert_eq!(feedback.phase, Phase::Finished);
//! assert_eq!(session.final_metrics().unwrap().words_per_minute.0, 40);
//! ```

use tracing::{debug, info, trace};

use crate::{
    CharacterTally, Configuration, FinalMetrics, Highlight, LiveMetrics, ResultSink, SaveStatus,
    SessionReport, SupplyRequest, WordSequence, WordSupplier,
    clock::{Clock, Instant, ScheduledTick, SessionClock, SystemClock},
    completion, normalize_line_breaks, persist,
    reconciler::InputReconciler,
    statistics::ClockDisplay,
};

/// Where a session is in its lifecycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for words or for the first keystroke
    #[default]
    Idle,
    Running,
    /// Every word committed; input is locked until the next reset
    Finished,
}

/// Identifies the reset a word supply answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionTicket(u64);

/// What an accepted edit changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFeedback {
    /// Characters added to the tally by this edit
    pub tallied: usize,
    pub metrics: LiveMetrics,
    pub highlight: Highlight,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Outcome {
    metrics: FinalMetrics,
    report: SessionReport,
}

// Everything that belongs to one session, discarded together on reset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SessionState {
    phase: Phase,
    words: Option<WordSequence>,
    reconciler: InputReconciler,
    clock: SessionClock,
    tick: Option<ScheduledTick>,
    outcome: Option<Outcome>,
    save_status: SaveStatus,
}

/// Typing session coordinator
///
/// Single-threaded: the host calls [`input`](Self::input) and
/// [`poll_tick`](Self::poll_tick) from one thread and never concurrently.
///
/// The clock is a type parameter so tests can drive time with
/// [`ManualClock`](crate::ManualClock).
pub struct SessionController<C: Clock = SystemClock> {
    clock: C,
    config: Configuration,
    request: SupplyRequest,
    generation: u64,
    state: SessionState,
    sink: Option<Box<dyn ResultSink>>,
}

impl SessionController<SystemClock> {
    /// Create a controller on the wall clock, with no words loaded
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SessionController<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SessionController<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            config: Configuration::default(),
            request: SupplyRequest::default(),
            generation: 0,
            state: SessionState::default(),
            sink: None,
        }
    }

    /// Configure the controller (builder pattern)
    pub fn with_configuration(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    /// Set the request future resets ask for (builder pattern)
    pub fn with_request(mut self, request: SupplyRequest) -> Self {
        self.request = request;
        self
    }

    /// Attach the collaborator finished sessions are handed to (builder pattern)
    pub fn with_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// The request the next reset asks words for
    pub fn request(&self) -> &SupplyRequest {
        &self.request
    }

    /// The ticket of the current session
    pub fn ticket(&self) -> SessionTicket {
        SessionTicket(self.generation)
    }

    /// Discard the whole session and start over without words
    ///
    /// Cancels the pending tick. Safe in any phase; a second reset in a row
    /// yields the same zeroed state.
    pub fn reset(&mut self) -> SessionTicket {
        self.generation += 1;
        let previous = std::mem::take(&mut self.state);
        debug!(
            generation = self.generation,
            previous_phase = ?previous.phase,
            "session reset"
        );
        self.ticket()
    }

    /// Load words for the session `ticket` belongs to
    ///
    /// Returns whether the words were taken. Words are dropped when the ticket is
    /// stale, when typing already started, or when nothing usable was supplied.
    pub fn supply<I, S>(&mut self, ticket: SessionTicket, words: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if ticket != self.ticket() {
            debug!(?ticket, current = ?self.ticket(), "dropping stale word supply");
            return false;
        }

        if self.state.phase != Phase::Idle {
            debug!(phase = ?self.state.phase, "dropping word supply for a started session");
            return false;
        }

        let Some(words) = WordSequence::new(words) else {
            debug!("empty word supply, session stays idle");
            return false;
        };

        debug!(count = words.len(), "words loaded");
        self.state.words = Some(words);
        true
    }

    /// Reset and load words from a synchronous supplier in one step
    pub fn reset_with(&mut self, supplier: &mut dyn WordSupplier) -> SessionTicket {
        let ticket = self.reset();
        let words = supplier.supply(&self.request);
        self.supply(ticket, words);
        ticket
    }

    /// Change what future resets ask for
    ///
    /// If no typing has started yet, the session is reset right away and the new
    /// ticket returned: the host should fetch words for it.
    pub fn change_request(&mut self, request: SupplyRequest) -> Option<SessionTicket> {
        self.request = request;
        if self.state.phase == Phase::Idle {
            return Some(self.reset());
        }
        None
    }

    /// Accept a raw snapshot of the typed text
    ///
    /// Line breaks are normalized to spaces first. Returns `None` when the
    /// snapshot is ignored: the session is finished, no words are loaded, or
    /// the text did not change.
    pub fn input(&mut self, raw: &str) -> Option<EditFeedback> {
        if self.state.phase == Phase::Finished {
            trace!("input ignored, session finished");
            return None;
        }

        let Some(words) = self.state.words.as_ref() else {
            trace!("input ignored, no words loaded");
            return None;
        };

        let snapshot = normalize_line_breaks(raw);
        if !self.state.reconciler.changes_text(&snapshot) {
            return None;
        }

        let now = self.clock.now();
        if self.state.phase == Phase::Idle {
            self.state.phase = Phase::Running;
            self.state.clock.start(now);
            self.state.tick = Some(ScheduledTick::new(self.config.tick_interval, now));
            info!(words = words.len(), "session started");
        }

        let tallied = self.state.reconciler.accept(&snapshot, words);
        trace!(tallied, text = %snapshot, "edit accepted");

        if completion::is_complete(&snapshot, words) {
            self.finish(now);
        }

        Some(EditFeedback {
            tallied,
            metrics: self.live_metrics(),
            highlight: self.highlight().unwrap_or_default(),
            phase: self.state.phase,
        })
    }

    // Running -> Finished: freeze, report, hand off. Runs once per session.
    fn finish(&mut self, now: Instant) {
        let Some(words) = self.state.words.as_ref() else {
            return;
        };

        self.state.clock.freeze(now);
        self.state.tick = None;
        self.state.phase = Phase::Finished;

        let text = self.state.reconciler.text();
        let frozen_elapsed_ms = self.state.clock.elapsed_ms(now).unwrap_or_default();
        let metrics = FinalMetrics::calculate(
            completion::completed_word_count(text, words),
            self.state.reconciler.tally(),
            frozen_elapsed_ms,
        );
        let report = SessionReport::build(text, words, &self.config);

        info!(
            wpm = metrics.words_per_minute.0,
            accuracy = metrics.accuracy_percent.0,
            elapsed_ms = metrics.elapsed_ms,
            "session finished"
        );

        if let Some(sink) = self.sink.as_deref_mut() {
            self.state.save_status = persist::save_to(sink, &metrics, &report);
        }

        self.state.outcome = Some(Outcome { metrics, report });
    }

    /// When the host should next call [`poll_tick`](Self::poll_tick)
    ///
    /// `None` unless a session is running.
    pub fn next_tick_due(&self) -> Option<Instant> {
        self.state.tick.as_ref().map(ScheduledTick::next_due)
    }

    /// Fire the periodic tick if it is due
    ///
    /// Only refreshes the clock display and WPM; tallies and completion are
    /// left alone.
    pub fn poll_tick(&mut self) -> Option<ClockDisplay> {
        let now = self.clock.now();
        let tick = self.state.tick.as_mut()?;
        if !tick.poll(now) {
            return None;
        }

        let elapsed_ms = self.state.clock.elapsed_ms(now)?;
        Some(ClockDisplay::new(elapsed_ms, self.completed_word_count()))
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn words(&self) -> Option<&WordSequence> {
        self.state.words.as_ref()
    }

    /// The typed text as of the last accepted snapshot
    pub fn text(&self) -> &str {
        self.state.reconciler.text()
    }

    pub fn tally(&self) -> CharacterTally {
        self.state.reconciler.tally()
    }

    /// Target words fully typed, in `0..=N`
    pub fn completed_word_count(&self) -> usize {
        self.state
            .words
            .as_ref()
            .map_or(0, |words| completion::completed_word_count(self.text(), words))
    }

    /// Elapsed milliseconds, frozen once finished, `None` while idle
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.state.clock.elapsed_ms(self.clock.now())
    }

    pub fn live_metrics(&self) -> LiveMetrics {
        LiveMetrics::calculate(self.completed_word_count(), self.tally(), self.elapsed_ms())
    }

    /// The clock display right now, `None` while idle
    pub fn clock_display(&self) -> Option<ClockDisplay> {
        self.elapsed_ms()
            .map(|elapsed_ms| ClockDisplay::new(elapsed_ms, self.completed_word_count()))
    }

    /// Highlight of the current text, `None` while no words are loaded
    pub fn highlight(&self) -> Option<Highlight> {
        self.state
            .words
            .as_ref()
            .map(|words| Highlight::build(self.text(), words))
    }

    pub fn final_metrics(&self) -> Option<&FinalMetrics> {
        self.state.outcome.as_ref().map(|outcome| &outcome.metrics)
    }

    pub fn report(&self) -> Option<&SessionReport> {
        self.state.outcome.as_ref().map(|outcome| &outcome.report)
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.state.save_status
    }
}
