use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use strum::VariantNames;
use tally::{Clock, Phase, SessionController, SystemClock, WordSupplier};

use crate::config::{Generator, Settings, WordLanguage};
use crate::error::AppError;
use crate::generator::LocalSupplier;
use crate::sink::LogSink;
use crate::summary::{SessionSummary, highlight_line, status_line};

const HELP: &str = "Type the words and press <Enter> to submit a line. \
Commands: :reset, :count <n>, :mode <generator>, :lang <language>, :quit";

/// Input events for the app loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One submitted line, without its line break
    Line(String),
    /// The input stream ended
    Closed,
}

/// Source of input events
pub trait EventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError>;
}

/// Reads stdin lines on a helper thread
pub struct StdinSource {
    rx: Receiver<Event>,
}

impl StdinSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if tx.send(Event::Line(line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(Event::Closed);
        });

        Self { rx }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for StdinSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Whether the loop keeps going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The interactive trainer
pub struct App<C: Clock = SystemClock, S: WordSupplier = LocalSupplier> {
    session: SessionController<C>,
    supplier: S,
    settings: Settings,
    json: bool,
    typed: String,
}

impl App {
    /// Creates a new `App` on the wall clock with local word generation
    pub fn new(settings: Settings, json: bool) -> Self {
        Self::with_parts(SystemClock, LocalSupplier::new(), settings, json)
    }
}

impl<C: Clock, S: WordSupplier> App<C, S> {
    pub fn with_parts(clock: C, supplier: S, settings: Settings, json: bool) -> Self {
        let session = SessionController::with_clock(clock)
            .with_configuration(settings.engine_configuration())
            .with_request(settings.supply_request())
            .with_sink(Box::new(LogSink));

        Self {
            session,
            supplier,
            settings,
            json,
            typed: String::new(),
        }
    }

    /// Runs the app until `:quit` or the end of input
    pub fn run<E: EventSource, W: Write>(&mut self, events: &E, out: &mut W) -> Result<(), AppError> {
        writeln!(out, "{HELP}")?;
        self.restart(out)?;

        let interval = self.session.configuration().tick_interval;
        loop {
            match events.recv_timeout(interval) {
                Ok(Event::Line(line)) => {
                    if self.handle_line(&line, out)? == Flow::Quit {
                        break;
                    }
                }
                Ok(Event::Closed) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => self.on_tick(),
            }
        }

        Ok(())
    }

    fn on_tick(&mut self) {
        if let Some(tick) = self.session.poll_tick() {
            tracing::trace!(clock = %tick.formatted, wpm = tick.wpm.0, "tick");
        }
    }

    /// Reset with fresh words and show them
    fn restart<W: Write>(&mut self, out: &mut W) -> Result<(), AppError> {
        self.typed.clear();
        self.session.reset_with(&mut self.supplier);
        self.show_words(out)
    }

    fn show_words<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        match self.session.words() {
            Some(words) => writeln!(out, "\n{}\n", words.target_text())?,
            None => writeln!(out, "No words available, try :reset or another :mode")?,
        }
        Ok(())
    }

    /// Handle one submitted line: a command or more typed text
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, AppError> {
        if let Some(command) = line.trim().strip_prefix(':') {
            return self.handle_command(command, out);
        }

        if self.session.phase() == Phase::Finished {
            writeln!(out, "Session finished. :reset for new words or :quit")?;
            return Ok(Flow::Continue);
        }

        let Some(words) = self.session.words().cloned() else {
            return self.show_words(out).map(|()| Flow::Continue);
        };

        self.typed.push_str(line);
        self.session.input(&self.typed);

        // The submitting line break delimits the last word
        if self.session.phase() != Phase::Finished {
            self.typed.push('\n');
            self.session.input(&self.typed);
        }

        writeln!(out, "{}", status_line(&self.session.live_metrics(), words.len()))?;

        if self.session.phase() == Phase::Finished {
            self.show_summary(out)?;
        } else if let Some(highlight) = self.session.highlight() {
            writeln!(out, "{}", highlight_line(&highlight, &words))?;
        }

        Ok(Flow::Continue)
    }

    fn show_summary<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let (Some(metrics), Some(report)) = (self.session.final_metrics(), self.session.report())
        else {
            return Ok(());
        };

        let summary = SessionSummary::new(&self.settings, metrics, report, self.session.save_status());
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        } else {
            writeln!(out, "\n{summary}")?;
        }
        Ok(())
    }

    fn handle_command<W: Write>(&mut self, command: &str, out: &mut W) -> Result<Flow, AppError> {
        let (name, argument) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, argument)| (name, argument.trim()));

        let mut settings = self.settings.clone();
        match name {
            "quit" | "q" => return Ok(Flow::Quit),
            "reset" | "r" => {
                self.restart(out)?;
                return Ok(Flow::Continue);
            }
            "count" => match argument.parse::<usize>() {
                Ok(count) => settings.word_count = count,
                Err(_) => {
                    writeln!(out, "Expected a word count, got '{argument}'")?;
                    return Ok(Flow::Continue);
                }
            },
            "mode" => match parse_choice::<Generator, W>(argument, out)? {
                Some(generator) => settings.generator = generator,
                None => return Ok(Flow::Continue),
            },
            "lang" => match parse_choice::<WordLanguage, W>(argument, out)? {
                Some(language) => settings.language = language,
                None => return Ok(Flow::Continue),
            },
            _ => {
                writeln!(out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
        }

        self.change_settings(settings, out)?;
        Ok(Flow::Continue)
    }

    // New settings reload the words only while no typing has started
    fn change_settings<W: Write>(&mut self, settings: Settings, out: &mut W) -> Result<(), AppError> {
        let request = settings.supply_request();
        self.settings = settings;
        self.settings.word_count = request.count;

        match self.session.change_request(request) {
            Some(ticket) => {
                self.typed.clear();
                let words = self.supplier.supply(&request);
                self.session.supply(ticket, words);
                self.show_words(out)?;
            }
            None => writeln!(out, "Applies to the next session (:reset)")?,
        }
        Ok(())
    }
}

fn parse_choice<T, W>(argument: &str, out: &mut W) -> Result<Option<T>, AppError>
where
    T: FromStr + VariantNames,
    W: Write,
{
    match argument.parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            writeln!(
                out,
                "Unknown value '{argument}', expected one of: {}",
                T::VARIANTS.join(", ")
            )?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use tally::{ManualClock, SupplyRequest};

    use super::*;

    struct ChannelSource {
        rx: Receiver<Event>,
    }

    impl EventSource for ChannelSource {
        fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
            self.rx.recv_timeout(timeout)
        }
    }

    fn fixed_words(_: &SupplyRequest) -> Vec<String> {
        ["cat", "dog", "bird"].map(String::from).to_vec()
    }

    type TestApp = App<ManualClock, fn(&SupplyRequest) -> Vec<String>>;

    fn app(json: bool) -> (TestApp, ManualClock) {
        let clock = ManualClock::new();
        let supplier: fn(&SupplyRequest) -> Vec<String> = fixed_words;
        let mut app = App::with_parts(clock.clone(), supplier, Settings::default(), json);
        app.restart(&mut Vec::new()).unwrap();
        (app, clock)
    }

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_lines_complete_a_session() {
        let (mut app, clock) = app(false);
        let mut out = Vec::new();

        app.handle_line("cat dog", &mut out).unwrap();
        assert_eq!(app.session.phase(), Phase::Running);
        assert_eq!(app.session.completed_word_count(), 2);

        clock.advance_millis(6_000);
        app.handle_line("bird", &mut out).unwrap();

        assert_eq!(app.session.phase(), Phase::Finished);
        assert_eq!(app.session.tally().total_correct, 12);
        assert_eq!(app.session.tally().total_typed, 12);

        let text = output(out);
        assert!(text.contains("[cat dog] bird") || text.contains("cat dog [bird]"));
        assert!(text.contains("Speed:    30 wpm"));
        assert!(text.contains("Accuracy: 100%"));
    }

    #[test]
    fn test_json_summary() {
        let (mut app, _clock) = app(true);
        let mut out = Vec::new();
        app.handle_line("cat xog bird", &mut out).unwrap();

        let text = output(out);
        let json_start = text.find('{').unwrap();
        let summary: SessionSummary = serde_json::from_str(&text[json_start..]).unwrap();
        assert_eq!(summary.report.words_correct, 2);
        assert!(summary.saved);
    }

    #[test]
    fn test_input_after_finish_is_refused() {
        let (mut app, _clock) = app(false);
        let mut out = Vec::new();
        app.handle_line("cat dog bird", &mut out).unwrap();
        app.handle_line("more", &mut out).unwrap();

        assert_eq!(app.session.text(), "cat dog bird");
        assert!(output(out).contains("Session finished"));
    }

    #[test]
    fn test_commands() {
        let (mut app, _clock) = app(false);
        let mut out = Vec::new();

        assert_eq!(app.handle_line(":count 40", &mut out).unwrap(), Flow::Continue);
        assert_eq!(app.settings.word_count, 40);
        assert_eq!(app.session.request().count, 40);

        app.handle_line(":mode markov", &mut out).unwrap();
        assert!(output(out.clone()).contains("expected one of: words, model, syllable"));

        app.handle_line(":lang en", &mut out).unwrap();
        assert_eq!(app.settings.language, WordLanguage::En);

        // Mid-session changes wait for a reset
        app.handle_line("ca", &mut out).unwrap();
        app.handle_line(":count 10", &mut out).unwrap();
        assert_eq!(app.session.phase(), Phase::Running);
        assert!(output(out.clone()).contains("Applies to the next session"));

        app.handle_line(":reset", &mut out).unwrap();
        assert_eq!(app.session.phase(), Phase::Idle);
        assert!(app.typed.is_empty());

        assert_eq!(app.handle_line(":quit", &mut out).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_run_until_closed() {
        let (tx, rx) = mpsc::channel();
        tx.send(Event::Line("cat".to_string())).unwrap();
        tx.send(Event::Closed).unwrap();

        let (mut app, _clock) = app(false);
        let mut out = Vec::new();
        app.run(&ChannelSource { rx }, &mut out).unwrap();

        // run() starts over with fresh words
        assert_eq!(app.session.text(), "cat ");
        assert!(output(out).contains("cat dog bird"));
    }

    #[test]
    fn test_run_until_quit() {
        let (tx, rx) = mpsc::channel();
        tx.send(Event::Line(":quit".to_string())).unwrap();
        tx.send(Event::Line("cat".to_string())).unwrap();

        let (mut app, _clock) = app(false);
        app.run(&ChannelSource { rx }, &mut Vec::new()).unwrap();
        assert_eq!(app.session.text(), "");
    }
}
