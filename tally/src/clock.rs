use std::{cell::Cell, rc::Rc};

pub use web_time::{Duration, Instant};

use crate::Milliseconds;

/// A source of timestamps
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and advance the
/// clock owned by a [`SessionController`](crate::SessionController).
///
/// ```rust
/// use tally::{Clock, ManualClock};
/// use tally::clock::Duration;
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// let start = clock.now();
///
/// handle.advance(Duration::from_millis(250));
/// assert_eq!(clock.now() - start, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Move time forward by `duration`
    pub fn advance(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

fn millis_between(earlier: Instant, later: Instant) -> Milliseconds {
    later.saturating_duration_since(earlier).as_millis() as Milliseconds
}

/// Start and freeze points of one session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    started_at: Option<Instant>,
    frozen_elapsed_ms: Option<Milliseconds>,
}

impl SessionClock {
    /// Start the clock, unless it already runs
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Stop the clock for good, keeping the elapsed time at `now`
    pub fn freeze(&mut self, now: Instant) {
        if self.frozen_elapsed_ms.is_none() {
            self.frozen_elapsed_ms = self.started_at.map(|start| millis_between(start, now));
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_elapsed_ms.is_some()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Elapsed milliseconds: frozen if finished, live otherwise, `None` while idle
    pub fn elapsed_ms(&self, now: Instant) -> Option<Milliseconds> {
        self.frozen_elapsed_ms.or_else(|| {
            self.started_at
                .map(|start| millis_between(start, now))
        })
    }
}

/// A cancellable periodic callback
///
/// Cancellation is dropping the value: whoever owns the `Option<ScheduledTick>`
/// clears it and no further tick can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    interval: Duration,
    next_due: Instant,
}

impl ScheduledTick {
    /// Schedule the first tick one `interval` after `now`
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fire if due, rescheduling past `now`
    ///
    /// Missed ticks collapse into one: a host that polls late sees a single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }

        if self.interval.is_zero() {
            self.next_due = now;
        } else {
            while self.next_due <= now {
                self.next_due += self.interval;
            }
        }
        true
    }
}
