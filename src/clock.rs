//! Time sources and the duty stopwatch.
//!
//! The tracker never reads the system clock directly. A [`Clock`] is injected
//! so replays and tests can drive elapsed time frame by frame.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use jiff::Timestamp;

/// Monotonic and wall-clock time.
pub trait Clock {
    /// Time since an arbitrary fixed origin. Never goes backwards.
    fn monotonic(&self) -> Duration;

    /// Current wall-clock time.
    fn now(&self) -> Timestamp;
}

/// The real clock.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a host can advance the clock the tracker reads.
#[derive(Debug, Clone)]
pub struct ManualClock {
    elapsed: Rc<Cell<Duration>>,
    epoch: Timestamp,
}

impl ManualClock {
    /// Starts at zero elapsed, with wall-clock time anchored at `epoch`.
    pub fn new(epoch: Timestamp) -> Self {
        Self {
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
            epoch,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> Duration {
        self.elapsed.get()
    }

    fn now(&self) -> Timestamp {
        self.epoch
            .checked_add(self.elapsed.get())
            .unwrap_or(self.epoch)
    }
}

/// Pausable elapsed-time accumulator.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    started_at: Option<Duration>,
}

impl Stopwatch {
    /// Zero the stopwatch and start it.
    pub fn restart(&mut self, clock: &impl Clock) {
        self.accumulated = Duration::ZERO;
        self.started_at = Some(clock.monotonic());
    }

    /// Stop accumulating. Idempotent.
    pub fn stop(&mut self, clock: &impl Clock) {
        if let Some(start) = self.started_at.take() {
            self.accumulated += clock.monotonic().saturating_sub(start);
        }
    }

    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        match self.started_at {
            Some(start) => self.accumulated + clock.monotonic().saturating_sub(start),
            None => self.accumulated,
        }
    }
}
