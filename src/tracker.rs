//! Duty lifecycle: Idle ⇄ Running, driven by the host's duty-active flag.
//!
//! The tracker is polled once per update tick. It owns the stopwatch and the
//! set of hostile entity ids already counted as defeated this run. It reports
//! transitions as [`TrackerEvent`]s and leaves filtering to the history store.

use std::collections::HashSet;
use std::time::Duration;

use jiff::Timestamp;

use crate::clock::{Clock, Stopwatch};
use crate::model::{HostileEntity, Split};

/// Shown as the current duty while no duty is active.
pub const NOT_IN_DUTY: &str = "Not in Duty";

/// Used when an active duty's name could not be resolved.
pub const UNKNOWN_DUTY: &str = "Unknown Duty";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
}

/// A finished run, before it has been filtered or stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyCompleted {
    /// The last duty name seen while active.
    pub name: String,
    pub elapsed: Duration,
    pub finished_at: Timestamp,
    pub splits: Vec<Split>,
}

/// A lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Started { name: String },
    Completed(DutyCompleted),
}

pub struct LifecycleTracker {
    state: State,
    stopwatch: Stopwatch,
    defeated_ids: HashSet<u32>,
    splits: Vec<Split>,
    current_duty_name: String,
    cached_duty_name: String,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            stopwatch: Stopwatch::default(),
            defeated_ids: HashSet::new(),
            splits: Vec::new(),
            current_duty_name: NOT_IN_DUTY.to_string(),
            cached_duty_name: UNKNOWN_DUTY.to_string(),
        }
    }

    /// Advance the state machine by one tick.
    ///
    /// `hostiles` is only inspected while running.
    pub fn on_tick(
        &mut self,
        active: bool,
        live_name: &str,
        hostiles: &[HostileEntity],
        clock: &impl Clock,
    ) -> Option<TrackerEvent> {
        let event = if active {
            self.current_duty_name = live_name.to_string();
            self.cached_duty_name = live_name.to_string();
            match self.state {
                State::Idle => Some(self.start(clock)),
                State::Running => None,
            }
        } else {
            self.current_duty_name = NOT_IN_DUTY.to_string();
            match self.state {
                State::Running => Some(self.finish(clock)),
                State::Idle => None,
            }
        };

        if self.state == State::Running {
            self.check_defeated(hostiles, clock);
        }

        event
    }

    fn start(&mut self, clock: &impl Clock) -> TrackerEvent {
        self.stopwatch.restart(clock);
        self.state = State::Running;
        self.defeated_ids.clear();
        self.splits.clear();
        tracing::debug!(duty = %self.cached_duty_name, "duty started");
        TrackerEvent::Started {
            name: self.cached_duty_name.clone(),
        }
    }

    fn finish(&mut self, clock: &impl Clock) -> TrackerEvent {
        self.stopwatch.stop(clock);
        self.state = State::Idle;
        let elapsed = self.stopwatch.elapsed(clock);
        tracing::debug!(duty = %self.cached_duty_name, ?elapsed, "duty ended");
        TrackerEvent::Completed(DutyCompleted {
            name: self.cached_duty_name.clone(),
            elapsed,
            finished_at: clock.now(),
            splits: std::mem::take(&mut self.splits),
        })
    }

    fn check_defeated(&mut self, hostiles: &[HostileEntity], clock: &impl Clock) {
        for entity in hostiles.iter().filter(|e| e.is_defeated()) {
            if !self.defeated_ids.insert(entity.entity_id) {
                continue;
            }
            let at = self.stopwatch.elapsed(clock);
            tracing::debug!(entity = entity.entity_id, name = %entity.name, ?at, "split");
            self.splits.push(Split {
                name: entity.name.clone(),
                at,
            });
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        self.stopwatch.elapsed(clock)
    }

    /// The live duty name, or [`NOT_IN_DUTY`].
    pub fn current_duty_name(&self) -> &str {
        &self.current_duty_name
    }

    pub fn defeated_count(&self) -> usize {
        self.defeated_ids.len()
    }

    /// Most recent split of the current run.
    pub fn last_split(&self) -> Option<&Split> {
        self.splits.last()
    }
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self::new()
    }
}
