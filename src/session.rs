//! The session harness: host → tracker → snapshot → history → panel.
//!
//! A session is created once and started explicitly. While started, each
//! [`Session::update`] polls the host, advances the tracker, and on duty
//! completion snapshots the party and hands the run to the history store.
//! Calls are sequential; nothing here is shared across threads.

use std::time::Duration;

use uuid::Uuid;

use crate::clock::Clock;
use crate::format::format_duration;
use crate::history::HistoryStore;
use crate::host::Host;
use crate::panel::{DeleteOutcome, PanelState};
use crate::party;
use crate::storage;
use crate::tracker::{LifecycleTracker, TrackerEvent, UNKNOWN_DUTY};

/// Flips panel visibility.
pub const TOGGLE_COMMAND: &str = "/ds";

/// Something the user should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DutyStarted {
        name: String,
    },
    RecordSaved {
        id: Uuid,
        name: String,
        duration: Duration,
    },
    /// The run ended too quickly to keep.
    RunDiscarded {
        name: String,
        elapsed: Duration,
    },
}

impl SessionEvent {
    /// One-line human-readable form, as shown in the panel status line.
    pub fn describe(&self) -> String {
        match self {
            Self::DutyStarted { name } => format!("{name} started"),
            Self::RecordSaved { name, duration, .. } => {
                format!("{name} saved: {}", format_duration(*duration))
            }
            Self::RunDiscarded { name, elapsed } => {
                format!("{name} discarded after {}", format_duration(*elapsed))
            }
        }
    }
}

pub struct Session<H, C> {
    host: H,
    clock: C,
    tracker: LifecycleTracker,
    history: HistoryStore,
    panel: PanelState,
    top_count: usize,
    started: bool,
}

impl<H: Host, C: Clock> Session<H, C> {
    pub fn new(host: H, clock: C, history: HistoryStore, top_count: usize) -> Self {
        Self {
            host,
            clock,
            tracker: LifecycleTracker::new(),
            history,
            panel: PanelState::new(false),
            top_count,
            started: false,
        }
    }

    /// Begin reacting to updates.
    pub fn start(&mut self) {
        self.started = true;
        self.panel.sync(&self.history, self.top_count);
        tracing::debug!("session started");
    }

    /// Stop reacting to updates. A run in progress is left as is.
    pub fn stop(&mut self) {
        self.started = false;
        tracing::debug!("session stopped");
    }

    /// One update tick. Does nothing unless started.
    pub fn update(&mut self) -> storage::Result<Option<SessionEvent>> {
        if !self.started {
            return Ok(None);
        }

        let active = self.host.duty_active();
        let live_name = if active {
            self.host
                .duty_name()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_DUTY.to_string())
        } else {
            String::new()
        };
        let hostiles = self.host.hostiles();

        let event = match self.tracker.on_tick(active, &live_name, &hostiles, &self.clock) {
            Some(TrackerEvent::Started { name }) => {
                tracing::info!(duty = %name, "duty started");
                if self.history.auto_open() {
                    self.panel.set_visible(true);
                }
                Some(SessionEvent::DutyStarted { name })
            }
            Some(TrackerEvent::Completed(completed)) => {
                let party = party::snapshot(self.host.local_player().as_ref(), &self.host.party());
                let name = completed.name.clone();
                let elapsed = completed.elapsed;
                match self.history.record_completion(completed, party)? {
                    Some(record) => {
                        let event = SessionEvent::RecordSaved {
                            id: record.id,
                            name: record.name.clone(),
                            duration: record.duration,
                        };
                        tracing::info!("{}", event.describe());
                        Some(event)
                    }
                    None => Some(SessionEvent::RunDiscarded { name, elapsed }),
                }
            }
            None => None,
        };

        self.panel.sync(&self.history, self.top_count);
        self.host.advance();
        Ok(event)
    }

    /// Run a user command. Returns whether it was recognised.
    pub fn dispatch(&mut self, command: &str) -> bool {
        match command.trim() {
            TOGGLE_COMMAND => {
                self.panel.toggle_visible();
                true
            }
            other => {
                tracing::warn!(command = other, "unknown command");
                false
            }
        }
    }

    // ── Panel actions ──

    pub fn select_next_duty(&mut self) {
        self.panel.select_next(&self.history, self.tracker.is_running());
    }

    pub fn select_previous_duty(&mut self) {
        self.panel.select_previous(&self.history, self.tracker.is_running());
    }

    pub fn highlight_up(&mut self) {
        self.panel.move_highlight_up();
    }

    pub fn highlight_down(&mut self) {
        self.panel.move_highlight_down(&self.history, self.top_count);
    }

    /// Delete press on the highlighted record.
    pub fn delete_highlighted(&mut self) -> storage::Result<Option<DeleteOutcome>> {
        let Some(id) = self
            .panel
            .highlighted_record(&self.history, self.top_count)
            .map(|r| r.id)
        else {
            return Ok(None);
        };
        let outcome = self.panel.click_delete(id, &mut self.history)?;
        self.panel.sync(&self.history, self.top_count);
        Ok(Some(outcome))
    }

    pub fn toggle_hidden_selected(&mut self) -> storage::Result<Option<bool>> {
        let hidden = self.panel.toggle_hidden_selected(&mut self.history)?;
        self.panel.sync(&self.history, self.top_count);
        Ok(hidden)
    }

    pub fn toggle_show_hidden(&mut self) {
        self.panel.toggle_show_hidden();
        self.panel.sync(&self.history, self.top_count);
    }

    pub fn toggle_auto_open(&mut self) -> storage::Result<()> {
        let enabled = !self.history.auto_open();
        self.history.set_auto_open(enabled)
    }

    // ── Accessors ──

    pub fn tracker(&self) -> &LifecycleTracker {
        &self.tracker
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelState {
        &mut self.panel
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn top_count(&self) -> usize {
        self.top_count
    }

    pub fn elapsed(&self) -> Duration {
        self.tracker.elapsed(&self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;

    use crate::clock::ManualClock;
    use crate::host::{HostFrame, ReplayHost};
    use crate::model::{LocalPlayer, RosterEntry};
    use crate::storage::Storage;
    use crate::tracker::NOT_IN_DUTY;

    fn clock() -> ManualClock {
        ManualClock::new(Timestamp::new(1_800_000_000, 0).unwrap())
    }

    fn idle(advance_ms: u64) -> HostFrame {
        HostFrame {
            duty_active: false,
            advance_ms,
            ..HostFrame::default()
        }
    }

    fn active(name: Option<&str>, advance_ms: u64) -> HostFrame {
        HostFrame {
            duty_active: true,
            duty_name: name.map(String::from),
            advance_ms,
            ..HostFrame::default()
        }
    }

    fn solo_finish() -> HostFrame {
        HostFrame {
            local_player: Some(LocalPlayer {
                name: "Aria Vale".into(),
                job: "WHM".into(),
            }),
            ..idle(0)
        }
    }

    fn session(frames: Vec<HostFrame>) -> (TempDir, Session<ReplayHost, ManualClock>) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        let history = HistoryStore::open(storage).unwrap();
        let clock = clock();
        let host = ReplayHost::new(frames, clock.clone());
        let mut session = Session::new(host, clock, history, 5);
        session.start();
        (dir, session)
    }

    fn run_all(session: &mut Session<ReplayHost, ManualClock>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while !session.host().is_finished() {
            if let Some(event) = session.update().unwrap() {
                events.push(event);
            }
        }
        events
    }

    #[test]
    fn alpha_scenario_records_one_run() {
        // Idle, then nine active ticks five seconds apart, then idle again.
        let mut frames = vec![idle(0)];
        frames.extend((0..9).map(|_| active(Some("Alpha"), 5_000)));
        frames.push(solo_finish());
        let (dir, mut session) = session(frames);

        let events = run_all(&mut session);

        assert!(matches!(&events[0], SessionEvent::DutyStarted { name } if name == "Alpha"));
        let records = session.history().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Alpha");
        assert_eq!(records[0].duration, Duration::from_secs(45));
        assert_eq!(records[0].party[0].name, "Aria Vale");
        assert!(session.history().distinct_names(false).contains(&"Alpha"));
        assert_eq!(session.tracker().current_duty_name(), NOT_IN_DUTY);

        // Persisted.
        let reloaded = HistoryStore::open(Storage::new(dir.path().join("data")).unwrap()).unwrap();
        assert_eq!(reloaded.records().len(), 1);
    }

    #[test]
    fn quick_exit_is_discarded() {
        let (_dir, mut session) = session(vec![active(Some("Alpha"), 4_000), idle(0)]);

        let events = run_all(&mut session);

        assert!(matches!(events.last(), Some(SessionEvent::RunDiscarded { .. })));
        assert!(session.history().records().is_empty());
    }

    #[test]
    fn record_named_after_last_active_frame() {
        let (_dir, mut session) = session(vec![
            active(Some("Alpha"), 15_000),
            active(Some("Alpha"), 15_000),
            idle(0),
        ]);

        run_all(&mut session);

        assert_eq!(session.history().records()[0].name, "Alpha");
    }

    #[test]
    fn unresolved_name_becomes_unknown_duty() {
        let (_dir, mut session) = session(vec![active(None, 20_000), idle(0)]);

        run_all(&mut session);

        assert_eq!(session.history().records()[0].name, UNKNOWN_DUTY);
        assert!(session.history().records()[0].party.is_empty());
    }

    #[test]
    fn party_snapshot_taken_at_completion() {
        let finish = HostFrame {
            party: vec![
                RosterEntry {
                    name: "Tank Person".into(),
                    job: "PLD".into(),
                },
                RosterEntry {
                    name: "Aria Vale".into(),
                    job: "WHM".into(),
                },
            ],
            ..solo_finish()
        };
        let (_dir, mut session) = session(vec![active(Some("Alpha"), 20_000), finish]);

        run_all(&mut session);

        let party = &session.history().records()[0].party;
        assert_eq!(party.len(), 2);
        assert_eq!(party[0].job, "PLD");
    }

    #[test]
    fn completed_run_unhides_duty() {
        let (_dir, mut session) = session(vec![active(Some("Alpha Dungeon"), 20_000), idle(0)]);
        session.history.set_hidden("Alpha Dungeon", true).unwrap();

        run_all(&mut session);

        assert!(!session.history().is_hidden("Alpha Dungeon"));
    }

    #[test]
    fn auto_open_shows_panel_on_start() {
        let (_dir, mut session) = session(vec![active(Some("Alpha"), 1_000)]);
        assert!(!session.panel().is_visible());

        session.update().unwrap();
        assert!(session.panel().is_visible());
    }

    #[test]
    fn auto_open_disabled_leaves_panel_closed() {
        let (_dir, mut session) = session(vec![active(Some("Alpha"), 1_000)]);
        session.toggle_auto_open().unwrap();

        session.update().unwrap();
        assert!(!session.panel().is_visible());
    }

    #[test]
    fn stopped_session_ignores_updates() {
        let (_dir, mut session) = session(vec![active(Some("Alpha"), 1_000)]);
        session.stop();

        assert_eq!(session.update().unwrap(), None);
        assert!(!session.tracker().is_running());
    }

    #[test]
    fn toggle_command_flips_visibility() {
        let (_dir, mut session) = session(vec![]);

        assert!(session.dispatch(TOGGLE_COMMAND));
        assert!(session.panel().is_visible());
        assert!(session.dispatch(" /ds "));
        assert!(!session.panel().is_visible());
        assert!(!session.dispatch("/nope"));
    }

    #[test]
    fn selector_locked_during_duty() {
        let mut frames = vec![active(Some("Beta"), 20_000), idle(0)];
        frames.push(active(Some("Alpha"), 20_000));
        frames.push(idle(0));
        frames.push(active(Some("Gamma"), 1_000));
        let (_dir, mut session) = session(frames);
        for _ in 0..5 {
            session.update().unwrap();
        }
        assert!(session.tracker().is_running());
        let before = session.panel().selected_duty().map(String::from);

        session.select_next_duty();
        assert_eq!(session.panel().selected_duty().map(String::from), before);
    }

    #[test]
    fn delete_highlighted_needs_two_presses() {
        let (_dir, mut session) = session(vec![active(Some("Alpha"), 20_000), idle(0)]);
        run_all(&mut session);

        assert_eq!(session.delete_highlighted().unwrap(), Some(DeleteOutcome::Armed));
        assert_eq!(session.history().records().len(), 1);
        assert_eq!(session.delete_highlighted().unwrap(), Some(DeleteOutcome::Removed));
        assert!(session.history().records().is_empty());
        assert_eq!(session.delete_highlighted().unwrap(), None);
    }

    #[test]
    fn describe_saved_event() {
        let event = SessionEvent::RecordSaved {
            id: Uuid::nil(),
            name: "Alpha".into(),
            duration: Duration::from_secs(754),
        };
        assert_eq!(event.describe(), "Alpha saved: 12:34");
    }
}
