//! Headless replay of a recorded feed.

use std::path::Path;

use jiff::Timestamp;

use crate::clock::ManualClock;
use crate::config::Config;
use crate::format::format_record_line;
use crate::history::HistoryStore;
use crate::host::ReplayHost;
use crate::session::{Session, SessionEvent};

pub(super) fn cmd_replay(store: HistoryStore, config: &Config, feed: &Path) -> Result<(), String> {
    let clock = ManualClock::new(Timestamp::now());
    let host = ReplayHost::load(feed, clock.clone())
        .map_err(|e| format!("failed to load {}: {e}", feed.display()))?;
    let frames = host.frame_count();

    let mut session = Session::new(host, clock, store, config.top_count);
    session.start();

    let mut saved = Vec::new();
    while !session.host().is_finished() {
        let event = session
            .update()
            .map_err(|e| format!("failed to save history: {e}"))?;
        if let Some(event) = event {
            eprintln!("{}", event.describe());
            if let SessionEvent::RecordSaved { id, .. } = event {
                saved.push(id);
            }
        }
    }

    if session.tracker().is_running() {
        eprintln!(
            "Feed ended mid-duty in {}; run not recorded",
            session.tracker().current_duty_name()
        );
    }
    session.stop();

    eprintln!("Replayed {frames} frame(s), saved {} run(s)", saved.len());
    for record in session
        .history()
        .records()
        .iter()
        .filter(|r| saved.contains(&r.id))
    {
        println!("{}", format_record_line(record));
    }

    Ok(())
}
