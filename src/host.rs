//! The boundary to the game client.
//!
//! A [`Host`] answers the questions the session asks every tick: is a duty
//! running, what is it called, who is in the party, which actors are down.
//! [`ReplayHost`] plays back frames recorded as JSONL; [`IdleHost`] never
//! enters a duty and backs the browse-only panel.

use std::path::Path;
use std::time::Duration;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::clock::ManualClock;
use crate::model::{HostileEntity, LocalPlayer, RosterEntry};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid frame on line {line}: {source}")]
    Frame {
        line: usize,
        source: serde_json::Error,
    },
}

/// Game state polled by the session.
pub trait Host {
    fn duty_active(&self) -> bool;

    /// Resolved display name of the current territory, if the host knows it.
    fn duty_name(&self) -> Option<String>;

    fn local_player(&self) -> Option<LocalPlayer>;

    /// Party list in host order. Empty when solo.
    fn party(&self) -> Vec<RosterEntry>;

    fn hostiles(&self) -> Vec<HostileEntity>;

    /// Move to the next frame. Live hosts have nothing to do.
    fn advance(&mut self) {}
}

/// A host that is never in a duty.
#[derive(Debug, Default)]
pub struct IdleHost;

impl Host for IdleHost {
    fn duty_active(&self) -> bool {
        false
    }

    fn duty_name(&self) -> Option<String> {
        None
    }

    fn local_player(&self) -> Option<LocalPlayer> {
        None
    }

    fn party(&self) -> Vec<RosterEntry> {
        Vec::new()
    }

    fn hostiles(&self) -> Vec<HostileEntity> {
        Vec::new()
    }
}

/// One recorded tick of game state, serialized as one line of JSONL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostFrame {
    pub duty_active: bool,

    #[serde(default)]
    pub duty_name: Option<String>,

    #[serde(default)]
    pub local_player: Option<LocalPlayer>,

    #[serde(default)]
    pub party: Vec<RosterEntry>,

    #[serde(default)]
    pub hostiles: Vec<HostileEntity>,

    /// Time that passes before the next frame.
    #[serde(default)]
    pub advance_ms: u64,
}

/// Plays back recorded frames against a manual clock.
///
/// Each [`Host::advance`] moves the clock by the current frame's
/// `advance_ms` and steps to the next frame. Once the feed runs out the last
/// frame keeps being reported.
pub struct ReplayHost {
    frames: Vec<HostFrame>,
    cursor: usize,
    clock: ManualClock,
}

impl ReplayHost {
    pub fn new(frames: Vec<HostFrame>, clock: ManualClock) -> Self {
        Self {
            frames,
            cursor: 0,
            clock,
        }
    }

    /// Parse a JSONL feed. Blank lines are skipped.
    pub fn parse(feed: &str, clock: ManualClock) -> Result<Self, HostError> {
        let mut frames = Vec::new();
        for (index, line) in feed.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(line).map_err(|source| HostError::Frame {
                line: index + 1,
                source,
            })?;
            frames.push(frame);
        }
        Ok(Self::new(frames, clock))
    }

    pub fn load(path: &Path, clock: ManualClock) -> Result<Self, HostError> {
        let feed = fs::read_to_string(path)?;
        Self::parse(&feed, clock)
    }

    /// Whether every frame has been stepped past.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self) -> Option<&HostFrame> {
        self.frames
            .get(self.cursor)
            .or_else(|| self.frames.last())
    }
}

impl Host for ReplayHost {
    fn duty_active(&self) -> bool {
        self.frame().is_some_and(|f| f.duty_active)
    }

    fn duty_name(&self) -> Option<String> {
        self.frame().and_then(|f| f.duty_name.clone())
    }

    fn local_player(&self) -> Option<LocalPlayer> {
        self.frame().and_then(|f| f.local_player.clone())
    }

    fn party(&self) -> Vec<RosterEntry> {
        self.frame().map(|f| f.party.clone()).unwrap_or_default()
    }

    fn hostiles(&self) -> Vec<HostileEntity> {
        self.frame().map(|f| f.hostiles.clone()).unwrap_or_default()
    }

    fn advance(&mut self) {
        if let Some(frame) = self.frames.get(self.cursor) {
            self.clock.advance(Duration::from_millis(frame.advance_ms));
            self.cursor += 1;
        }
    }
}
