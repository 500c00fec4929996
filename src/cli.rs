//! CLI interface for DutySpeed.
//!
//! With no subcommand the interactive panel opens over the run history.
//! Every other subcommand is non-interactive: arguments in, plain text out.
//!
//! - `dutyspeed panel [--replay <feed>]`: the interactive panel.
//! - `dutyspeed replay <feed>`: run a recorded feed headless.
//! - `dutyspeed list|top|hide|unhide|delete|auto-open`: inspect and edit history.

mod history;
mod replay;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;

use crate::clock::{ManualClock, SystemClock};
use crate::config::Config;
use crate::history::HistoryStore;
use crate::host::{IdleHost, ReplayHost};
use crate::logging::{self, LogTarget};
use crate::paths::resolve_data_dir;
use crate::session::Session;
use crate::storage::Storage;
use crate::tui;

/// DutySpeed: time your duties.
#[derive(Debug, Parser)]
#[command(name = "dutyspeed", after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Directory holding history and logs. Defaults to `~/.dutyspeed`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

const USAGE_HELP: &str = r"Browsing history:
  dutyspeed                        open the panel
  dutyspeed list --all             duty names, hidden ones marked
  dutyspeed top 'Alpha Dungeon' -n 3
  dutyspeed delete a3b             by id or unambiguous id prefix

Recorded sessions:
  dutyspeed replay session.jsonl   store every qualifying run from the feed
  dutyspeed panel --replay session.jsonl

Panel keys:
  tab /ds (toggle panel)  a auto-open  ←→ duty  ↑↓ record
  d delete (press twice)  h hide/unhide  s show hidden  q quit";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive panel.
    Panel {
        /// Drive the panel from a recorded JSONL feed instead of idling.
        #[arg(long)]
        replay: Option<PathBuf>,
    },

    /// Play a recorded JSONL feed and store each qualifying run.
    Replay {
        /// One host frame per line.
        feed: PathBuf,
    },

    /// List duty names in the order they were first run.
    List {
        /// Include hidden duties.
        #[arg(long)]
        all: bool,
    },

    /// Show the fastest runs of a duty.
    Top {
        /// Duty name, exactly as listed.
        duty: String,

        /// How many runs to show. Defaults to `top-count` from config.
        #[arg(short = 'n', long = "count")]
        count: Option<usize>,
    },

    /// Hide a duty from the default selector. Its runs are kept.
    Hide { duty: String },

    /// Show a hidden duty again.
    Unhide { duty: String },

    /// Delete one run.
    Delete {
        /// Record ID: full UUID or unambiguous prefix (e.g. `a3b`).
        record: String,
    },

    /// Open the panel automatically when a duty starts.
    AutoOpen {
        #[arg(value_enum)]
        state: Switch,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref(), config)?;
    let storage = Storage::new(&data_dir)
        .map_err(|e| format!("failed to initialize storage at {}: {e}", data_dir.display()))?;

    let command = cli.command.unwrap_or(Command::Panel { replay: None });
    let log_path = storage.log_path();
    let target = match command {
        Command::Panel { .. } => LogTarget::File(&log_path),
        _ => LogTarget::Stderr,
    };
    logging::init(&config.log_filter, target)
        .map_err(|e| format!("failed to open log file: {e}"))?;

    let mut store = open_history(storage)?;

    match command {
        Command::Panel { replay } => cmd_panel(store, config, replay.as_deref()),
        Command::Replay { feed } => replay::cmd_replay(store, config, &feed),
        Command::List { all } => {
            history::cmd_list(&store, all);
            Ok(())
        }
        Command::Top { duty, count } => {
            history::cmd_top(&store, &duty, count.unwrap_or(config.top_count));
            Ok(())
        }
        Command::Hide { duty } => history::cmd_set_hidden(&mut store, &duty, true),
        Command::Unhide { duty } => history::cmd_set_hidden(&mut store, &duty, false),
        Command::Delete { record } => history::cmd_delete(&mut store, &record),
        Command::AutoOpen { state } => {
            history::cmd_auto_open(&mut store, matches!(state, Switch::On))
        }
    }
}

fn open_history(storage: Storage) -> Result<HistoryStore, String> {
    let path = storage.history_path();
    HistoryStore::open(storage).map_err(|e| format!("failed to load {}: {e}", path.display()))
}

fn cmd_panel(store: HistoryStore, config: &Config, replay: Option<&Path>) -> Result<(), String> {
    let result = match replay {
        Some(feed) => {
            let clock = ManualClock::new(Timestamp::now());
            let host = ReplayHost::load(feed, clock.clone())
                .map_err(|e| format!("failed to load {}: {e}", feed.display()))?;
            let mut session = Session::new(host, clock, store, config.top_count);
            session.panel_mut().set_visible(true);
            tui::run(&mut session, config.tick())
        }
        None => {
            let mut session = Session::new(IdleHost, SystemClock::new(), store, config.top_count);
            session.panel_mut().set_visible(true);
            tui::run(&mut session, config.tick())
        }
    };
    result.map_err(|e| format!("panel failed: {e}"))
}
