//! Update-then-render loop and key routing.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use crate::clock::Clock;
use crate::format::format_record_line;
use crate::host::Host;
use crate::panel::DeleteOutcome;
use crate::session::{Session, TOGGLE_COMMAND};

use super::screens::PanelScreen;

/// Whether the loop keeps going after a key.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs the panel until the user quits.
///
/// The session is started for the duration of the loop and stopped on exit.
pub fn run<H: Host, C: Clock>(session: &mut Session<H, C>, tick: Duration) -> io::Result<()> {
    let mut terminal = ratatui::init();
    session.start();
    let result = event_loop(&mut terminal, session, tick);
    session.stop();
    ratatui::restore();
    result
}

fn event_loop<H: Host, C: Clock>(
    terminal: &mut DefaultTerminal,
    session: &mut Session<H, C>,
    tick: Duration,
) -> io::Result<()> {
    let mut screen = PanelScreen::new();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| screen.render(frame, session))?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key(session, &mut screen, key.code)? == Flow::Quit
                {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick {
            if let Some(event) = session.update().map_err(io::Error::other)? {
                screen.set_status(event.describe());
            }
            last_tick = Instant::now();
        }
    }
}

fn handle_key<H: Host, C: Clock>(
    session: &mut Session<H, C>,
    screen: &mut PanelScreen,
    code: KeyCode,
) -> io::Result<Flow> {
    match code {
        KeyCode::Char('q') => return Ok(Flow::Quit),
        KeyCode::Tab => {
            session.dispatch(TOGGLE_COMMAND);
        }
        _ if !session.panel().is_visible() => {}
        KeyCode::Char('a') => session.toggle_auto_open().map_err(io::Error::other)?,
        KeyCode::Left => session.select_previous_duty(),
        KeyCode::Right => session.select_next_duty(),
        KeyCode::Up | KeyCode::Char('k') => session.highlight_up(),
        KeyCode::Down | KeyCode::Char('j') => session.highlight_down(),
        KeyCode::Char('s') => session.toggle_show_hidden(),
        KeyCode::Char('h') => {
            let name = session.panel().selected_duty().map(String::from);
            if let (Some(hidden), Some(name)) =
                (session.toggle_hidden_selected().map_err(io::Error::other)?, name)
            {
                let state = if hidden { "hidden" } else { "visible" };
                screen.set_status(format!("{name} is now {state}"));
            }
        }
        KeyCode::Char('d') => {
            let line = session
                .panel()
                .highlighted_record(session.history(), session.top_count())
                .map(format_record_line);
            match (session.delete_highlighted().map_err(io::Error::other)?, line) {
                (Some(DeleteOutcome::Armed), Some(line)) => {
                    screen.set_status(format!("Press d again to delete {line}"));
                }
                (Some(DeleteOutcome::Removed), Some(line)) => {
                    screen.set_status(format!("Deleted {line}"));
                }
                _ => {}
            }
        }
        _ => {}
    }
    Ok(Flow::Continue)
}
