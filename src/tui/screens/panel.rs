//! Panel screen: timer, duty selector, best runs, party detail.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Padding, Paragraph};

use crate::clock::Clock;
use crate::format::{format_date, format_duration, format_member};
use crate::host::Host;
use crate::session::Session;

const TIMER_GREEN: Color = Color::Rgb(102, 255, 102);
const RECORD_GOLD: Color = Color::Rgb(255, 204, 51);

#[derive(Default)]
pub struct PanelScreen {
    status: Option<String>,
}

impl PanelScreen {
    pub fn new() -> Self {
        Self { status: None }
    }

    /// Replace the one-line status message.
    pub fn set_status(&mut self, status: String) {
        self.status = Some(status);
    }

    pub fn render<H: Host, C: Clock>(&self, frame: &mut Frame, session: &Session<H, C>) {
        if session.panel().is_visible() {
            self.render_open(frame, session);
        } else {
            render_collapsed(frame, session);
        }
    }

    fn render_open<H: Host, C: Clock>(&self, frame: &mut Frame, session: &Session<H, C>) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(3), // title + auto-open
            Constraint::Length(1), // separator
            Constraint::Length(4), // status + timer + split
            Constraint::Length(1), // separator
            Constraint::Length(2), // selector
            Constraint::Min(3),    // top records
            Constraint::Length(1), // status message
            Constraint::Length(1), // help
        ])
        .split(area);

        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);
        let highlight = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let tracker = session.tracker();
        let history = session.history();
        let panel = session.panel();

        // Title and auto-open checkbox.
        let checkbox = if history.auto_open() { "[x]" } else { "[ ]" };
        let title = Paragraph::new(vec![
            Line::from(Span::styled("DutySpeed", highlight)),
            Line::from(vec![
                Span::styled(format!("{checkbox} "), normal),
                Span::styled("Auto-open in Duty", normal),
            ]),
        ])
        .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(title, chunks[0]);

        render_separator(frame, chunks[1], muted);

        // Status and timer.
        let label = if tracker.is_running() {
            "Active Duty:"
        } else {
            "Status:"
        };
        let split = match tracker.last_split() {
            Some(split) => format!(
                "Last split: {} @ {} ({} down)",
                split.name,
                format_duration(split.at),
                tracker.defeated_count()
            ),
            None if tracker.is_running() => "Last split: Started".to_string(),
            None => "Last split: None".to_string(),
        };
        let timer = Paragraph::new(vec![
            Line::from(Span::styled(label, muted)),
            Line::from(Span::styled(tracker.current_duty_name().to_string(), normal)),
            Line::from(Span::styled(
                format_duration(session.elapsed()),
                Style::default()
                    .fg(TIMER_GREEN)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(split, muted)),
        ])
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
        frame.render_widget(timer, chunks[2]);

        render_separator(frame, chunks[3], muted);

        // Duty selector, locked while a duty runs.
        let selector_style = if tracker.is_running() { muted } else { highlight };
        let selected = panel.selected_duty().unwrap_or("");
        let mut selector = vec![Span::styled(format!("‹ {selected} ›"), selector_style)];
        if !selected.is_empty() && history.is_hidden(selected) {
            selector.push(Span::styled("  [hidden]", muted));
        }
        if tracker.is_running() {
            selector.push(Span::styled("  (locked during duty)", muted));
        }
        let heading = if panel.show_hidden() {
            "Browse Records (showing hidden):"
        } else {
            "Browse Records:"
        };
        let browse = Paragraph::new(vec![
            Line::from(Span::styled(heading, normal)),
            Line::from(selector),
        ])
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
        frame.render_widget(browse, chunks[4]);

        render_records(frame, chunks[5], session);

        if let Some(status) = &self.status {
            let message = Paragraph::new(Line::from(Span::styled(format!(" {status}"), normal)));
            frame.render_widget(message, chunks[6]);
        }

        let help = Paragraph::new(Line::from(vec![Span::styled(
            " ←→ duty  ↑↓ record  d delete  h hide  s show hidden  a auto-open  tab hide panel  q quit",
            muted,
        )]));
        frame.render_widget(help, chunks[7]);
    }
}

fn render_records<H: Host, C: Clock>(frame: &mut Frame, area: Rect, session: &Session<H, C>) {
    let muted = Style::default().fg(Color::DarkGray);
    let normal = Style::default().fg(Color::Gray);
    let highlight = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let armed = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);

    let history = session.history();
    let panel = session.panel();
    let top_count = session.top_count();
    let top = panel.top_records(history, top_count);

    let columns =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(area);

    let mut items = vec![ListItem::new(Line::from(Span::styled(
        format!("Top {top_count} Records:"),
        Style::default().fg(RECORD_GOLD),
    )))];
    if top.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled("  No runs yet", muted))));
    }
    for (i, record) in top.iter().enumerate() {
        let focused = i == panel.highlighted();
        let style = if focused { highlight } else { normal };
        let pointer = if focused { "› " } else { "  " };
        let mut spans = vec![
            Span::styled(pointer, style),
            Span::styled(
                format!(
                    "• {} ({})",
                    format_duration(record.duration),
                    format_date(record.timestamp)
                ),
                style,
            ),
        ];
        if panel.is_armed_for(record.id) {
            spans.push(Span::styled("  ✕ press d again", armed));
        }
        items.push(ListItem::new(Line::from(spans)));
    }
    let list = List::new(items).block(Block::default().padding(Padding::new(2, 1, 1, 0)));
    frame.render_widget(list, columns[0]);

    // Party of the focused run.
    let party: Vec<Line> = panel
        .highlighted_record(history, top_count)
        .map(|record| {
            record
                .party
                .iter()
                .map(|m| Line::from(Span::styled(format_member(m), normal)))
                .collect()
        })
        .unwrap_or_default();
    let detail = Paragraph::new(party).block(Block::default().padding(Padding::new(1, 2, 2, 0)));
    frame.render_widget(detail, columns[1]);
}

fn render_collapsed<H: Host, C: Clock>(frame: &mut Frame, session: &Session<H, C>) {
    let muted = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::styled(" DutySpeed hidden · tab or /ds to show · q quit", muted)];
    if session.tracker().is_running() {
        spans.push(Span::styled(
            format!("  {}", format_duration(session.elapsed())),
            Style::default().fg(TIMER_GREEN),
        ));
    }
    let area = frame.area();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_separator(frame: &mut Frame, area: Rect, style: Style) {
    let sep = Paragraph::new(Line::from(vec![Span::styled(
        "─".repeat(area.width.saturating_sub(4) as usize),
        style,
    )]))
    .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
    frame.render_widget(sep, area);
}
