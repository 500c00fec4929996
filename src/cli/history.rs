//! History commands: list, top, hide, unhide, delete, auto-open.

use crate::format::{format_duration, format_member, format_record_line};
use crate::history::HistoryStore;

pub(super) fn cmd_list(store: &HistoryStore, all: bool) {
    let lines = list_lines(store, all);
    if lines.is_empty() {
        println!("No runs recorded");
    }
    for line in lines {
        println!("{line}");
    }
}

/// One line per duty, first-run order. With `all`, hidden names that no
/// longer have runs are listed last.
fn list_lines(store: &HistoryStore, all: bool) -> Vec<String> {
    let names = store.distinct_names(all);
    let mut lines: Vec<String> = names
        .iter()
        .map(|&name| {
            let runs = store.records().iter().filter(|r| r.name == name).count();
            let marker = if store.is_hidden(name) { "  [hidden]" } else { "" };
            format!("{name}  ({runs} runs){marker}")
        })
        .collect();
    if all {
        lines.extend(
            store
                .hidden()
                .iter()
                .filter(|h| !names.contains(&h.as_str()))
                .map(|name| format!("{name}  (0 runs)  [hidden]")),
        );
    }
    lines
}

pub(super) fn cmd_top(store: &HistoryStore, duty: &str, count: usize) {
    let lines = top_lines(store, duty, count);
    if lines.is_empty() {
        println!("No runs of '{duty}'");
    }
    for line in lines {
        println!("{line}");
    }
}

fn top_lines(store: &HistoryStore, duty: &str, count: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for record in store.top_n(duty, count) {
        lines.push(format_record_line(record));
        for member in &record.party {
            lines.push(format!("    {}", format_member(member)));
        }
        for split in &record.splits {
            lines.push(format!("    {} @ {}", split.name, format_duration(split.at)));
        }
    }
    lines
}

pub(super) fn cmd_set_hidden(
    store: &mut HistoryStore,
    duty: &str,
    hidden: bool,
) -> Result<(), String> {
    if !store.records().iter().any(|r| r.name == duty) {
        eprintln!("Note: no runs of '{duty}' recorded yet");
    }

    store
        .set_hidden(duty, hidden)
        .map_err(|e| format!("failed to save history: {e}"))?;

    let verb = if hidden { "hidden" } else { "visible" };
    eprintln!("{duty} is now {verb}");
    Ok(())
}

pub(super) fn cmd_delete(store: &mut HistoryStore, reference: &str) -> Result<(), String> {
    let line = delete_record(store, reference)?;
    eprintln!("Deleted {line}");
    Ok(())
}

/// Remove the record `reference` resolves to. Returns its summary line.
fn delete_record(store: &mut HistoryStore, reference: &str) -> Result<String, String> {
    let record = store.find(reference).map_err(|e| e.to_string())?;
    let (id, line) = (record.id, format_record_line(record));

    store
        .remove(id)
        .map_err(|e| format!("failed to save history: {e}"))?;
    Ok(line)
}

pub(super) fn cmd_auto_open(store: &mut HistoryStore, enabled: bool) -> Result<(), String> {
    store
        .set_auto_open(enabled)
        .map_err(|e| format!("failed to save history: {e}"))?;

    let state = if enabled { "on" } else { "off" };
    eprintln!("Auto-open in duty: {state}");
    Ok(())
}
