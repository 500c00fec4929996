//! Panel state: what the user is looking at, never persisted.
//!
//! Rendering lives in `tui`; this module owns the selection, the highlight
//! and the two-step delete confirmation, and applies user actions to the
//! history store.

use uuid::Uuid;

use crate::history::HistoryStore;
use crate::model::DutyRecord;
use crate::storage;

/// Which record, if any, the next delete press will remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteArm {
    #[default]
    Unarmed,
    ArmedFor(Uuid),
}

/// What a delete press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Nothing removed; a second press on the same record will remove it.
    Armed,
    Removed,
}

#[derive(Debug, Default)]
pub struct PanelState {
    visible: bool,
    selected_duty: Option<String>,
    show_hidden: bool,
    highlighted: usize,
    delete: DeleteArm,
}

impl PanelState {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    pub fn selected_duty(&self) -> Option<&str> {
        self.selected_duty.as_deref()
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn is_armed_for(&self, id: Uuid) -> bool {
        self.delete == DeleteArm::ArmedFor(id)
    }

    /// Duty names offered by the selector.
    pub fn duty_options<'a>(&self, store: &'a HistoryStore) -> Vec<&'a str> {
        store.distinct_names(self.show_hidden)
    }

    /// Keep the selection pointing at a listed duty and the highlight in range.
    ///
    /// An empty or no-longer-listed selection falls back to the first option.
    pub fn sync(&mut self, store: &HistoryStore, top_count: usize) {
        let options = self.duty_options(store);
        let listed = self
            .selected_duty
            .as_deref()
            .is_some_and(|name| options.contains(&name));
        if !listed {
            self.selected_duty = options.first().map(|name| (*name).to_string());
            self.highlighted = 0;
        }

        let shown = self.top_records(store, top_count).len();
        self.highlighted = self.highlighted.min(shown.saturating_sub(1));
    }

    /// Step the selector forward, wrapping. Locked while a duty is running.
    pub fn select_next(&mut self, store: &HistoryStore, running: bool) {
        self.step_selection(store, running, true);
    }

    pub fn select_previous(&mut self, store: &HistoryStore, running: bool) {
        self.step_selection(store, running, false);
    }

    fn step_selection(&mut self, store: &HistoryStore, running: bool, forward: bool) {
        if running {
            return;
        }
        let options = self.duty_options(store);
        let len = options.len();
        if len == 0 {
            return;
        }
        let current = self
            .selected_duty
            .as_deref()
            .and_then(|name| options.iter().position(|o| *o == name));
        let next = match current {
            Some(index) if forward => (index + 1) % len,
            Some(index) => (index + len - 1) % len,
            None => 0,
        };
        self.selected_duty = Some(options[next].to_string());
        self.highlighted = 0;
    }

    pub fn toggle_show_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
    }

    pub fn move_highlight_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_highlight_down(&mut self, store: &HistoryStore, top_count: usize) {
        if self.highlighted + 1 < self.top_records(store, top_count).len() {
            self.highlighted += 1;
        }
    }

    /// Best runs of the selected duty.
    pub fn top_records<'a>(
        &self,
        store: &'a HistoryStore,
        top_count: usize,
    ) -> Vec<&'a DutyRecord> {
        self.selected_duty
            .as_deref()
            .map(|name| store.top_n(name, top_count))
            .unwrap_or_default()
    }

    pub fn highlighted_record<'a>(
        &self,
        store: &'a HistoryStore,
        top_count: usize,
    ) -> Option<&'a DutyRecord> {
        self.top_records(store, top_count)
            .get(self.highlighted)
            .copied()
    }

    /// A delete press on `id`.
    ///
    /// The first press arms it. A second press on the same id removes the
    /// record. A press on any other id re-arms for that id instead.
    pub fn click_delete(
        &mut self,
        id: Uuid,
        store: &mut HistoryStore,
    ) -> storage::Result<DeleteOutcome> {
        if self.is_armed_for(id) {
            self.delete = DeleteArm::Unarmed;
            store.remove(id)?;
            return Ok(DeleteOutcome::Removed);
        }
        self.delete = DeleteArm::ArmedFor(id);
        Ok(DeleteOutcome::Armed)
    }

    /// Hide the selected duty, or un-hide it if already hidden.
    ///
    /// Returns the duty's new hidden state, or `None` with nothing selected.
    pub fn toggle_hidden_selected(
        &mut self,
        store: &mut HistoryStore,
    ) -> storage::Result<Option<bool>> {
        let Some(name) = self.selected_duty.clone() else {
            return Ok(None);
        };
        let hidden = !store.is_hidden(&name);
        store.set_hidden(&name, hidden)?;
        Ok(Some(hidden))
    }
}
