//! Run history: completed duty records plus the hidden-duty set.
//!
//! The store holds the loaded [`PluginConfig`] and writes it back through
//! [`Storage`] after every mutation. Lookups are linear scans; history stays
//! small enough that nothing better is needed.

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use uuid::Uuid;

use crate::model::{DutyRecord, PartyMember, PluginConfig};
use crate::storage::{self, Storage};
use crate::tracker::DutyCompleted;

/// Runs this short or shorter are zone-transition false starts and are never stored.
pub const MIN_RECORD_DURATION: Duration = Duration::from_secs(10);

/// Errors from resolving a record reference.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("no record matching '{0}'")]
    NoMatch(String),

    #[error("'{reference}' is ambiguous, matches {} records: {}", .matches.len(), .matches.join(", "))]
    Ambiguous {
        reference: String,
        matches: Vec<String>,
    },
}

pub struct HistoryStore {
    config: PluginConfig,
    storage: Storage,
}

impl HistoryStore {
    /// Load history from storage.
    pub fn open(storage: Storage) -> storage::Result<Self> {
        let config = storage.load()?;
        Ok(Self { config, storage })
    }

    /// Turn a finished run into a record, if it ran long enough.
    ///
    /// Returns the stored record, or `None` when the run was filtered out.
    pub fn record_completion(
        &mut self,
        completed: DutyCompleted,
        party: Vec<PartyMember>,
    ) -> storage::Result<Option<&DutyRecord>> {
        if completed.elapsed <= MIN_RECORD_DURATION {
            tracing::debug!(
                duty = %completed.name,
                elapsed = ?completed.elapsed,
                "run too short to record"
            );
            return Ok(None);
        }

        let record = DutyRecord {
            id: Uuid::new_v4(),
            name: completed.name,
            duration: completed.elapsed,
            timestamp: completed.finished_at,
            party,
            splits: completed.splits,
        };
        self.append(record)?;
        Ok(self.config.run_history.last())
    }

    /// Append a record. A new run for a hidden duty un-hides it.
    pub fn append(&mut self, record: DutyRecord) -> storage::Result<()> {
        self.config.hidden_duties.remove(&record.name);
        self.config.run_history.push(record);
        self.save()
    }

    /// Remove the record with this id. Returns whether one was removed.
    pub fn remove(&mut self, id: Uuid) -> storage::Result<bool> {
        let Some(index) = self.config.run_history.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let removed = self.config.run_history.remove(index);
        tracing::info!(duty = %removed.name, id = %removed.short_id(), "record deleted");
        self.save()?;
        Ok(true)
    }

    pub fn set_hidden(&mut self, name: &str, hidden: bool) -> storage::Result<()> {
        if hidden {
            self.config.hidden_duties.insert(name.to_string());
        } else {
            self.config.hidden_duties.remove(name);
        }
        self.save()
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.config.hidden_duties.contains(name)
    }

    pub fn set_auto_open(&mut self, enabled: bool) -> storage::Result<()> {
        self.config.auto_open_on_duty = enabled;
        self.save()
    }

    pub fn auto_open(&self) -> bool {
        self.config.auto_open_on_duty
    }

    /// The `n` fastest runs of a duty, fastest first.
    ///
    /// Equal durations keep their insertion order.
    pub fn top_n(&self, name: &str, n: usize) -> Vec<&DutyRecord> {
        let mut runs: Vec<&DutyRecord> = self
            .config
            .run_history
            .iter()
            .filter(|r| r.name == name)
            .collect();
        runs.sort_by_key(|r| r.duration);
        runs.truncate(n);
        runs
    }

    /// Duty names in the order they first appear in history.
    pub fn distinct_names(&self, include_hidden: bool) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.config
            .run_history
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| seen.insert(*name))
            .filter(|name| include_hidden || !self.is_hidden(name))
            .collect()
    }

    pub fn records(&self) -> &[DutyRecord] {
        &self.config.run_history
    }

    pub fn hidden(&self) -> &BTreeSet<String> {
        &self.config.hidden_duties
    }

    /// Resolve a full id or an unambiguous id prefix to a record.
    ///
    /// An empty reference matches nothing.
    pub fn find(&self, reference: &str) -> Result<&DutyRecord, HistoryError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(HistoryError::NoMatch(reference.to_string()));
        }
        if let Ok(id) = reference.parse::<Uuid>() {
            return self
                .config
                .run_history
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| HistoryError::NoMatch(reference.to_string()));
        }

        let matches: Vec<&DutyRecord> = self
            .config
            .run_history
            .iter()
            .filter(|r| r.id.to_string().starts_with(reference))
            .collect();

        match matches.as_slice() {
            [] => Err(HistoryError::NoMatch(reference.to_string())),
            [record] => Ok(record),
            _ => Err(HistoryError::Ambiguous {
                reference: reference.to_string(),
                matches: matches.iter().map(|r| r.short_id()).collect(),
            }),
        }
    }

    fn save(&self) -> storage::Result<()> {
        self.storage.save(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, HistoryStore) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        (dir, HistoryStore::open(storage).unwrap())
    }

    fn reopen(dir: &TempDir) -> HistoryStore {
        HistoryStore::open(Storage::new(dir.path().join("data")).unwrap()).unwrap()
    }

    fn record(name: &str, secs: u64) -> DutyRecord {
        DutyRecord {
            id: Uuid::new_v4(),
            name: name.into(),
            duration: Duration::from_secs(secs),
            timestamp: Timestamp::now(),
            party: vec![],
            splits: vec![],
        }
    }

    fn completed(name: &str, elapsed: Duration) -> DutyCompleted {
        DutyCompleted {
            name: name.into(),
            elapsed,
            finished_at: Timestamp::now(),
            splits: vec![],
        }
    }

    #[test]
    fn short_run_is_not_recorded() {
        let (_dir, mut store) = test_store();

        let stored = store
            .record_completion(completed("Alpha", Duration::from_secs(9)), vec![])
            .unwrap();
        assert!(stored.is_none());

        let stored = store
            .record_completion(completed("Alpha", MIN_RECORD_DURATION), vec![])
            .unwrap();
        assert!(stored.is_none());
        assert!(store.records().is_empty());
    }

    #[test]
    fn run_over_threshold_recorded_once() {
        let (dir, mut store) = test_store();
        let elapsed = MIN_RECORD_DURATION + Duration::from_millis(1);

        let stored = store
            .record_completion(completed("Alpha", elapsed), vec![])
            .unwrap()
            .cloned()
            .unwrap();
        assert_eq!(stored.duration, elapsed);
        assert_eq!(store.records().len(), 1);

        // Persisted immediately.
        assert_eq!(reopen(&dir).records(), &[stored]);
    }

    #[test]
    fn append_keeps_insertion_order() {
        let (_dir, mut store) = test_store();
        store.append(record("A", 30)).unwrap();
        store.append(record("B", 20)).unwrap();
        store.append(record("A", 10)).unwrap();

        let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "A"]);
    }

    #[test]
    fn completion_unhides_duty() {
        let (_dir, mut store) = test_store();
        store.set_hidden("Alpha Dungeon", true).unwrap();

        store
            .record_completion(completed("Alpha Dungeon", Duration::from_secs(42)), vec![])
            .unwrap();

        assert!(!store.is_hidden("Alpha Dungeon"));
    }

    #[test]
    fn short_run_leaves_duty_hidden() {
        let (_dir, mut store) = test_store();
        store.set_hidden("Alpha Dungeon", true).unwrap();

        store
            .record_completion(completed("Alpha Dungeon", Duration::from_secs(3)), vec![])
            .unwrap();

        assert!(store.is_hidden("Alpha Dungeon"));
    }

    #[test]
    fn hide_twice_is_idempotent() {
        let (dir, mut store) = test_store();
        store.set_hidden("Alpha", true).unwrap();
        store.set_hidden("Alpha", true).unwrap();

        assert_eq!(store.hidden().len(), 1);
        assert!(reopen(&dir).is_hidden("Alpha"));

        store.set_hidden("Alpha", false).unwrap();
        assert!(reopen(&dir).hidden().is_empty());
    }

    #[test]
    fn hidden_names_need_no_records() {
        let (_dir, mut store) = test_store();
        store.set_hidden("Never Ran", true).unwrap();
        assert!(store.is_hidden("Never Ran"));
        assert!(store.distinct_names(true).is_empty());
    }

    #[test]
    fn remove_deletes_only_the_match() {
        let (dir, mut store) = test_store();
        let keep = record("A", 30);
        let gone = record("A", 20);
        store.append(keep.clone()).unwrap();
        store.append(gone.clone()).unwrap();

        assert!(store.remove(gone.id).unwrap());
        assert_eq!(store.records(), std::slice::from_ref(&keep));
        assert_eq!(reopen(&dir).records(), &[keep]);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let (_dir, mut store) = test_store();
        store.append(record("A", 30)).unwrap();

        assert!(!store.remove(Uuid::new_v4()).unwrap());
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn remove_does_not_unhide() {
        let (_dir, mut store) = test_store();
        let run = record("A", 30);
        store.append(run.clone()).unwrap();
        store.set_hidden("A", true).unwrap();

        store.remove(run.id).unwrap();
        assert!(store.is_hidden("A"));
    }

    #[test]
    fn top_n_fastest_first_with_stable_ties() {
        let (_dir, mut store) = test_store();
        let runs = [
            record("Alpha", 34),
            record("Alpha", 12),
            record("Alpha", 58),
            record("Alpha", 12),
            record("Beta", 11),
        ];
        for run in &runs {
            store.append(run.clone()).unwrap();
        }

        let top = store.top_n("Alpha", 3);
        let ids: Vec<Uuid> = top.iter().map(|r| r.id).collect();
        assert_eq!(ids, [runs[1].id, runs[3].id, runs[0].id]);
    }

    #[test]
    fn top_n_with_fewer_runs_returns_all() {
        let (_dir, mut store) = test_store();
        store.append(record("Alpha", 30)).unwrap();

        assert_eq!(store.top_n("Alpha", 5).len(), 1);
        assert!(store.top_n("Nowhere", 5).is_empty());
    }

    #[test]
    fn distinct_names_first_seen_order() {
        let (_dir, mut store) = test_store();
        for (name, secs) in [("B", 20), ("A", 30), ("B", 25), ("C", 40)] {
            store.append(record(name, secs)).unwrap();
        }

        assert_eq!(store.distinct_names(false), ["B", "A", "C"]);
    }

    #[test]
    fn distinct_names_filters_hidden() {
        let (_dir, mut store) = test_store();
        for name in ["B", "A", "C"] {
            store.append(record(name, 20)).unwrap();
        }
        store.set_hidden("A", true).unwrap();

        assert_eq!(store.distinct_names(false), ["B", "C"]);
        assert_eq!(store.distinct_names(true), ["B", "A", "C"]);
    }

    #[test]
    fn auto_open_persists() {
        let (dir, mut store) = test_store();
        assert!(store.auto_open());

        store.set_auto_open(false).unwrap();
        assert!(!reopen(&dir).auto_open());
    }

    #[test]
    fn find_by_full_id_and_prefix() {
        let (_dir, mut store) = test_store();
        let run = record("A", 30);
        store.append(run.clone()).unwrap();

        assert_eq!(store.find(&run.id.to_string()).unwrap().id, run.id);
        assert_eq!(store.find(&run.short_id()).unwrap().id, run.id);
    }

    #[test]
    fn find_unknown_reference_fails() {
        let (_dir, mut store) = test_store();
        store.append(record("A", 30)).unwrap();

        let err = store.find(&Uuid::new_v4().to_string()).unwrap_err();
        assert!(matches!(err, HistoryError::NoMatch(_)));
        let err = store.find("zzzz").unwrap_err();
        assert!(matches!(err, HistoryError::NoMatch(_)));
    }

    #[test]
    fn find_ambiguous_prefix_fails() {
        let (_dir, mut store) = test_store();
        for (n, secs) in [(1, 30), (2, 40)] {
            let mut run = record("A", secs);
            run.id = Uuid::from_u128(0xabcd_0000_0000_4000_8000_0000_0000_0000 | n);
            store.append(run).unwrap();
        }

        let err = store.find("abcd").unwrap_err();
        assert!(matches!(err, HistoryError::Ambiguous { ref matches, .. } if matches.len() == 2));
    }

    #[test]
    fn find_empty_reference_matches_nothing() {
        let (_dir, mut store) = test_store();
        store.append(record("A", 30)).unwrap();

        for reference in ["", "   "] {
            let err = store.find(reference).unwrap_err();
            assert!(matches!(err, HistoryError::NoMatch(_)));
        }
    }

    #[test]
    fn legacy_ids_resolve_after_reopen() {
        let (dir, _store) = test_store();
        let legacy = r#"{
            "version": 0,
            "runHistory": [
                { "name": "Alpha", "duration": { "secs": 45, "nanos": 0 }, "timestamp": "2026-10-14T12:00:00Z" }
            ]
        }"#;
        std::fs::write(dir.path().join("data").join("history.json"), legacy).unwrap();

        let shown = reopen(&dir).records()[0].short_id();
        let reloaded = reopen(&dir);

        assert_eq!(reloaded.find(&shown).unwrap().short_id(), shown);
    }
}
