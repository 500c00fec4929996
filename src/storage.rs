//! Local persistence for the configuration blob.
//!
//! Everything lives in one JSON file under the data directory:
//!
//! ```text
//! <root>/
//!   history.json     # PluginConfig: run history, hidden duties, auto-open
//!   dutyspeed.log    # Event log while the panel is open
//! ```

use std::{fs, io, path::PathBuf};

use crate::model::{CONFIG_VERSION, PluginConfig};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const HISTORY_FILE: &str = "history.json";
const LOG_FILE: &str = "dutyspeed.log";

/// File-based storage rooted at the data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Loads the configuration blob.
    ///
    /// A missing file is a fresh install and yields the defaults.
    /// Older layouts are upgraded and written back at once, so ids assigned
    /// during the upgrade are the ones every later load sees.
    pub fn load(&self) -> Result<PluginConfig> {
        let path = self.history_path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PluginConfig::default()),
            Err(e) => return Err(e.into()),
        };
        let mut config: PluginConfig = serde_json::from_str(&json)?;
        if config.upgrade() {
            self.save(&config)?;
            tracing::info!(
                path = %path.display(),
                version = CONFIG_VERSION,
                "upgraded history layout"
            );
        }
        Ok(config)
    }

    /// Writes the configuration blob, replacing what was there.
    pub fn save(&self, config: &PluginConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.history_path(), json)?;
        tracing::debug!(records = config.run_history.len(), "history saved");
        Ok(())
    }

    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use jiff::Timestamp;
    use tempfile::TempDir;
    use uuid::Uuid;

    use crate::model::{DutyRecord, PartyMember};

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        (dir, storage)
    }

    fn sample_record() -> DutyRecord {
        DutyRecord {
            id: Uuid::new_v4(),
            name: "Alpha Dungeon".into(),
            duration: Duration::from_secs(754),
            timestamp: Timestamp::now(),
            party: vec![PartyMember {
                name: "Aria Vale".into(),
                job: "WHM".into(),
            }],
            splits: vec![],
        }
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let (_dir, storage) = test_storage();
        let config = storage.load().unwrap();

        assert_eq!(config, PluginConfig::default());
        assert!(config.auto_open_on_duty);
    }

    #[test]
    fn save_and_load() {
        let (_dir, storage) = test_storage();
        let mut config = PluginConfig::default();
        config.run_history.push(sample_record());
        config.hidden_duties.insert("Beta Keep".into());
        config.auto_open_on_duty = false;

        storage.save(&config).unwrap();
        let loaded = storage.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_upgrades_legacy_version() {
        let (_dir, storage) = test_storage();
        fs::write(storage.history_path(), r#"{ "version": 0, "runHistory": [] }"#).unwrap();

        let config = storage.load().unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn legacy_ids_stable_across_loads() {
        let (_dir, storage) = test_storage();
        let legacy = r#"{
            "version": 1,
            "runHistory": [
                { "name": "Alpha", "duration": { "secs": 45, "nanos": 0 }, "timestamp": "2026-10-14T12:00:00Z" }
            ]
        }"#;
        fs::write(storage.history_path(), legacy).unwrap();

        let first = storage.load().unwrap();
        let second = storage.load().unwrap();

        assert!(!first.run_history[0].id.is_nil());
        assert_eq!(first.run_history[0].id, second.run_history[0].id);
    }

    #[test]
    fn load_corrupt_file_fails() {
        let (_dir, storage) = test_storage();
        fs::write(storage.history_path(), "not json").unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn new_creates_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("data");
        Storage::new(&root).unwrap();
        assert!(root.is_dir());
    }
}
