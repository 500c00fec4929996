//! DutySpeed settings.
//!
//! Loaded from `~/.dutyspeed/config.toml`. Every key is optional and a
//! missing file means defaults. The run history itself is not kept here;
//! see [`crate::storage`].

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("tick-ms must be greater than zero in {0}")]
    ZeroTick(PathBuf),
}

/// DutySpeed settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Where history and logs live. Overridden by `--data-dir` and `DUTYSPEED_HOME`.
    pub data_dir: Option<PathBuf>,

    /// Milliseconds between panel update ticks.
    pub tick_ms: u64,

    /// How many best runs the panel shows per duty.
    pub top_count: usize,

    /// `tracing` filter directive. `RUST_LOG` takes precedence.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            tick_ms: 250,
            top_count: 5,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from `~/.dutyspeed/config.toml`, or defaults if there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.tick_ms == 0 {
            return Err(ConfigError::ZeroTick(path.to_path_buf()));
        }

        Ok(config)
    }

    /// The config file path: `~/.dutyspeed/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".dutyspeed").join("config.toml"))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
