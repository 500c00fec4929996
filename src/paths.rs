//! Data directory resolution.
//!
//! History and logs need a home. Rather than requiring `--data-dir` on every
//! invocation, the directory is resolved through a chain:
//!
//! 1. `--data-dir <path>`: explicit per-command override
//! 2. `DUTYSPEED_HOME` env var: process/session level
//! 3. `data-dir` in `~/.dutyspeed/config.toml`
//! 4. `~/.dutyspeed`

use std::env;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Error message shown when no data directory can be determined.
pub const DATA_DIR_REQUIRED: &str = "could not determine a data directory: pass --data-dir, \
    set DUTYSPEED_HOME, or add `data-dir = \"...\"` to ~/.dutyspeed/config.toml";

/// Resolve the data directory from the tiered resolution chain.
pub fn resolve_data_dir(explicit: Option<&Path>, config: &Config) -> Result<PathBuf, String> {
    resolve_with(explicit, env::var_os("DUTYSPEED_HOME").map(PathBuf::from), config)
}

fn resolve_with(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    config: &Config,
) -> Result<PathBuf, String> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Some(dir) = from_env.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }

    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }

    dirs::home_dir()
        .map(|h| h.join(".dutyspeed"))
        .ok_or_else(|| DATA_DIR_REQUIRED.to_string())
}
