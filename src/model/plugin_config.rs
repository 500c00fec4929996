//! The persisted configuration blob.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::DutyRecord;

/// Current on-disk layout version.
///
/// Version 0 blobs predate record ids and the hidden-duty set.
pub const CONFIG_VERSION: u32 = 1;

/// Everything DutySpeed persists between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    #[serde(default)]
    pub version: u32,

    /// Completed runs in insertion order.
    #[serde(default)]
    pub run_history: Vec<DutyRecord>,

    /// Duty names left out of the default selector.
    /// May name duties with no remaining records.
    #[serde(default)]
    pub hidden_duties: BTreeSet<String>,

    #[serde(default = "default_auto_open")]
    pub auto_open_on_duty: bool,
}

fn default_auto_open() -> bool {
    true
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            run_history: Vec::new(),
            hidden_duties: BTreeSet::new(),
            auto_open_on_duty: true,
        }
    }
}

impl PluginConfig {
    /// Bring an older blob up to [`CONFIG_VERSION`].
    ///
    /// Missing fields were already defaulted by serde. Records without an id
    /// get one, whatever the stored version says. Returns whether anything
    /// changed and so needs writing back.
    pub fn upgrade(&mut self) -> bool {
        let mut changed = false;
        for record in &mut self.run_history {
            if record.id.is_nil() {
                record.id = Uuid::new_v4();
                changed = true;
            }
        }
        if self.version < CONFIG_VERSION {
            self.version = CONFIG_VERSION;
            changed = true;
        }
        changed
    }
}
