//! Duty records: one completed run with its party and splits.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One member of the party at the moment a duty was completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    pub name: String,

    /// Short job code, e.g. `WHM`.
    pub job: String,
}

/// Elapsed time at which a hostile entity was first seen defeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub name: String,
    pub at: Duration,
}

/// A completed duty run.
///
/// Created once when the duty ends and never mutated afterwards.
/// Only explicit deletion by `id` removes it from history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRecord {
    /// Stable across saves. Nil only for records written before ids existed,
    /// until [`PluginConfig::upgrade`](super::PluginConfig::upgrade) assigns one.
    #[serde(default)]
    pub id: Uuid,

    /// Duty display name.
    pub name: String,

    pub duration: Duration,

    /// Wall-clock time the run finished.
    pub timestamp: Timestamp,

    #[serde(default)]
    pub party: Vec<PartyMember>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub splits: Vec<Split>,
}

impl DutyRecord {
    /// First eight characters of the id, for display.
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}
