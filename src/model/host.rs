//! Descriptors handed over by the host game client.

use serde::{Deserialize, Serialize};

/// The player running this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPlayer {
    pub name: String,
    pub job: String,
}

/// One row of the host's party list, in the host's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub job: String,
}

/// An actor from the host's object table.
///
/// `entity_id` is only meaningful within the current duty session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostileEntity {
    pub entity_id: u32,

    #[serde(default)]
    pub name: String,

    pub is_hostile: bool,
    pub current_hp: u32,
}

impl HostileEntity {
    /// A hostile actor with no health left.
    pub fn is_defeated(&self) -> bool {
        self.is_hostile && self.current_hp == 0
    }
}
