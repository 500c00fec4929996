//! Core data model for DutySpeed.
//!
//! Records of completed duties, the persisted configuration blob,
//! and the descriptors the host game client hands over each tick.

mod host;
mod plugin_config;
mod record;

pub use host::{HostileEntity, LocalPlayer, RosterEntry};
pub use plugin_config::{CONFIG_VERSION, PluginConfig};
pub use record::{DutyRecord, PartyMember, Split};
