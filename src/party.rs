//! Party snapshot at duty completion.

use crate::model::{LocalPlayer, PartyMember, RosterEntry};

/// Capture who ran the duty.
///
/// Solo runs have an empty party list, so the local player stands in.
/// With nothing to go on the snapshot is simply empty.
pub fn snapshot(local: Option<&LocalPlayer>, roster: &[RosterEntry]) -> Vec<PartyMember> {
    if roster.is_empty() {
        return local
            .map(|player| PartyMember {
                name: player.name.clone(),
                job: player.job.clone(),
            })
            .into_iter()
            .collect();
    }

    roster
        .iter()
        .map(|entry| PartyMember {
            name: entry.name.clone(),
            job: entry.job.clone(),
        })
        .collect()
}
