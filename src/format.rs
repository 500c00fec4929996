//! Output formatting shared by the CLI and the panel.

use std::time::Duration;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::model::{DutyRecord, PartyMember};

/// `mm:ss`, or `h:mm:ss` once a run passes the hour.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Month and day in the system time zone, e.g. `10/14`.
pub fn format_date(timestamp: Timestamp) -> String {
    format_date_in(timestamp, TimeZone::system())
}

fn format_date_in(timestamp: Timestamp, tz: TimeZone) -> String {
    timestamp.to_zoned(tz).strftime("%m/%d").to_string()
}

/// `[JOB] Name`
pub fn format_member(member: &PartyMember) -> String {
    format!("[{}] {}", member.job, member.name)
}

/// One summary line for a record: `a3b0fc12  12:34 (10/14)  Alpha Dungeon`.
pub fn format_record_line(record: &DutyRecord) -> String {
    format!(
        "{}  {} ({})  {}",
        record.short_id(),
        format_duration(record.duration),
        format_date(record.timestamp),
        record.name
    )
}
