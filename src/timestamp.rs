//! Filesystem-safe timestamp segments for per-run folders and backups.
//!
//! A segment looks like
//! `2025-006-026 018.026.015.8680120 America slash New_York 2025-W026-004 2025-177`:
//! local date and time with 7 fractional digits, the IANA zone name, the ISO
//! week date and the ordinal date. Every numeric field has a fixed width, so
//! segments taken in the same zone sort chronologically, except across a
//! daylight-saving fall-back: the repeated local hour carries no offset, so
//! a segment from its second pass can sort before one from the first.
use chrono::{DateTime, Datelike as _, Local, TimeZone, Timelike as _};

/// Characters that cannot appear in a Windows path component, with the
/// words that replace them.
const PATH_SUBSTITUTIONS: &[(char, &str)] = &[
    ('/', " slash "),
    ('\\', " backslash "),
    (':', " colon "),
    ('*', " star "),
    ('?', " question "),
    ('"', " quote "),
    ('<', " lt "),
    ('>', " gt "),
    ('|', " pipe "),
];

/// Produce a timestamp segment for the current local time.
#[must_use]
pub fn new_timestamp_segment() -> String {
    format_segment(&Local::now(), &zone_name())
}

/// Format `at` as a timestamp segment labelled with `zone`.
///
/// `zone` is made path-safe, so `America/New_York` becomes
/// `America slash New_York`.
#[must_use]
pub fn format_segment<Tz: TimeZone>(at: &DateTime<Tz>, zone: &str) -> String {
    // Leap seconds report nanosecond >= 1e9; clamp so the field stays 7 wide.
    let ticks = (at.nanosecond() / 100).min(9_999_999);
    let iso = at.iso_week();
    format!(
        "{year:04}-0{month:02}-0{day:02} 0{hour:02}.0{minute:02}.0{second:02}.{ticks:07} {zone} {iso_year:04}-W0{week:02}-00{weekday} {year:04}-{ordinal:03}",
        year = at.year(),
        month = at.month(),
        day = at.day(),
        hour = at.hour(),
        minute = at.minute(),
        second = at.second(),
        zone = path_safe(zone),
        iso_year = iso.year(),
        week = iso.week(),
        weekday = at.weekday().number_from_monday(),
        ordinal = at.ordinal(),
    )
}

/// Suffix for settings backups: `YYYYmmdd_HHMMSS` in local time.
#[must_use]
pub fn backup_suffix() -> String {
    compact(&Local::now())
}

/// Compact timestamp used in per-app log file names (`cherrytree_<ts>.log`).
#[must_use]
pub fn compact_timestamp() -> String {
    compact(&Local::now())
}

fn compact<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Replace every path-illegal character in `s` with its descriptive word.
#[must_use]
pub fn path_safe(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match PATH_SUBSTITUTIONS.iter().find(|(illegal, _)| *illegal == c) {
            Some((_, word)) => out.push_str(word),
            None if c.is_control() => {}
            None => out.push(c),
        }
    }
    out
}

/// IANA name of the system time zone, or `UTC` when it cannot be determined.
#[must_use]
pub fn zone_name() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}
