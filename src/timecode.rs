//! `HH:MM:SS` timecodes
//!
//! Parsing never fails: a malformed segment counts as zero and signs are
//! ignored, so a slightly odd transcoder banner still yields a usable offset.
//! Hours are not wrapped when formatting.

use chrono::TimeDelta;

fn segment(text: Option<&str>) -> i64 {
    text.and_then(|s| s.parse::<i64>().ok())
        .map(|n| n.checked_abs().unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// `"01:30:00"` -> 90 minutes.
pub fn parse(text: &str) -> TimeDelta {
    let mut parts = text.split(':');
    let hours = segment(parts.next());
    let minutes = segment(parts.next());
    let seconds = segment(parts.next());

    // Out-of-range components degrade to zero like any other bad segment.
    let hours = TimeDelta::try_hours(hours).unwrap_or(TimeDelta::zero());
    let minutes = TimeDelta::try_minutes(minutes).unwrap_or(TimeDelta::zero());
    let seconds = TimeDelta::try_seconds(seconds).unwrap_or(TimeDelta::zero());

    hours
        .checked_add(&minutes)
        .and_then(|d| d.checked_add(&seconds))
        .unwrap_or(TimeDelta::zero())
}

/// 200 minutes -> `"03:20:00"`. Negative durations format as their magnitude.
pub fn format(duration: TimeDelta) -> String {
    let duration = duration.abs();
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    let seconds = duration.num_seconds() % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Seek target for a still frame: a third of the way into the media.
pub fn thumbnail_offset(duration_text: &str) -> String {
    format(parse(duration_text) / 3)
}
