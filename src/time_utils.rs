use chrono::{DateTime, NaiveDateTime, Timelike};

/// Layouts the API uses for `created_at` / `timestamp` fields.
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses ISO-8601 with or without offset, and the SQLite `YYYY-MM-DD HH:MM:SS` form.
/// Offsets are dropped: the wall-clock time the server reported is shown.
pub fn parse_api_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
}

/// Short month/day/hour/minute form, e.g. `Mar 5, 02:07 PM`.
/// Unparsable input is returned unchanged.
pub fn format_alert_time(raw: &str) -> String {
    match parse_api_timestamp(raw) {
        Some(dt) => dt.format("%b %-d, %I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// `HH:MM:SS.mmm` (UTC) for log lines.
pub fn format_clock_millis(timestamp_ms: u64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms as i64) {
        Some(dt) => format!(
            "{:02}:{:02}:{:02}.{:03}",
            dt.hour(),
            dt.minute(),
            dt.second(),
            timestamp_ms % 1000
        ),
        None => format!("{:06}", timestamp_ms),
    }
}
