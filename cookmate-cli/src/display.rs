//! Human-readable date rendering.

use chrono::{DateTime, Local, TimeZone, Utc};
use cookmate_core::parse_timestamp;
use std::fmt;

const DATE_FORMAT: &str = "%b %-d, %Y";
const DATE_TIME_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// Renders an optional timestamp in local time, or "Never".
pub fn format_timestamp(ts: Option<DateTime<Utc>>, include_time: bool) -> String {
    format_timestamp_in(ts, include_time, &Local)
}

/// Renders a stored date string in local time.
///
/// Empty strings render as "Never", unreadable ones as "Invalid Date".
pub fn format_date_str(value: &str, include_time: bool) -> String {
    format_date_str_in(value, include_time, &Local)
}

fn format_timestamp_in<Tz: TimeZone>(
    ts: Option<DateTime<Utc>>,
    include_time: bool,
    tz: &Tz,
) -> String
where
    Tz::Offset: fmt::Display,
{
    match ts {
        None => "Never".to_string(),
        Some(ts) => {
            let format = if include_time {
                DATE_TIME_FORMAT
            } else {
                DATE_FORMAT
            };
            ts.with_timezone(tz).format(format).to_string()
        }
    }
}

fn format_date_str_in<Tz: TimeZone>(value: &str, include_time: bool, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    if value.trim().is_empty() {
        return "Never".to_string();
    }
    match parse_timestamp(value) {
        Some(ts) => format_timestamp_in(Some(ts), include_time, tz),
        None => "Invalid Date".to_string(),
    }
}

/// Shortens `text` to `width` characters, ending in "..." when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
