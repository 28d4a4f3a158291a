//! Human-readable byte, rate and timestamp formatting.

use chrono::{DateTime, Local, TimeZone};

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count with base-1024 units and up to two decimals
/// (e.g. "0 Bytes", "1 KB", "1.5 KB", "2.25 GB").
///
/// Zero, negative and non-finite inputs all render as "0 Bytes". The unit
/// is found by repeated division, so no logarithm is ever taken.
pub fn format_file_size(bytes: f64) -> String {
    if bytes <= 0.0 || !bytes.is_finite() {
        return "0 Bytes".to_owned();
    }

    let mut scaled = bytes;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimals(scaled), UNITS[unit])
}

/// [`format_file_size`] for integer byte totals.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_bytes(bytes: u64) -> String {
    format_file_size(bytes as f64)
}

/// Transfer rate in bytes/sec, e.g. "1.5 KB/s".
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", format_file_size(bytes_per_sec))
}

/// Two fixed decimals with trailing zeros (and a bare point) dropped.
fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// Unix-seconds timestamp as a local date-time string.
pub fn format_date(timestamp: f64) -> String {
    format_date_in(timestamp, &Local)
}

/// [`format_date`] in an explicit time zone.
pub fn format_date_in<Tz>(timestamp: f64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    datetime_from_unix(timestamp, tz).map_or_else(
        || "Invalid Date".to_owned(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Time-of-day label for a chart sample (e.g. "14:05:09").
pub fn format_time_label<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M:%S").to_string()
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn datetime_from_unix<Tz: TimeZone>(timestamp: f64, tz: &Tz) -> Option<DateTime<Tz>> {
    if !timestamp.is_finite() {
        return None;
    }
    let millis = (timestamp * 1000.0).round() as i64;
    tz.timestamp_millis_opt(millis).single()
}
