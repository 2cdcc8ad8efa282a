//! Display formatting for sizes, timestamps, and counts.

use chrono::{DateTime, Local, TimeZone, Utc};

const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Human-readable byte size (`0 B`, `10 B`, `1.5 KB`, `2.35 MB`).
pub fn readable_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut unit = 0usize;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit + 1 < BYTE_UNITS.len() {
        scaled /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{scaled:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", BYTE_UNITS[unit])
}

fn at_millis<Tz: TimeZone>(unix_ms: u64, tz: &Tz) -> Option<DateTime<Tz>> {
    let ms = i64::try_from(unix_ms).ok()?;
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|utc| utc.with_timezone(tz))
}

/// Short timestamp for the listing's Modified column, in the given zone.
pub fn short_timestamp_in<Tz: TimeZone>(unix_ms: u64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at_millis(unix_ms, tz)
        .map(|dt| dt.format("%b %-d, %Y %-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Short timestamp in the browser's local zone.
pub fn short_timestamp(unix_ms: u64) -> String {
    short_timestamp_in(unix_ms, &Local)
}

/// Long date for the detail panel's Created field, in the given zone.
pub fn long_date_in<Tz: TimeZone>(unix_ms: u64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at_millis(unix_ms, tz)
        .map(|dt| dt.format("%B %-d, %Y at %-I:%M:%S %p").to_string())
        .unwrap_or_default()
}

/// Long date in the browser's local zone.
pub fn long_date(unix_ms: u64) -> String {
    long_date_in(unix_ms, &Local)
}

/// Line count with thousands separators, or `Not provided`.
pub fn line_count_label(count: Option<i64>) -> String {
    match count {
        Some(count) => group_thousands(count),
        None => "Not provided".to_string(),
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_bytes_matches_expected_cases() {
        let cases = [
            (0, "0 B"),
            (10, "10 B"),
            (1023, "1023 B"),
            (1024, "1 KB"),
            (1536, "1.5 KB"),
            (2_465_792, "2.35 MB"),
            (5 * 1024 * 1024 * 1024, "5 GB"),
        ];
        for (input, expected) in cases {
            assert_eq!(readable_bytes(input), expected, "input={input}");
        }
    }

    #[test]
    fn timestamps_format_in_requested_zone() {
        assert_eq!(short_timestamp_in(0, &Utc), "Jan 1, 1970 12:00 AM");
        assert_eq!(
            short_timestamp_in(1_500_000_000_000, &Utc),
            "Jul 14, 2017 2:40 AM"
        );
        assert_eq!(
            long_date_in(1_500_000_000_000, &Utc),
            "July 14, 2017 at 2:40:00 AM"
        );
    }

    #[test]
    fn line_counts_group_thousands() {
        assert_eq!(line_count_label(Some(7)), "7");
        assert_eq!(line_count_label(Some(1234)), "1,234");
        assert_eq!(line_count_label(Some(1_234_567)), "1,234,567");
        assert_eq!(line_count_label(Some(-4200)), "-4,200");
        assert_eq!(line_count_label(None), "Not provided");
    }
}
