//! Formatting utilities for object sizes and timestamps.

use chrono::{DateTime, NaiveDate};

const DAY_MS: i64 = 86_400_000;

/// Format an object size for display (e.g., "1.2 KB", "3.4 MB").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1_000 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1_000.0;
    let mut unit = 0;
    while value >= 1_000.0 && unit < UNITS.len() - 1 {
        value /= 1_000.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Parse a size typed into a filter field: `1500`, `1.5 KB`, `2m`, `3 GB`.
///
/// Units are decimal, matching [`format_size`]. Blank input is `None`.
pub fn parse_size(text: &str) -> Option<u64> {
    let text = text.trim().to_ascii_lowercase();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let value: f64 = number.parse().ok()?;
    let factor: f64 = match unit.trim() {
        "" | "b" => 1.0,
        "k" | "kb" => 1e3,
        "m" | "mb" => 1e6,
        "g" | "gb" => 1e9,
        "t" | "tb" => 1e12,
        _ => return None,
    };
    Some((value * factor).round() as u64)
}

/// Milliseconds since the epoch for a `YYYY-MM-DD` date input, at the
/// start of the day or, with `end_of_day`, its last millisecond (UTC).
pub fn parse_date_ms(value: &str, end_of_day: bool) -> Option<i64> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    let start = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
    Some(if end_of_day { start + DAY_MS - 1 } else { start })
}

/// `YYYY-MM-DD` value for a date input.
pub fn format_date_input(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Compact "YYYY-MM-DD HH:MM" form of an RFC 3339 timestamp.
///
/// Anything that does not look like one is shown as-is.
pub fn format_modified(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let looks_iso = bytes.len() >= 16 && bytes[4] == b'-' && bytes[10] == b'T';
    match (raw.get(..10), raw.get(11..16)) {
        (Some(date), Some(time)) if looks_iso => format!("{date} {time}"),
        _ => raw.to_string(),
    }
}

/// "3 items" / "1 item".
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(999), "999 B");
        assert_eq!(format_size(1_500), "1.5 KB");
        assert_eq!(format_size(3_400_000), "3.4 MB");
        assert_eq!(format_size(2_000_000_000_000_000), "2000.0 TB");
    }

    #[test]
    fn test_format_modified() {
        assert_eq!(format_modified("2024-03-05T14:07:09Z"), "2024-03-05 14:07");
        assert_eq!(format_modified("2024-03-05T14:07:09.123+02:00"), "2024-03-05 14:07");
        assert_eq!(format_modified(""), "");
        assert_eq!(format_modified("yesterday"), "yesterday");
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1500"), Some(1_500));
        assert_eq!(parse_size("1.5 KB"), Some(1_500));
        assert_eq!(parse_size("2m"), Some(2_000_000));
        assert_eq!(parse_size(" 3 GB "), Some(3_000_000_000));
        assert_eq!(parse_size(""), None);
        assert_eq!(parse_size("ten"), None);
        assert_eq!(parse_size("5 parsecs"), None);
        // Round-trips what format_size shows
        assert_eq!(parse_size(&format_size(3_400_000)), Some(3_400_000));
    }

    #[test]
    fn test_date_input() {
        let start = parse_date_ms("2024-03-05", false).unwrap();
        let end = parse_date_ms("2024-03-05", true).unwrap();
        assert_eq!(start, 1_709_596_800_000);
        assert_eq!(end - start, DAY_MS - 1);
        assert_eq!(format_date_input(end), "2024-03-05");
        assert_eq!(parse_date_ms("", false), None);
        assert_eq!(parse_date_ms("03/05/2024", false), None);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "item"), "1 item");
        assert_eq!(pluralize(0, "item"), "0 items");
    }
}
