//! Text to typed value conversion for prices and dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a price cell. Only finite numbers are accepted.
pub fn parse_price(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

/// Parse a date cell.
///
/// RFC 3339 timestamps are converted to UTC. Otherwise each format is tried
/// in order, first as a date-time and then as a plain date at midnight.
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.naive_utc());
    }

    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    })
}
