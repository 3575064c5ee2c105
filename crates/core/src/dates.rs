//! Backend timestamps

use jiff::{Timestamp, civil::DateTime, tz::TimeZone};

/// Parses a backend date. RFC 3339 instants are taken as-is; offset-less
/// date-times are read as UTC. Anything else yields `None`.
#[must_use]
pub fn parse_instant(value: &str) -> Option<Timestamp> {
    let value = value.trim();

    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return Some(timestamp);
    }

    let civil = value.parse::<DateTime>().ok()?;

    civil.to_zoned(TimeZone::UTC).ok().map(|zoned| zoned.timestamp())
}

/// `dd/mm/yyyy` in UTC, or the raw text when it can't be parsed.
#[must_use]
pub fn format_date(value: &str) -> String {
    parse_instant(value).map_or_else(
        || value.to_string(),
        |timestamp| timestamp.strftime("%d/%m/%Y").to_string(),
    )
}

/// `dd/mm/yyyy HH:MM` in UTC, or the raw text when it can't be parsed.
#[must_use]
pub fn format_date_time(value: &str) -> String {
    parse_instant(value).map_or_else(
        || value.to_string(),
        |timestamp| timestamp.strftime("%d/%m/%Y %H:%M").to_string(),
    )
}

/// Calendar year in UTC.
#[must_use]
pub fn year_of(value: &str) -> Option<i16> {
    parse_instant(value).map(|timestamp| timestamp.to_zoned(TimeZone::UTC).year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_instants_and_naive_date_times() {
        let zulu = parse_instant("2025-03-01T14:30:00.000Z");
        let naive = parse_instant("2025-03-01T14:30:00");

        assert!(zulu.is_some(), "zulu instant should parse");
        assert_eq!(zulu, naive);
        assert_eq!(parse_instant("yesterday"), None);
    }

    #[test]
    fn formats_dates_for_display() {
        assert_eq!(format_date("2025-03-01T14:30:00Z"), "01/03/2025");
        assert_eq!(format_date_time("2025-03-01T14:30:00Z"), "01/03/2025 14:30");
        assert_eq!(format_date("pending"), "pending");
    }

    #[test]
    fn year_is_taken_in_utc() {
        assert_eq!(year_of("2024-12-31T23:30:00-05:00"), Some(2025));
        assert_eq!(year_of(""), None);
    }
}
