use chrono::{DateTime, NaiveDateTime, Utc};

use super::ParseError;

/// Formats carrying an explicit offset, tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Zone-less formats, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses the ISO-8601 variants CI systems emit, with or without fractional
/// seconds and with or without a zone designator.
///
/// # Errors
/// Returns `ParseError::InvalidTimestamp` if no known format matches.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc());
        }
    }
    Err(ParseError::InvalidTimestamp(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, m, s).single().expect("valid date")
    }

    #[test]
    fn parses_rfc3339_variants() {
        assert_eq!(parse_timestamp("2025-03-01T10:00:00Z"), Ok(utc(10, 0, 0)));
        assert_eq!(
            parse_timestamp("2025-03-01T12:00:00+02:00"),
            Ok(utc(10, 0, 0))
        );
        let fractional = parse_timestamp("2025-03-01T10:00:00.250Z").expect("should parse");
        assert_eq!(fractional.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn parses_zone_less_timestamps_as_utc() {
        assert_eq!(parse_timestamp("2025-03-01T10:00:00"), Ok(utc(10, 0, 0)));
        assert_eq!(parse_timestamp("2025-03-01 10:00:00"), Ok(utc(10, 0, 0)));
        assert_eq!(
            parse_timestamp("2025-03-01T10:00:00.123456"),
            Ok(utc(10, 0, 0) + chrono::Duration::microseconds(123_456))
        );
    }

    #[test]
    fn parses_compact_offsets() {
        assert_eq!(
            parse_timestamp("2025-03-01T11:00:00+0100"),
            Ok(utc(10, 0, 0))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(ParseError::InvalidTimestamp("yesterday".to_string()))
        );
        assert!(parse_timestamp("").is_err());
    }
}
