use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::non_missing;

// ── DateParser ────────────────────────────────────────────────────────────────

/// Best-effort parsing of the date and timestamp shapes found in the
/// platform CSV exports (store release dates, price acquisition stamps,
/// account creation times).
///
/// Nothing here fails loudly: an unrecognised value yields `None` and the
/// caller treats the field as absent.
pub struct DateParser;

impl DateParser {
    /// Date-time patterns tried after RFC 3339 / RFC 2822.
    const DATETIME_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];

    /// Date-only patterns.
    const DATE_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%b %d, %Y",
        "%d %b, %Y",
        "%B %d, %Y",
        "%d %b %Y",
        "%d %B %Y",
        "%m/%d/%Y",
        "%d.%m.%Y",
    ];

    /// Month-year patterns, parsed by pinning the day to the 1st.
    const MONTH_FORMATS: &'static [&'static str] = &["%b %Y", "%B %Y", "%Y-%m"];

    /// Parse a raw cell into a naive timestamp.
    ///
    /// Offsets are converted to UTC before the zone is dropped.
    pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
        let s = non_missing(raw)?;

        // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Some(dt.naive_utc());
        }

        for fmt in Self::DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        Self::parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// Parse a raw cell into a calendar date.
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let s = non_missing(raw)?;

        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        for fmt in Self::MONTH_FORMATS {
            let pinned = format!("1 {}", s);
            let pinned_fmt = format!("%d {}", fmt);
            if let Ok(date) = NaiveDate::parse_from_str(&pinned, &pinned_fmt) {
                return Some(date);
            }
        }

        // Bare four-digit year.
        if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
            let year: i32 = s.parse().ok()?;
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }

        // Full timestamps also carry a date.
        if s.len() > 10 {
            if let Some(dt) = Self::parse_timestamp_only(s) {
                return Some(dt.date());
            }
        }

        debug!("DateParser: could not parse date \"{}\"", s);
        None
    }

    /// Calendar year of a raw cell, if it parses.
    pub fn year(raw: &str) -> Option<i32> {
        Self::parse_datetime(raw).map(|dt| dt.year())
    }

    fn parse_timestamp_only(s: &str) -> Option<NaiveDateTime> {
        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.naive_utc());
        }
        Self::DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(DateParser::parse_date("2019-11-05"), Some(ymd(2019, 11, 5)));
    }

    #[test]
    fn test_parse_store_style_dates() {
        assert_eq!(DateParser::parse_date("Oct 21, 2008"), Some(ymd(2008, 10, 21)));
        assert_eq!(DateParser::parse_date("21 Oct, 2008"), Some(ymd(2008, 10, 21)));
        assert_eq!(DateParser::parse_date("March 3, 2017"), Some(ymd(2017, 3, 3)));
        assert_eq!(DateParser::parse_date("11/05/2019"), Some(ymd(2019, 11, 5)));
    }

    #[test]
    fn test_parse_month_year_and_bare_year() {
        assert_eq!(DateParser::parse_date("Oct 2008"), Some(ymd(2008, 10, 1)));
        assert_eq!(DateParser::parse_date("2015-06"), Some(ymd(2015, 6, 1)));
        assert_eq!(DateParser::parse_date("1998"), Some(ymd(1998, 1, 1)));
    }

    #[test]
    fn test_parse_datetime_rfc3339_z_suffix() {
        let dt = DateParser::parse_datetime("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.date(), ymd(2024, 1, 15));
        assert_eq!(dt.format("%H:%M").to_string(), "10:30");
    }

    #[test]
    fn test_parse_datetime_offset_converted_to_utc() {
        let dt = DateParser::parse_datetime("2024-01-15T01:00:00+02:00").unwrap();
        assert_eq!(dt.date(), ymd(2024, 1, 14));
    }

    #[test]
    fn test_parse_datetime_space_separated() {
        let dt = DateParser::parse_datetime("2011-02-27 19:59:31").unwrap();
        assert_eq!(dt.year(), 2011);
    }

    #[test]
    fn test_parse_datetime_date_only_is_midnight() {
        let dt = DateParser::parse_datetime("2020-05-01").unwrap();
        assert_eq!(dt, ymd(2020, 5, 1).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert!(DateParser::parse_date("coming soon").is_none());
        assert!(DateParser::parse_datetime("TBA").is_none());
        assert!(DateParser::parse_datetime("").is_none());
        assert!(DateParser::parse_datetime("NaN").is_none());
    }

    #[test]
    fn test_year() {
        assert_eq!(DateParser::year("2012-08-21 00:00:00"), Some(2012));
        assert_eq!(DateParser::year("Aug 21, 2012"), Some(2012));
        assert_eq!(DateParser::year("not a date"), None);
    }

    #[test]
    fn test_chronological_ordering() {
        let a = DateParser::parse_datetime("2024-01-15").unwrap();
        let b = DateParser::parse_datetime("2024-01-15 08:00:00").unwrap();
        let c = DateParser::parse_datetime("2024-02-01T00:00:00Z").unwrap();
        assert!(a < b && b < c);
    }
}
