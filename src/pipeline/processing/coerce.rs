//! Field coercion helpers.
//!
//! Every helper follows the same contract: a value that is absent, blank or
//! not a finite number comes back as `None`. Nothing here panics or errors.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::GeoPoint;

static DATE_TOKEN_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-/\sT]+").expect("separator pattern is valid"));

/// A date as far as it could be recovered from a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl ParsedDate {
    fn year_only(year: i32) -> Self {
        Self { year, month: None, day: None }
    }

    fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }
}

/// Raw date-bearing fields of a row, in the order they are tried
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFields<'a> {
    /// Composite value such as `22-11-2022 02:03`
    pub date_time: Option<&'a str>,
    /// Generic timestamp (`time` or `date` column)
    pub timestamp: Option<&'a str>,
    /// Plain year column
    pub year: Option<&'a str>,
}

/// Trimmed, non-empty text or `None`
pub fn text_or_null(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn parse_float_or_null(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Integer parse that also accepts integral decimals such as `"3.0"`
pub fn parse_int_or_null(raw: Option<&str>) -> Option<i64> {
    let s = raw.map(str::trim).filter(|s| !s.is_empty())?;
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    parse_float_or_null(raw)
}

/// Both coordinates or neither. A garbage component voids the pair.
pub fn parse_coordinates(latitude: Option<&str>, longitude: Option<&str>) -> Option<GeoPoint> {
    let lat = parse_coordinate(latitude)?;
    let lon = parse_coordinate(longitude)?;
    GeoPoint::new(lat, lon)
}

/// `"1"` is the only truthy value source files use for flags
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("1"))
}

/// Year read straight from a year column
pub fn parse_year_field(raw: Option<&str>) -> Option<i32> {
    parse_int_or_null(raw).and_then(|v| i32::try_from(v).ok())
}

/// Year of the row, trying each date field in turn.
pub fn parse_year(fields: &DateFields<'_>) -> Option<i32> {
    parse_date(fields).map(|d| d.year)
}

/// Run the fallback chain: composite date-time, then a generic timestamp, then
/// the plain year column. The first attempt that yields a year wins.
pub fn parse_date(fields: &DateFields<'_>) -> Option<ParsedDate> {
    let attempts: [&dyn Fn() -> Option<ParsedDate>; 3] = [
        &|| fields.date_time.and_then(date_from_composite),
        &|| fields.timestamp.and_then(date_from_timestamp),
        &|| parse_year_field(fields.year).map(ParsedDate::year_only),
    ];
    attempts.iter().find_map(|attempt| attempt())
}

/// Split a composite value on `-`, `/`, `T` or whitespace and pick the
/// four-digit token as the year. Day and month are kept when the tokens
/// around the year form a real calendar date.
fn date_from_composite(raw: &str) -> Option<ParsedDate> {
    let tokens: Vec<&str> = DATE_TOKEN_SEPARATORS
        .split(raw.trim())
        .filter(|t| !t.is_empty())
        .collect();

    let year_idx = tokens
        .iter()
        .position(|t| t.len() == 4 && t.chars().all(|c| c.is_ascii_digit()))?;
    let year: i32 = tokens[year_idx].parse().ok()?;

    let num = |i: usize| tokens.get(i).and_then(|t| t.parse::<u32>().ok());
    let (month, day) = match year_idx {
        // dd-mm-yyyy
        2 => (num(1), num(0)),
        // yyyy-mm-dd
        0 => (num(1), num(2)),
        _ => (None, None),
    };

    match (month, day) {
        (Some(m), Some(d)) if NaiveDate::from_ymd_opt(year, m, d).is_some() => Some(ParsedDate {
            year,
            month: Some(m),
            day: Some(d),
        }),
        _ => Some(ParsedDate::year_only(year)),
    }
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

fn date_from_timestamp(raw: &str) -> Option<ParsedDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        // bare year, otherwise epoch milliseconds
        if s.len() <= 4 {
            return s.parse().ok().map(ParsedDate::year_only);
        }
        let millis: i64 = s.parse().ok()?;
        return DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|dt| ParsedDate::from_date(dt.date_naive()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(ParsedDate::from_date(dt.naive_utc().date()));
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
        .map(ParsedDate::from_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_or_null() {
        assert_eq!(text_or_null(Some("  Etna ")), Some("Etna".to_string()));
        assert_eq!(text_or_null(Some("   ")), None);
        assert_eq!(text_or_null(None), None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(parse_float_or_null(Some("6.5")), Some(6.5));
        assert_eq!(parse_float_or_null(Some("abc")), None);
        assert_eq!(parse_float_or_null(Some("NaN")), None);
        assert_eq!(parse_float_or_null(Some("inf")), None);
        assert_eq!(parse_float_or_null(Some("")), None);

        assert_eq!(parse_int_or_null(Some("3")), Some(3));
        assert_eq!(parse_int_or_null(Some("3.0")), Some(3));
        assert_eq!(parse_int_or_null(Some("3.5")), None);
        assert_eq!(parse_int_or_null(Some("-200")), Some(-200));
        assert_eq!(parse_int_or_null(Some("x")), None);
    }

    #[test]
    fn test_coordinates_are_paired() {
        let point = parse_coordinates(Some("10.1"), Some("20.2")).unwrap();
        assert_eq!(point.latitude(), 10.1);
        assert_eq!(point.longitude(), 20.2);

        assert!(parse_coordinates(Some("abc"), Some("20.2")).is_none());
        assert!(parse_coordinates(Some("10.1"), None).is_none());
        assert!(parse_coordinates(Some("95"), Some("20")).is_none());
    }

    #[test]
    fn test_flag() {
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some(" 1 ")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(Some("true")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_composite_date_time() {
        let fields = DateFields {
            date_time: Some("22-11-2022 02:03"),
            ..Default::default()
        };
        let date = parse_date(&fields).unwrap();
        assert_eq!(date.year, 2022);
        assert_eq!(date.month, Some(11));
        assert_eq!(date.day, Some(22));

        let iso_like = DateFields {
            date_time: Some("1999-08-17 00:01"),
            ..Default::default()
        };
        assert_eq!(parse_year(&iso_like), Some(1999));
    }

    #[test]
    fn test_fallback_to_timestamp_then_year() {
        let timestamp = DateFields {
            date_time: Some("not a date"),
            timestamp: Some("2011-03-11T05:46:24.120Z"),
            year: Some("1900"),
        };
        let date = parse_date(&timestamp).unwrap();
        assert_eq!(date.year, 2011);
        assert_eq!(date.month, Some(3));

        let year_only = DateFields {
            date_time: None,
            timestamp: Some("garbage"),
            year: Some("2004"),
        };
        assert_eq!(parse_date(&year_only), Some(ParsedDate::year_only(2004)));
    }

    #[test]
    fn test_epoch_millis_timestamp() {
        let fields = DateFields {
            timestamp: Some("946684800000"),
            ..Default::default()
        };
        assert_eq!(parse_year(&fields), Some(2000));
    }

    #[test]
    fn test_exhausted_chain_is_none() {
        let fields = DateFields {
            date_time: Some("soon"),
            timestamp: Some(""),
            year: Some("n/a"),
        };
        assert_eq!(parse_year(&fields), None);
        assert_eq!(parse_year(&DateFields::default()), None);
    }
}
