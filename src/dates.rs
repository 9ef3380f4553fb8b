//! Parsing of the date encodings used by the two input sources.

use crate::types::month::Month;
use chrono::{NaiveDate, NaiveDateTime};

/// Parses a climate date: compact `YYYYMMDD` (as written by the weather source, possibly
/// rendered as a float like `20240115.0` by a CSV reader) or ISO `YYYY-MM-DD`.
pub(crate) fn parse_observation_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let raw = raw.strip_suffix(".0").unwrap_or(raw);
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(raw, "%Y%m%d").ok();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parses an energy release date down to its calendar month.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYYMMDD` and `YYYY-MM`.
pub(crate) fn parse_release_month(raw: &str) -> Option<Month> {
    let raw = raw.trim();
    if let Some(date) = parse_observation_date(raw) {
        return Some(Month::from_date(date));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Month::from_date(datetime.date()));
        }
    }
    let (year, month) = raw.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    Month::checked(year.parse().ok()?, month.parse().ok()?)
}
