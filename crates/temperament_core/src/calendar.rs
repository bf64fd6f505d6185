//! Age and test-duration calculations.
//!
//! Both recover locally from bad input: the caller always gets a value.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::types::Language;

pub const ZERO_DURATION: &str = "00:00:00";

/// Whole calendar years from `birth` to `on`. Clamped at zero.
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> u32 {
    let mut years = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    if years < 0 {
        warn!(%birth, %on, "birth date after test date, age defaults to 0");
        return 0;
    }
    years as u32
}

/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Time of day from `HH:MM:SS`, `HH:MM`, or a full timestamp.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.time()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.time())
        })
}

/// `end - start` as `HH:MM:SS`, time of day only.
///
/// Missing, unparsable or negative spans give [`ZERO_DURATION`].
pub fn elapsed_hms(start: Option<&str>, end: Option<&str>) -> String {
    let (Some(start_raw), Some(end_raw)) = (start, end) else {
        return ZERO_DURATION.to_string();
    };
    let (Some(start), Some(end)) = (parse_time_of_day(start_raw), parse_time_of_day(end_raw))
    else {
        warn!(start = start_raw, end = end_raw, "unparsable test times, duration defaults to zero");
        return ZERO_DURATION.to_string();
    };

    let seconds = (end - start).num_seconds();
    if seconds < 0 {
        warn!(start = start_raw, end = end_raw, "test ended before it started, duration defaults to zero");
        return ZERO_DURATION.to_string();
    }
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

pub fn format_date(date: NaiveDate, lang: Language) -> String {
    match lang {
        Language::Pt => date.format("%d/%m/%Y").to_string(),
        Language::En => date.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_day_before_birthday() {
        assert_eq!(age_on(date(2000, 6, 15), date(2025, 6, 14)), 24);
    }

    #[test]
    fn test_age_on_birthday() {
        assert_eq!(age_on(date(2000, 6, 15), date(2025, 6, 15)), 25);
    }

    #[test]
    fn test_age_earlier_month() {
        assert_eq!(age_on(date(1990, 12, 1), date(2024, 3, 1)), 33);
    }

    #[test]
    fn test_age_leap_day() {
        assert_eq!(age_on(date(2004, 2, 29), date(2023, 2, 28)), 18);
        assert_eq!(age_on(date(2004, 2, 29), date(2023, 3, 1)), 19);
    }

    #[test]
    fn test_age_future_birth_clamps() {
        assert_eq!(age_on(date(2030, 1, 1), date(2025, 1, 1)), 0);
    }

    #[test]
    fn test_elapsed_basic() {
        assert_eq!(elapsed_hms(Some("10:00:00"), Some("10:05:30")), "00:05:30");
        assert_eq!(elapsed_hms(Some("09:15"), Some("11:20:05")), "02:05:05");
    }

    #[test]
    fn test_elapsed_defaults() {
        assert_eq!(elapsed_hms(None, Some("10:05:30")), ZERO_DURATION);
        assert_eq!(elapsed_hms(Some("10:00:00"), None), ZERO_DURATION);
        assert_eq!(elapsed_hms(Some("ten"), Some("10:05:30")), ZERO_DURATION);
        assert_eq!(elapsed_hms(Some("10:05:30"), Some("10:00:00")), ZERO_DURATION);
    }

    #[test]
    fn test_elapsed_from_timestamps() {
        assert_eq!(
            elapsed_hms(
                Some("2025-03-01T14:00:00Z"),
                Some("2025-03-01T14:42:09Z")
            ),
            "00:42:09"
        );
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2000-06-15"), Some(date(2000, 6, 15)));
        assert_eq!(parse_date("15/06/2000"), Some(date(2000, 6, 15)));
        assert_eq!(parse_date("2000-06-15T08:00:00Z"), Some(date(2000, 6, 15)));
        assert_eq!(parse_date("June 15"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2025, 1, 9), Language::Pt), "09/01/2025");
        assert_eq!(format_date(date(2025, 1, 9), Language::En), "2025-01-09");
    }
}
