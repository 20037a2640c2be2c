//! Date key codec
//!
//! Every day-scoped lookup is keyed by a `YYYY-MM-DD` string built from the
//! local wall-clock date. Never convert through UTC to get a key: a job
//! entered at 23:30 local time would land on the next day.

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// `YYYY-MM-DD` for a calendar date
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date key of a zoned instant, using that zone's calendar date
pub fn date_key_of<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    date_key(at.date_naive())
}

/// Today's date on the local calendar
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_key() -> String {
    date_key(today())
}

/// Zero the time-of-day components
pub fn start_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

/// Strict-ish parse of a date key.
///
/// Accepts `YYYY-M-D` with or without zero padding, and a longer timestamp
/// string whose first ten characters are a date followed by `T` or a space.
pub fn try_parse_date_key(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = match text.char_indices().find(|(_, c)| *c == 'T' || *c == ' ') {
        Some((idx, _)) => &text[..idx],
        None => text,
    };

    let mut parts = date_part.split('-');
    let year = parse_component(parts.next()?, 4, 4)?;
    let month = parse_component(parts.next()?, 1, 2)?;
    let day = parse_component(parts.next()?, 1, 2)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn parse_component(part: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if part.len() < min_len || part.len() > max_len || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Inverse of [`date_key`]; absent or malformed input means today.
pub fn parse_date_key(text: Option<&str>) -> NaiveDate {
    text.and_then(try_parse_date_key).unwrap_or_else(today)
}

/// Re-render a loosely formatted date as its canonical key
pub fn canonical_date_key(text: &str) -> Option<String> {
    try_parse_date_key(text).map(date_key)
}

/// `YYYY-MM`
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Parse `YYYY-MM` into `(year, month1to12)`
pub fn parse_month_key(text: &str) -> Option<(i32, u32)> {
    let (year, month) = text.trim().split_once('-')?;
    let year = parse_component(year, 4, 4)? as i32;
    let month = parse_component(month, 1, 2)?;
    (1..=12).contains(&month).then_some((year, month))
}

/// First day of a month, `month` is 1-based
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Shift a month start by `n` months (negative goes back). The result is
/// always the first of the target month.
pub fn add_months(month_start: NaiveDate, n: i32) -> NaiveDate {
    let first = month_start.with_day(1).unwrap_or(month_start);
    let shifted = if n >= 0 {
        first.checked_add_months(Months::new(n as u32))
    } else {
        first.checked_sub_months(Months::new(n.unsigned_abs()))
    };
    shifted.unwrap_or(first)
}

/// Number of days in a month, `month` is 1-based. Out-of-range months → 0.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = month_start(year, month) else {
        return 0;
    };
    let next = add_months(first, 1);
    next.signed_duration_since(first).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_key_pads_components() {
        assert_eq!(date_key(ymd(2025, 6, 1)), "2025-06-01");
        assert_eq!(month_key(ymd(2025, 6, 1)), "2025-06");
    }

    #[test]
    fn test_date_key_uses_local_calendar() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let late_evening = tz.with_ymd_and_hms(2025, 6, 10, 23, 30, 0).unwrap();
        assert_eq!(date_key_of(&late_evening), "2025-06-10");
    }

    #[test]
    fn test_parse_accepts_loose_forms() {
        assert_eq!(try_parse_date_key("2025-6-1"), Some(ymd(2025, 6, 1)));
        assert_eq!(try_parse_date_key(" 2025-06-10 "), Some(ymd(2025, 6, 10)));
        assert_eq!(try_parse_date_key("2025-06-10T08:00:00Z"), Some(ymd(2025, 6, 10)));
        assert_eq!(canonical_date_key("2025-6-1").as_deref(), Some("2025-06-01"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(try_parse_date_key(""), None);
        assert_eq!(try_parse_date_key("06/10/2025"), None);
        assert_eq!(try_parse_date_key("2025-02-30"), None);
        assert_eq!(try_parse_date_key("2025-06-10-01"), None);
        assert_eq!(try_parse_date_key("25-06-10"), None);
    }

    #[test]
    fn test_parse_defaults_to_today() {
        assert_eq!(parse_date_key(None), today());
        assert_eq!(parse_date_key(Some("nope")), today());
        assert_eq!(parse_date_key(Some("2024-02-29")), ymd(2024, 2, 29));
    }

    #[test]
    fn test_start_of_day() {
        let at = ymd(2025, 6, 10).and_hms_opt(17, 45, 12).unwrap();
        assert_eq!(start_of_day(at), ymd(2025, 6, 10).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(add_months(ymd(2025, 12, 1), 1), ymd(2026, 1, 1));
        assert_eq!(add_months(ymd(2025, 1, 1), -1), ymd(2024, 12, 1));
        assert_eq!(add_months(ymd(2025, 1, 31), 1), ymd(2025, 2, 1));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn test_parse_month_key() {
        assert_eq!(parse_month_key("2025-06"), Some((2025, 6)));
        assert_eq!(parse_month_key("2025-6"), Some((2025, 6)));
        assert_eq!(parse_month_key("2025-13"), None);
        assert_eq!(parse_month_key("June"), None);
    }
}
