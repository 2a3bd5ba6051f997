//! Local calendar and wall-clock helpers.
//!
//! # Responsibility
//! - Produce and parse canonical `YYYY-MM-DD` date keys.
//! - Generate Sunday-first week windows and month grids.
//! - Compute overnight-aware durations between `HH:MM` times.
//!
//! # Invariants
//! - Date keys are always built from local calendar components; no code path
//!   converts through UTC, so a key never drifts by one day near midnight.
//! - `parse_date_key` accepts exactly the strings `date_key` can produce.
//! - Week windows are pure in their anchor and never consult the clock.

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minutes in one calendar day; the overnight wrap adds exactly this much.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

static CLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[01][0-9]|2[0-3]):[0-5][0-9]$").expect("static clock pattern"));

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static date-key pattern"));

pub type DateKeyResult<T> = Result<T, DateKeyError>;

/// Parse failures for date keys and clock times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateKeyError {
    /// Value is not a zero-padded 24h `HH:MM` string.
    InvalidClockTime(String),
    /// Value is not a zero-padded `YYYY-MM-DD` real calendar date.
    InvalidDateKey(String),
}

impl Display for DateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidClockTime(value) => write!(f, "invalid HH:MM clock time: `{value}`"),
            Self::InvalidDateKey(value) => write!(f, "invalid YYYY-MM-DD date key: `{value}`"),
        }
    }
}

impl Error for DateKeyError {}

/// Formats a local calendar date as its canonical `YYYY-MM-DD` key.
///
/// Two values representing the same local calendar day always produce an
/// identical key, regardless of any time-of-day component they were derived
/// from.
pub fn date_key(date: NaiveDate) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Parses a canonical date key back into a calendar date.
///
/// Strict: the value must be zero-padded (`2024-03-01`, never `2024-3-1`)
/// and must name a real calendar day.
pub fn parse_date_key(value: &str) -> DateKeyResult<NaiveDate> {
    if !DATE_KEY_RE.is_match(value) {
        return Err(DateKeyError::InvalidDateKey(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DateKeyError::InvalidDateKey(value.to_string()))
}

/// Parses a strict `HH:MM` string into minutes since midnight.
pub fn clock_minutes(value: &str) -> DateKeyResult<u32> {
    if !CLOCK_TIME_RE.is_match(value) {
        return Err(DateKeyError::InvalidClockTime(value.to_string()));
    }
    let hours: u32 = value[..2].parse().map_err(|_| {
        DateKeyError::InvalidClockTime(value.to_string())
    })?;
    let minutes: u32 = value[3..].parse().map_err(|_| {
        DateKeyError::InvalidClockTime(value.to_string())
    })?;
    Ok(hours * 60 + minutes)
}

/// Elapsed minutes from `start` to `end`, both `HH:MM`.
///
/// When `end` is numerically earlier than `start` the interval is read as
/// crossing midnight and one full day is added before subtracting, so
/// `("22:30", "06:00")` yields 450. Equal inputs yield 0, not a full day.
pub fn duration_minutes(start: &str, end: &str) -> DateKeyResult<u32> {
    let start_minutes = clock_minutes(start)?;
    let mut end_minutes = clock_minutes(end)?;
    if end_minutes < start_minutes {
        end_minutes += MINUTES_PER_DAY;
    }
    Ok(end_minutes - start_minutes)
}

/// Returns the Sunday-to-Saturday week containing `anchor`, Sunday first.
///
/// The window depends on nothing but the anchor: shifting the anchor by
/// seven days shifts the whole window, and re-anchoring on the returned
/// Sunday is a fixed point.
pub fn week_window(anchor: NaiveDate) -> [NaiveDate; 7] {
    let sunday = anchor - Days::new(u64::from(anchor.weekday().num_days_from_sunday()));
    std::array::from_fn(|offset| sunday + Days::new(offset as u64))
}

/// True iff `date` at `minutes_from_midnight` local time is strictly later
/// than `now`.
pub fn is_future(date: NaiveDate, minutes_from_midnight: u32, now: NaiveDateTime) -> bool {
    if date != now.date() {
        return date > now.date();
    }
    minutes_from_midnight * 60 > now.time().num_seconds_from_midnight()
}

/// The current local calendar date, read from local clock components.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The current local wall-clock instant, read from local clock components.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Number of days in the given month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_first.signed_duration_since(first).num_days() as u32)
}

/// All calendar dates of the given month in order, or `None` for an invalid
/// month.
pub fn month_days(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let count = days_in_month(year, month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(
        (0..count)
            .map(|offset| first + Days::new(u64::from(offset)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::{
        clock_minutes, date_key, days_in_month, duration_minutes, is_future, month_days,
        parse_date_key, week_window,
    };
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_key_is_zero_padded_and_stable() {
        assert_eq!(date_key(date(2024, 3, 1)), "2024-03-01");
        assert_eq!(date_key(date(2024, 3, 1)), date_key(date(2024, 3, 1)));
        assert_eq!(date_key(date(2024, 12, 31)), "2024-12-31");
    }

    #[test]
    fn parse_date_key_round_trips_and_rejects_sloppy_input() {
        let parsed = parse_date_key("2024-03-01").unwrap();
        assert_eq!(date_key(parsed), "2024-03-01");

        assert!(parse_date_key("2024-3-1").is_err());
        assert!(parse_date_key("2024-02-30").is_err());
        assert!(parse_date_key("20240301").is_err());
        assert!(parse_date_key("").is_err());
    }

    #[test]
    fn clock_minutes_is_strict() {
        assert_eq!(clock_minutes("00:00").unwrap(), 0);
        assert_eq!(clock_minutes("08:30").unwrap(), 510);
        assert_eq!(clock_minutes("23:59").unwrap(), 1439);

        assert!(clock_minutes("24:00").is_err());
        assert!(clock_minutes("8:30").is_err());
        assert!(clock_minutes("08:60").is_err());
        assert!(clock_minutes("0830").is_err());
    }

    #[test]
    fn duration_handles_same_day_overnight_and_zero() {
        assert_eq!(duration_minutes("08:00", "09:15").unwrap(), 75);
        assert_eq!(duration_minutes("22:30", "06:00").unwrap(), 450);
        assert_eq!(duration_minutes("10:00", "10:00").unwrap(), 0);
    }

    #[test]
    fn week_window_is_sunday_first_and_contains_anchor() {
        // 2024-03-01 is a Friday.
        let window = week_window(date(2024, 3, 1));
        assert_eq!(window[0], date(2024, 2, 25));
        assert_eq!(window[6], date(2024, 3, 2));
        assert_eq!(window[0].weekday(), Weekday::Sun);
        assert!(window.contains(&date(2024, 3, 1)));
        for pair in window.windows(2) {
            assert_eq!(pair[1], pair[0].succ_opt().unwrap());
        }
    }

    #[test]
    fn week_window_is_a_fixed_point_on_its_own_sunday() {
        let window = week_window(date(2024, 3, 1));
        assert_eq!(week_window(window[0]), window);
        // Anchoring anywhere inside the window reproduces it too.
        assert_eq!(week_window(window[6]), window);
    }

    #[test]
    fn is_future_is_strict() {
        let now = date(2024, 3, 1).and_hms_opt(12, 0, 0).unwrap();

        assert!(is_future(date(2024, 3, 2), 0, now));
        assert!(!is_future(date(2024, 2, 29), 1439, now));
        assert!(is_future(date(2024, 3, 1), 12 * 60 + 1, now));
        // Exactly "now" is not in the future.
        assert!(!is_future(date(2024, 3, 1), 12 * 60, now));
        assert!(!is_future(date(2024, 3, 1), 11 * 60, now));
    }

    #[test]
    fn month_helpers_cover_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);

        let march = month_days(2024, 3).unwrap();
        assert_eq!(march.len(), 31);
        assert_eq!(march[0], date(2024, 3, 1));
        assert_eq!(march[30], date(2024, 3, 31));
    }
}
