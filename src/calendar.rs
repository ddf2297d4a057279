//! Calendar date normalization.
//!
//! Weekday, weekend and lead-time logic works on `NaiveDate` built from
//! (year, month, day) components only. Nothing here reads the host's local
//! offset: an instant becomes a calendar date either in the offset it was
//! written with, or in the facility timezone via [`Normalizer`].

use chrono::{DateTime, Datelike, Days, FixedOffset, LocalResult, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::models::Span;

/// Anything that can name a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    Ymd { year: i32, month: u32, day: u32 },
    /// `YYYY-MM-DD`, or RFC 3339 (date taken as written, in its own offset)
    Text(String),
    /// Date as observed in the instant's own offset
    Instant(DateTime<FixedOffset>),
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<(i32, u32, u32)> for DateInput {
    fn from((year, month, day): (i32, u32, u32)) -> Self {
        DateInput::Ymd { year, month, day }
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        DateInput::Instant(instant)
    }
}

/// Convert any supported input into a timezone-independent calendar date.
pub fn to_calendar_date(input: impl Into<DateInput>) -> Result<NaiveDate> {
    match input.into() {
        DateInput::Date(date) => Ok(date),
        DateInput::Ymd { year, month, day } => NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| {
                EngineError::invalid_input(format!("no such date: {year:04}-{month:02}-{day:02}"))
            }),
        DateInput::Text(text) => parse_date_text(text.trim()),
        DateInput::Instant(instant) => Ok(instant.date_naive()),
    }
}

fn parse_date_text(text: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(text)
        .map(|instant| instant.date_naive())
        .map_err(|_| EngineError::invalid_input(format!("unrecognized date: '{text}'")))
}

pub fn day_of_week(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Shift a date by `n` days (negative moves backwards).
pub fn add_days(date: NaiveDate, n: i64) -> Result<NaiveDate> {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n as u64))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.ok_or_else(|| {
        EngineError::invalid_input(format!("{date} shifted by {n} days is out of range"))
    })
}

/// Whole days from `a` to `b`; negative when `b` precedes `a`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// Bridges calendar dates and instants at the facility's timezone.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    tz: Tz,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Normalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Calendar date of an instant as seen at the facility.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// First instant of `date` at the facility.
    ///
    /// Midnight can be skipped by a DST jump; the first instant after the gap
    /// is used then.
    pub fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| EngineError::invalid_input(format!("no midnight for {date}")))?;

        let mut local = midnight;
        // Real-world DST gaps are at most two hours; probe in 15 minute steps.
        for _ in 0..=8 {
            match self.tz.from_local_datetime(&local) {
                LocalResult::Single(t) => return Ok(t.with_timezone(&Utc)),
                LocalResult::Ambiguous(earliest, _) => return Ok(earliest.with_timezone(&Utc)),
                LocalResult::None => local += chrono::Duration::minutes(15),
            }
        }
        Err(EngineError::invalid_input(format!(
            "{date} has no representable start in {}",
            self.tz
        )))
    }

    /// Half-open instant span from the start of `start` to the start of `end`.
    pub fn stay_span(&self, start: NaiveDate, end: NaiveDate) -> Result<Span> {
        Span::new(self.start_of_day(start)?, self.start_of_day(end)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_to_calendar_date_inputs() {
        let expected = ymd(2024, 10, 5);
        assert_eq!(to_calendar_date(expected).unwrap(), expected);
        assert_eq!(to_calendar_date((2024, 10, 5)).unwrap(), expected);
        assert_eq!(to_calendar_date("2024-10-05").unwrap(), expected);
        assert_eq!(to_calendar_date(" 2024-10-05 ").unwrap(), expected);
        assert_eq!(to_calendar_date("2024-10-05T23:30:00-07:00").unwrap(), expected);
        assert_eq!(to_calendar_date("2024-10-05T00:15:00+14:00").unwrap(), expected);
    }

    #[test]
    fn test_to_calendar_date_rejects_garbage() {
        assert!(matches!(to_calendar_date((2023, 2, 29)), Err(EngineError::InvalidInput(_))));
        assert!(matches!(to_calendar_date("next tuesday"), Err(EngineError::InvalidInput(_))));
        assert!(matches!(to_calendar_date("2024-13-01"), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_weekend_detection() {
        assert!(is_weekend(ymd(2024, 10, 5))); // Saturday
        assert!(is_weekend(ymd(2024, 10, 6))); // Sunday
        assert!(!is_weekend(ymd(2024, 10, 7)));
        assert!(!is_weekend(ymd(2024, 10, 4)));
        assert_eq!(day_of_week(ymd(2024, 2, 29)), Weekday::Thu);
    }

    #[test]
    fn test_instant_date_uses_its_own_offset() {
        let west = FixedOffset::west_opt(12 * 3600).unwrap();
        let east = FixedOffset::east_opt(14 * 3600).unwrap();

        let late_saturday_west = west.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap();
        let early_saturday_east = east.with_ymd_and_hms(2024, 3, 9, 0, 30, 0).unwrap();

        let a = to_calendar_date(late_saturday_west).unwrap();
        let b = to_calendar_date(early_saturday_east).unwrap();
        assert_eq!(a, b);
        assert_eq!(day_of_week(a), Weekday::Sat);
        assert!(is_weekend(b));
    }

    #[test]
    fn test_add_days_and_days_between() {
        let start = ymd(2024, 2, 27);
        assert_eq!(add_days(start, 3).unwrap(), ymd(2024, 3, 1));
        assert_eq!(add_days(start, -27).unwrap(), ymd(2024, 1, 31));
        assert_eq!(add_days(start, 0).unwrap(), start);
        assert_eq!(days_between(start, ymd(2024, 3, 1)), 3);
        assert_eq!(days_between(ymd(2024, 3, 1), start), -3);
        assert!(add_days(NaiveDate::MAX, 1).is_err());
    }

    #[test]
    fn test_days_between_across_dst() {
        // US spring-forward weekend does not shorten the count
        assert_eq!(days_between(ymd(2024, 3, 9), ymd(2024, 3, 11)), 2);
        assert_eq!(days_between(ymd(2024, 11, 2), ymd(2024, 11, 4)), 2);
    }

    #[test]
    fn test_start_of_day_in_facility_timezone() {
        let normalizer = Normalizer::new(chrono_tz::America::New_York);
        let start = normalizer.start_of_day(ymd(2024, 10, 3)).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 10, 3, 4, 0, 0).unwrap());
        assert_eq!(normalizer.date_of(start), ymd(2024, 10, 3));
        assert_eq!(normalizer.date_of(start - chrono::Duration::seconds(1)), ymd(2024, 10, 2));
    }

    #[test]
    fn test_start_of_day_skips_dst_gap_at_midnight() {
        // Santiago springs forward at local midnight
        let normalizer = Normalizer::new(chrono_tz::America::Santiago);
        let start = normalizer.start_of_day(ymd(2024, 9, 8)).unwrap();
        assert_eq!(normalizer.date_of(start), ymd(2024, 9, 8));
    }

    #[test]
    fn test_stay_span_rejects_inverted_dates() {
        let normalizer = Normalizer::default();
        assert!(normalizer.stay_span(ymd(2024, 10, 1), ymd(2024, 10, 5)).is_ok());
        assert!(matches!(
            normalizer.stay_span(ymd(2024, 10, 5), ymd(2024, 10, 5)),
            Err(EngineError::InvalidRange { .. })
        ));
        assert!(matches!(
            normalizer.stay_span(ymd(2024, 10, 5), ymd(2024, 10, 1)),
            Err(EngineError::InvalidRange { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_weekday_invariant_to_offset(
            days in 0i64..40_000,
            west_hours in 0i32..=12,
            east_hours in 0i32..=14,
            minute in 0u32..(24 * 60),
        ) {
            let date = add_days(ymd(1970, 1, 1), days).unwrap();
            let time = chrono::NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap();
            let local = date.and_time(time);

            let west = FixedOffset::west_opt(west_hours * 3600).unwrap();
            let east = FixedOffset::east_opt(east_hours * 3600).unwrap();
            let in_west = west.from_local_datetime(&local).unwrap();
            let in_east = east.from_local_datetime(&local).unwrap();

            let from_west = to_calendar_date(in_west).unwrap();
            let from_east = to_calendar_date(in_east).unwrap();
            prop_assert_eq!(from_west, date);
            prop_assert_eq!(from_east, date);
            prop_assert_eq!(day_of_week(from_west), day_of_week(date));
            prop_assert_eq!(is_weekend(from_east), is_weekend(date));
        }
    }
}
