//! Local calendar-date arithmetic.
//!
//! Every function here works on the wall-clock year/month/day of its input.
//! Nothing is routed through a UTC conversion, so a date-time at 23:30 in a
//! zone west of UTC still formats as the day the user sees on their clock.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use super::{DateParseError, DateRange, DateRangeError};

/// A value that names a calendar day in its own local frame.
pub trait CalendarDay {
    /// Returns the local calendar date, discarding any time-of-day.
    fn calendar_date(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_date(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_date(&self) -> NaiveDate {
        // date_naive() reads the local fields in the value's own offset
        self.date_naive()
    }
}

/// Renders a date as `YYYY-MM-DD` from its own year/month/day fields.
pub fn format_local<D: CalendarDay + ?Sized>(date: &D) -> String {
    let date = date.calendar_date();
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parses `YYYY-MM-DD` into a date built directly from its three components.
///
/// A trailing time part (`2024-01-15T10:00:00`) is accepted and ignored; no
/// timezone is ever inferred from it.
pub fn parse_local(input: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = input.trim();
    let date_part = trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or_default();

    let malformed = || DateParseError::MalformedDate(input.to_string());

    let mut parts = date_part.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(malformed());
    }

    let year: i32 = year.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let day: u32 = day.parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateParseError::OutOfRange(input.to_string()))
}

/// Renders a clock time as `HH:MM:SS`.
pub fn format_local_time(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_local_time(input: &str) -> Result<NaiveTime, DateParseError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| DateParseError::MalformedTime(input.to_string()))
}

/// Returns true if both values fall on the same calendar day.
pub fn same_date<A, B>(a: &A, b: &B) -> bool
where
    A: CalendarDay + ?Sized,
    B: CalendarDay + ?Sized,
{
    a.calendar_date() == b.calendar_date()
}

/// Returns true iff `start <= date <= end` at day granularity.
pub fn in_range<D, S, E>(date: &D, start: &S, end: &E) -> bool
where
    D: CalendarDay + ?Sized,
    S: CalendarDay + ?Sized,
    E: CalendarDay + ?Sized,
{
    let date = date.calendar_date();
    start.calendar_date() <= date && date <= end.calendar_date()
}

/// Returns the first and last day of a calendar month.
pub fn month_range(year: i32, month: u32) -> Result<DateRange, DateRangeError> {
    DateRange::month(year, month)
}

/// Returns the Sunday..Saturday week containing `date`.
pub fn week_range<D: CalendarDay + ?Sized>(date: &D) -> DateRange {
    DateRange::week(date.calendar_date())
}

/// Moves a date by whole months, clamping the day to the target month's length.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let delta = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(delta)
    } else {
        date.checked_sub_months(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_format_local_pads_components() {
        assert_eq!(format_local(&make_date(2024, 3, 5)), "2024-03-05");
        assert_eq!(format_local(&make_date(987, 12, 31)), "0987-12-31");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let mut date = make_date(2023, 12, 25);
        for _ in 0..800 {
            let formatted = format_local(&date);
            let reparsed = parse_local(&formatted).unwrap();
            assert_eq!(format_local(&reparsed), formatted);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_format_local_uses_wall_clock_west_of_utc() {
        // 23:30 on March 10 in UTC-8 is already March 11 in UTC
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        let late_evening = pacific.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();

        assert_eq!(format_local(&late_evening), "2024-03-10");
        assert_eq!(format_local(&late_evening.with_timezone(&Utc)), "2024-03-11");
    }

    #[test]
    fn test_format_local_at_midnight_east_of_utc() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let midnight = tokyo.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(format_local(&midnight), "2024-01-01");
    }

    #[test]
    fn test_format_local_across_dst_boundaries() {
        use chrono_tz::America::New_York;

        // Spring forward: 02:00 -> 03:00 on 2024-03-10
        let after_gap = New_York.with_ymd_and_hms(2024, 3, 10, 3, 30, 0).unwrap();
        assert_eq!(format_local(&after_gap), "2024-03-10");

        // Fall back: 01:30 happens twice on 2024-11-03
        let ambiguous = New_York
            .with_ymd_and_hms(2024, 11, 3, 1, 30, 0)
            .earliest()
            .unwrap();
        assert_eq!(format_local(&ambiguous), "2024-11-03");

        let last_minute = New_York.with_ymd_and_hms(2024, 11, 3, 23, 59, 59).unwrap();
        assert_eq!(format_local(&last_minute), "2024-11-03");
    }

    #[test]
    fn test_parse_local_accepts_time_suffix() {
        assert_eq!(
            parse_local("2024-01-15T23:30:00-08:00").unwrap(),
            make_date(2024, 1, 15)
        );
        assert_eq!(parse_local(" 2024-01-15 ").unwrap(), make_date(2024, 1, 15));
    }

    #[test]
    fn test_parse_local_rejects_malformed_input() {
        assert!(matches!(
            parse_local("2024/01/15"),
            Err(DateParseError::MalformedDate(_))
        ));
        assert!(matches!(
            parse_local("24-1-15"),
            Err(DateParseError::MalformedDate(_))
        ));
        assert!(matches!(
            parse_local(""),
            Err(DateParseError::MalformedDate(_))
        ));
        assert!(matches!(
            parse_local("2023-02-29"),
            Err(DateParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_and_format_time() {
        let time = parse_local_time("14:30").unwrap();
        assert_eq!(format_local_time(&time), "14:30:00");
        assert_eq!(
            parse_local_time("09:05:07").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 7).unwrap()
        );
        assert!(parse_local_time("25:00").is_err());
    }

    #[test]
    fn test_same_date_ignores_time_of_day() {
        let morning = make_date(2024, 1, 15).and_hms_opt(0, 0, 1).unwrap();
        let night = make_date(2024, 1, 15).and_hms_opt(23, 59, 59).unwrap();

        assert!(same_date(&morning, &night));
        assert!(same_date(&morning, &make_date(2024, 1, 15)));
        assert!(!same_date(&night, &make_date(2024, 1, 16)));
    }

    #[test]
    fn test_in_range_truncates_to_days() {
        let start = make_date(2024, 1, 10).and_hms_opt(18, 0, 0).unwrap();
        let end = make_date(2024, 1, 12).and_hms_opt(6, 0, 0).unwrap();
        let early_on_start_day = make_date(2024, 1, 10).and_hms_opt(1, 0, 0).unwrap();
        let late_on_end_day = make_date(2024, 1, 12).and_hms_opt(23, 0, 0).unwrap();

        assert!(in_range(&early_on_start_day, &start, &end));
        assert!(in_range(&late_on_end_day, &start, &end));
        assert!(!in_range(&make_date(2024, 1, 13), &start, &end));
    }

    #[test]
    fn test_week_range_is_sunday_to_saturday() {
        // 2024-02-01 is a Thursday
        let range = week_range(&make_date(2024, 2, 1));
        assert_eq!(range.start, make_date(2024, 1, 28));
        assert_eq!(range.end, make_date(2024, 2, 3));
    }

    #[test]
    fn test_shift_months_clamps_day() {
        assert_eq!(
            shift_months(make_date(2024, 1, 31), 1),
            Some(make_date(2024, 2, 29))
        );
        assert_eq!(
            shift_months(make_date(2024, 3, 31), -1),
            Some(make_date(2024, 2, 29))
        );
        assert_eq!(
            shift_months(make_date(2024, 2, 29), 12),
            Some(make_date(2025, 2, 28))
        );
    }
}
