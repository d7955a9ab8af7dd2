use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DateRangeError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Creates a date range for an entire calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self, DateRangeError> {
        let invalid = || DateRangeError::InvalidMonth { year, month };

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        // First of next month minus one day
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    /// Creates a date range for the Sunday-start week containing the given date.
    pub fn week(date: NaiveDate) -> Self {
        let days_from_sunday = date.weekday().num_days_from_sunday();
        let start = date - Duration::days(days_from_sunday as i64);
        let end = start + Duration::days(6);

        Self { start, end }
    }

    /// Returns true if `date` lies within the range (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns true if the two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns the days shared by both ranges, if any.
    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        DateRange::new(start, end).ok()
    }

    /// Number of days in the range, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates over every day in the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + Clone {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}
