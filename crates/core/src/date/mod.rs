//! LocalDateMath: timezone-safe calendar-date utilities.

mod error;
mod local;
mod range;

pub use error::{DateParseError, DateRangeError};
pub use local::{
    format_local, format_local_time, in_range, month_range, parse_local, parse_local_time,
    same_date, shift_months, week_range, CalendarDay,
};
pub use range::DateRange;
