use chrono::{Datelike, Days, NaiveDate};

use super::CalendarView;
use crate::date::{shift_months, DateRange};

/// Direction of a previous/next navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Moves `anchor` by one unit of `view`.
///
/// Month steps land on the first of the target month, so a round trip such
/// as Jan 31 → next → previous never drifts. Returns `None` only when the
/// result would leave chrono's supported date range.
pub fn navigate(view: CalendarView, anchor: NaiveDate, direction: Direction) -> Option<NaiveDate> {
    match view {
        CalendarView::Month => {
            let first = first_of_month(anchor);
            let months = match direction {
                Direction::Previous => -1,
                Direction::Next => 1,
            };
            shift_months(first, months)
        }
        CalendarView::Week => step_days(anchor, 7, direction),
        CalendarView::Day => step_days(anchor, 1, direction),
    }
}

/// Dates a view needs data for.
///
/// Month windows include the leading and trailing days that pad the grid to
/// whole weeks.
pub fn fetch_window(view: CalendarView, anchor: NaiveDate) -> DateRange {
    match view {
        CalendarView::Month => month_window(anchor),
        CalendarView::Week => DateRange::week(anchor),
        CalendarView::Day => DateRange::single(anchor),
    }
}

pub(super) fn month_window(anchor: NaiveDate) -> DateRange {
    let first = first_of_month(anchor);
    let last = shift_months(first, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(anchor);

    DateRange {
        start: DateRange::week(first).start,
        end: DateRange::week(last).end,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn step_days(anchor: NaiveDate, days: u64, direction: Direction) -> Option<NaiveDate> {
    match direction {
        Direction::Previous => anchor.checked_sub_days(Days::new(days)),
        Direction::Next => anchor.checked_add_days(Days::new(days)),
    }
}
