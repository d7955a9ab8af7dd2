use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{events_on, navigation::month_window, GridContext, GridOptions};
use crate::calendar::ScheduleEvent;
use crate::date::DateRange;
use crate::store::EventStore;

/// One date in a month grid.
///
/// `events` always holds the full sorted list. The display cap is applied by
/// [`DayCell::visible`] and reported by [`DayCell::overflow_count`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub events: Vec<ScheduleEvent>,
    pub max_visible: usize,
}

impl DayCell {
    /// The events that fit in the cell.
    pub fn visible(&self) -> &[ScheduleEvent] {
        &self.events[..self.events.len().min(self.max_visible)]
    }

    /// How many events did not fit.
    pub fn overflow_count(&self) -> usize {
        self.events.len().saturating_sub(self.max_visible)
    }
}

/// Sunday-to-Saturday weeks covering one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub range: DateRange,
    pub weeks: Vec<Vec<DayCell>>,
}

impl MonthGrid {
    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flatten()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells().find(|cell| cell.date == date)
    }
}

/// Builds the month grid for the month containing `anchor`.
pub fn month_grid(
    anchor: NaiveDate,
    context: &GridContext,
    store: &EventStore,
    options: &GridOptions,
) -> MonthGrid {
    let range = month_window(anchor);

    let cells: Vec<DayCell> = range
        .days()
        .map(|date| DayCell {
            date,
            is_current_month: date.year() == anchor.year() && date.month() == anchor.month(),
            is_today: context.is_today(date),
            is_selected: context.is_selected(date),
            events: events_on(store, date, context),
            max_visible: options.max_events_per_cell,
        })
        .collect();

    let weeks = cells.chunks(7).map(|week| week.to_vec()).collect();

    MonthGrid {
        year: anchor.year(),
        month: anchor.month(),
        range,
        weeks,
    }
}
