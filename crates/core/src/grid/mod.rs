//! GridProjector: lays the event store out as a month, week or day grid.

mod month;
mod navigation;
mod time;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{sort_events_for_display, Category, ScheduleEvent};
use crate::date::DateRange;
use crate::store::EventStore;

pub use month::{month_grid, DayCell, MonthGrid};
pub use navigation::{fetch_window, navigate, Direction};
pub use time::{time_grid, DayColumn, HourSlot, TimeGrid};

pub const DEFAULT_MAX_EVENTS_PER_CELL: usize = 3;
pub const DEFAULT_FIRST_HOUR: u32 = 8;
pub const DEFAULT_LAST_HOUR: u32 = 19;

/// The calendar view a grid is projected for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarView::Month => "month",
            CalendarView::Week => "week",
            CalendarView::Day => "day",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "month" => Some(CalendarView::Month),
            "week" => Some(CalendarView::Week),
            "day" => Some(CalendarView::Day),
            _ => None,
        }
    }
}

impl std::fmt::Display for CalendarView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display policy for projected grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    /// Events shown per month cell before the rest is reported as overflow.
    pub max_events_per_cell: usize,
    /// First hour row of week and day grids.
    pub first_hour: u32,
    /// Last hour row of week and day grids, inclusive.
    pub last_hour: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            max_events_per_cell: DEFAULT_MAX_EVENTS_PER_CELL,
            first_hour: DEFAULT_FIRST_HOUR,
            last_hour: DEFAULT_LAST_HOUR,
        }
    }
}

impl GridOptions {
    /// Hour rows shown by time grids. Empty when the bounds are inverted.
    pub fn hours(&self) -> std::ops::RangeInclusive<u32> {
        self.first_hour..=self.last_hour.min(23)
    }
}

/// Per-render facts that are not part of the event data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridContext {
    pub today: NaiveDate,
    pub selected: Option<NaiveDate>,
    pub category: Option<Category>,
}

impl GridContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            selected: None,
            category: None,
        }
    }

    pub fn with_selected(mut self, selected: Option<NaiveDate>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    fn is_today(&self, date: NaiveDate) -> bool {
        self.today == date
    }

    fn is_selected(&self, date: NaiveDate) -> bool {
        self.selected == Some(date)
    }
}

/// A projected calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum CalendarGrid {
    Month(MonthGrid),
    Week(TimeGrid),
    Day(TimeGrid),
}

impl CalendarGrid {
    pub fn view(&self) -> CalendarView {
        match self {
            CalendarGrid::Month(_) => CalendarView::Month,
            CalendarGrid::Week(_) => CalendarView::Week,
            CalendarGrid::Day(_) => CalendarView::Day,
        }
    }

    /// Every date the grid shows, padding included.
    pub fn range(&self) -> DateRange {
        match self {
            CalendarGrid::Month(grid) => grid.range,
            CalendarGrid::Week(grid) | CalendarGrid::Day(grid) => grid.range,
        }
    }
}

/// Projects `store` into the grid for `view` around `anchor`.
pub fn project(
    view: CalendarView,
    anchor: NaiveDate,
    context: &GridContext,
    store: &EventStore,
    options: &GridOptions,
) -> CalendarGrid {
    let range = fetch_window(view, anchor);
    match view {
        CalendarView::Month => CalendarGrid::Month(month_grid(anchor, context, store, options)),
        CalendarView::Week => CalendarGrid::Week(time_grid(range, context, store, options)),
        CalendarView::Day => CalendarGrid::Day(time_grid(range, context, store, options)),
    }
}

/// Events shown on `date`, filtered by the context's category and in display order.
fn events_on(store: &EventStore, date: NaiveDate, context: &GridContext) -> Vec<ScheduleEvent> {
    let mut events: Vec<&ScheduleEvent> = store
        .events_for_date(date)
        .into_iter()
        .filter(|event| context.category.is_none_or(|category| event.category == category))
        .collect();
    sort_events_for_display(&mut events);
    events.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_view_parse_and_display() {
        assert_eq!(CalendarView::parse("Week"), Some(CalendarView::Week));
        assert_eq!(CalendarView::parse("year"), None);
        assert_eq!(CalendarView::Day.to_string(), "day");
        assert_eq!(CalendarView::default(), CalendarView::Month);
    }

    #[test]
    fn test_default_hours() {
        let options = GridOptions::default();
        assert_eq!(options.hours().count(), 12);

        let inverted = GridOptions {
            first_hour: 20,
            last_hour: 10,
            ..GridOptions::default()
        };
        assert_eq!(inverted.hours().count(), 0);
    }

    #[test]
    fn test_project_matches_view() {
        let store = EventStore::new();
        let anchor = make_date(2024, 2, 14);
        let context = GridContext::new(anchor);
        let options = GridOptions::default();

        for view in [CalendarView::Month, CalendarView::Week, CalendarView::Day] {
            let grid = project(view, anchor, &context, &store, &options);
            assert_eq!(grid.view(), view);
            assert_eq!(grid.range(), fetch_window(view, anchor));
        }
    }

    #[test]
    fn test_category_filter_applies_to_cells() {
        let date = make_date(2024, 2, 14);
        let mut store = EventStore::new();
        store.load(vec![
            ScheduleEvent::all_day("u", "Standup", date)
                .with_id("1")
                .with_category(Category::Meeting),
            ScheduleEvent::all_day("u", "Gym", date)
                .with_id("2")
                .with_category(Category::Personal),
        ]);
        let context = GridContext::new(date).with_category(Some(Category::Personal));

        let events = events_on(&store, date, &context);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Gym");
    }
}
