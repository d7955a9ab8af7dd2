use chrono::{NaiveDate, Timelike};
use serde::Serialize;

use super::{events_on, GridContext, GridOptions};
use crate::calendar::ScheduleEvent;
use crate::date::DateRange;
use crate::store::EventStore;

/// Events whose start time falls in one hour row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourSlot {
    pub hour: u32,
    pub events: Vec<ScheduleEvent>,
}

/// One day of a week or day grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
    /// All-day and multi-day events.
    pub all_day: Vec<ScheduleEvent>,
    pub slots: Vec<HourSlot>,
    /// Timed events starting before the first or after the last hour row.
    pub outside_hours: Vec<ScheduleEvent>,
}

impl DayColumn {
    pub fn slot(&self, hour: u32) -> Option<&HourSlot> {
        self.slots.iter().find(|slot| slot.hour == hour)
    }

    /// Every event in the column, whichever lane holds it.
    pub fn event_count(&self) -> usize {
        self.all_day.len()
            + self.outside_hours.len()
            + self.slots.iter().map(|slot| slot.events.len()).sum::<usize>()
    }
}

/// Day columns by hour rows. A week grid has seven columns, a day grid one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeGrid {
    pub range: DateRange,
    pub hours: Vec<u32>,
    pub columns: Vec<DayColumn>,
}

/// Builds one column per date in `range`.
pub fn time_grid(
    range: DateRange,
    context: &GridContext,
    store: &EventStore,
    options: &GridOptions,
) -> TimeGrid {
    let hours: Vec<u32> = options.hours().collect();
    let columns = range
        .days()
        .map(|date| day_column(date, &hours, context, store))
        .collect();

    TimeGrid {
        range,
        hours,
        columns,
    }
}

fn day_column(
    date: NaiveDate,
    hours: &[u32],
    context: &GridContext,
    store: &EventStore,
) -> DayColumn {
    let mut column = DayColumn {
        date,
        is_today: context.is_today(date),
        is_selected: context.is_selected(date),
        all_day: Vec::new(),
        slots: hours
            .iter()
            .map(|&hour| HourSlot {
                hour,
                events: Vec::new(),
            })
            .collect(),
        outside_hours: Vec::new(),
    };

    for event in events_on(store, date, context) {
        let start_hour = match event.start_time() {
            Some(start) if !event.is_multi_day() => start.hour(),
            _ => {
                column.all_day.push(event);
                continue;
            }
        };

        match column.slots.iter_mut().find(|slot| slot.hour == start_hour) {
            Some(slot) => slot.events.push(event),
            None => column.outside_hours.push(event),
        }
    }

    column
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventTimes;
    use crate::grid::{fetch_window, CalendarView};
    use chrono::NaiveTime;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn timed(id: &str, title: &str, date: NaiveDate, hour: u32) -> ScheduleEvent {
        ScheduleEvent::timed("u", title, date, make_time(hour, 30), make_time(hour + 1, 0))
            .with_id(id)
    }

    #[test]
    fn test_week_grid_shape() {
        let anchor = make_date(2024, 2, 14);
        let grid = time_grid(
            fetch_window(CalendarView::Week, anchor),
            &GridContext::new(anchor),
            &EventStore::new(),
            &GridOptions::default(),
        );

        assert_eq!(grid.columns.len(), 7);
        assert_eq!(grid.hours, (8..=19).collect::<Vec<_>>());
        assert_eq!(grid.columns[0].date, make_date(2024, 2, 11));
        assert!(grid.columns[3].is_today);
        assert!(grid.columns.iter().all(|c| c.slots.len() == 12));
    }

    #[test]
    fn test_events_placed_by_start_hour() {
        let date = make_date(2024, 2, 14);
        let mut store = EventStore::new();
        store.load(vec![
            timed("1", "Standup", date, 9),
            timed("2", "Lunch", date, 12),
            ScheduleEvent::all_day("u", "Holiday", date).with_id("3"),
        ]);

        let grid = time_grid(
            DateRange::single(date),
            &GridContext::new(date),
            &store,
            &GridOptions::default(),
        );
        let column = &grid.columns[0];

        assert_eq!(column.slot(9).unwrap().events[0].title, "Standup");
        assert_eq!(column.slot(12).unwrap().events[0].title, "Lunch");
        assert!(column.slot(10).unwrap().events.is_empty());
        assert_eq!(column.all_day.len(), 1);
        assert_eq!(column.all_day[0].title, "Holiday");
        assert_eq!(column.event_count(), 3);
    }

    #[test]
    fn test_multi_day_timed_event_hoisted_to_all_day_lane() {
        let mut trip = ScheduleEvent::multi_day(
            "u",
            "Conference",
            make_date(2024, 2, 13),
            make_date(2024, 2, 15),
        )
        .with_id("1");
        trip.times = Some(EventTimes::new(make_time(9, 0), make_time(17, 0)));

        let mut store = EventStore::new();
        store.load(vec![trip]);

        let anchor = make_date(2024, 2, 14);
        let grid = time_grid(
            fetch_window(CalendarView::Week, anchor),
            &GridContext::new(anchor),
            &store,
            &GridOptions::default(),
        );

        let hoisted: Vec<_> = grid
            .columns
            .iter()
            .filter(|c| c.all_day.len() == 1)
            .map(|c| c.date)
            .collect();
        assert_eq!(
            hoisted,
            vec![
                make_date(2024, 2, 13),
                make_date(2024, 2, 14),
                make_date(2024, 2, 15)
            ]
        );
        assert!(grid
            .columns
            .iter()
            .all(|c| c.slots.iter().all(|s| s.events.is_empty())));
    }

    #[test]
    fn test_events_outside_visible_hours_are_kept() {
        let date = make_date(2024, 2, 14);
        let mut store = EventStore::new();
        store.load(vec![timed("1", "Early run", date, 6), timed("2", "Late call", date, 21)]);

        let grid = time_grid(
            DateRange::single(date),
            &GridContext::new(date),
            &store,
            &GridOptions::default(),
        );
        let column = &grid.columns[0];

        let titles: Vec<_> = column.outside_hours.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Early run", "Late call"]);
        assert_eq!(column.event_count(), 2);
    }
}
