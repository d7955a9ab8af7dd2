use std::cmp::Ordering;

use super::types::ScheduleEvent;

/// Display rank within a day: multi-day first, then all-day, then timed.
pub fn display_rank(event: &ScheduleEvent) -> u8 {
    if event.is_multi_day() {
        0
    } else if event.is_all_day() {
        1
    } else {
        2
    }
}

/// Orders two events for display within a single day cell.
pub fn compare_for_display(a: &ScheduleEvent, b: &ScheduleEvent) -> Ordering {
    display_rank(a)
        .cmp(&display_rank(b))
        .then_with(|| match (a.start_time(), b.start_time()) {
            (Some(a_time), Some(b_time)) => a_time.cmp(&b_time),
            _ => Ordering::Equal,
        })
        .then_with(|| a.title.cmp(&b.title))
}

/// Sorts events by hierarchy: MultiDay -> AllDay -> Timed (by start time).
pub fn sort_events_for_display(events: &mut [&ScheduleEvent]) {
    events.sort_by(|a, b| compare_for_display(a, b));
}
