use super::error::EventError;
use super::requests::EventDraft;
use super::types::{Category, EventId, RecurrencePattern, ScheduleEvent};
use crate::date::DateRange;

/// Maximum title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Filters events whose nominal date interval overlaps a range.
/// Recurring series are matched on their first occurrence only.
pub fn filter_events_by_range(events: &[ScheduleEvent], range: DateRange) -> Vec<&ScheduleEvent> {
    events
        .iter()
        .filter(|event| event.date_range().overlaps(&range))
        .collect()
}

/// Filters events by category.
pub fn filter_events_by_category(
    events: &[ScheduleEvent],
    category: Category,
) -> Vec<&ScheduleEvent> {
    events
        .iter()
        .filter(|event| event.category == category)
        .collect()
}

/// Validates an event against the data-model invariants.
pub fn validate_event(event: &ScheduleEvent) -> Result<(), EventError> {
    if event.owner_id.trim().is_empty() {
        return Err(EventError::MissingOwner);
    }
    if event.title.trim().is_empty() {
        return Err(EventError::EmptyTitle);
    }
    if event.title.chars().count() > MAX_TITLE_LENGTH {
        return Err(EventError::TitleTooLong);
    }
    if event.end_date < event.start_date {
        return Err(EventError::InvalidDateRange);
    }

    // Times only need ordering when the event starts and ends on the same day
    if let Some(times) = &event.times {
        if event.start_date == event.end_date && times.end <= times.start {
            return Err(EventError::InvalidTimeRange);
        }
    }

    let pattern = event.recurrence_pattern.unwrap_or_default();
    if event.is_recurring && pattern != RecurrencePattern::None {
        if let Some(until) = event.recurrence_end_date {
            if until < event.start_date {
                return Err(EventError::InvalidRecurrenceEnd);
            }
        }
    }

    if let Some(color) = &event.color {
        if !is_valid_color(color) {
            return Err(EventError::InvalidColor(color.clone()));
        }
    }

    Ok(())
}

/// Validates an unsaved draft before it is inserted or sent anywhere.
pub fn validate_draft(draft: &EventDraft) -> Result<(), EventError> {
    validate_event(&draft.clone().into_event(EventId::new_local()))
}

/// Checks if a color string is valid (hex color or CSS named color).
pub fn is_valid_color(color: &str) -> bool {
    if color.is_empty() {
        return false;
    }

    // Check hex color format (#RGB, #RRGGBB, #RRGGBBAA)
    if let Some(hex) = color.strip_prefix('#') {
        let valid_lengths = [3, 6, 8];
        return valid_lengths.contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    let css_colors = [
        "red", "green", "blue", "yellow", "orange", "purple", "pink", "cyan", "magenta", "white",
        "black", "gray", "grey", "brown", "navy", "teal", "olive", "maroon", "lime", "aqua",
        "fuchsia", "silver",
    ];
    css_colors.contains(&color.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_time(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    #[test]
    fn test_filter_events_by_range_uses_overlap() {
        let events = vec![
            ScheduleEvent::all_day("u", "Before", make_date(2024, 1, 1)),
            ScheduleEvent::multi_day("u", "Straddles", make_date(2024, 1, 8), make_date(2024, 1, 11)),
            ScheduleEvent::all_day("u", "Inside", make_date(2024, 1, 15)),
            ScheduleEvent::all_day("u", "After", make_date(2024, 1, 30)),
        ];
        let range = DateRange::new(make_date(2024, 1, 10), make_date(2024, 1, 20)).unwrap();

        let titles: Vec<&str> = filter_events_by_range(&events, range)
            .iter()
            .map(|e| e.title.as_str())
            .collect();

        assert_eq!(titles, vec!["Straddles", "Inside"]);
    }

    #[test]
    fn test_filter_events_by_category() {
        let date = make_date(2024, 1, 15);
        let events = vec![
            ScheduleEvent::all_day("u", "Sprint", date).with_category(Category::Work),
            ScheduleEvent::all_day("u", "Gym", date).with_category(Category::Personal),
            ScheduleEvent::all_day("u", "Retro", date).with_category(Category::Work),
        ];

        assert_eq!(filter_events_by_category(&events, Category::Work).len(), 2);
        assert_eq!(filter_events_by_category(&events, Category::Meeting).len(), 0);
    }

    #[test]
    fn test_validate_event_success() {
        let event = ScheduleEvent::all_day("u", "Valid", make_date(2024, 1, 15));
        assert!(validate_event(&event).is_ok());
    }

    #[test]
    fn test_validate_event_empty_title_and_owner() {
        let date = make_date(2024, 1, 15);
        assert_eq!(
            validate_event(&ScheduleEvent::all_day("u", "   ", date)),
            Err(EventError::EmptyTitle)
        );
        assert_eq!(
            validate_event(&ScheduleEvent::all_day("", "Title", date)),
            Err(EventError::MissingOwner)
        );
    }

    #[test]
    fn test_validate_event_title_too_long() {
        let title = "x".repeat(MAX_TITLE_LENGTH + 1);
        let event = ScheduleEvent::all_day("u", title, make_date(2024, 1, 15));
        assert_eq!(validate_event(&event), Err(EventError::TitleTooLong));
    }

    #[test]
    fn test_validate_event_invalid_date_range() {
        let event =
            ScheduleEvent::multi_day("u", "Backwards", make_date(2024, 3, 10), make_date(2024, 3, 9));
        assert_eq!(validate_event(&event), Err(EventError::InvalidDateRange));
    }

    #[test]
    fn test_validate_event_invalid_time_range() {
        let event = ScheduleEvent::timed(
            "u",
            "Backwards",
            make_date(2024, 1, 15),
            make_time(14, 0),
            make_time(10, 0),
        );
        assert_eq!(validate_event(&event), Err(EventError::InvalidTimeRange));
    }

    #[test]
    fn test_overnight_timed_event_is_valid() {
        let mut event = ScheduleEvent::timed(
            "u",
            "Night shift",
            make_date(2024, 1, 15),
            make_time(22, 0),
            make_time(6, 0),
        );
        event.end_date = make_date(2024, 1, 16);
        assert!(validate_event(&event).is_ok());
    }

    #[test]
    fn test_validate_event_recurrence_end_before_start() {
        let event = ScheduleEvent::all_day("u", "Weekly", make_date(2024, 1, 15))
            .with_recurrence(RecurrencePattern::Weekly, Some(make_date(2024, 1, 1)));
        assert_eq!(validate_event(&event), Err(EventError::InvalidRecurrenceEnd));

        // Ignored when the pattern is NONE
        let event = ScheduleEvent::all_day("u", "Once", make_date(2024, 1, 15))
            .with_recurrence(RecurrencePattern::None, Some(make_date(2024, 1, 1)));
        assert!(validate_event(&event).is_ok());
    }

    #[test]
    fn test_validate_event_invalid_color() {
        let event =
            ScheduleEvent::all_day("u", "Painted", make_date(2024, 1, 15)).with_color("not-a-color");
        assert!(matches!(
            validate_event(&event),
            Err(EventError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_is_valid_color() {
        assert!(is_valid_color("#FFF"));
        assert!(is_valid_color("#3B82F6"));
        assert!(is_valid_color("#FFFFFFFF"));
        assert!(is_valid_color("Blue"));

        assert!(!is_valid_color(""));
        assert!(!is_valid_color("#GGG"));
        assert!(!is_valid_color("#12345"));
        assert!(!is_valid_color("not-a-color"));
    }
}
