//! Wire schema of the remote schedule store.
//!
//! The remote store keeps dates and times in separate fields and flags all-day
//! events with `is_all_day`. Dates are `YYYY-MM-DD` and times `HH:MM:SS`, both
//! rendered through the local-date helpers.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use daybook_core::calendar::{
    Category, EventDraft, EventId, EventTimes, Priority, RecurrencePattern, ScheduleEvent,
};
use daybook_core::serde::{
    comma_list, deserialize_optional_string, deserialize_string_or_number, local_date,
    optional_local_date, optional_local_time,
};

use crate::error::RemoteError;

/// An event as the remote store returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEvent {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(with = "local_date")]
    pub start_date: NaiveDate,
    #[serde(with = "local_date")]
    pub end_date: NaiveDate,
    #[serde(default, with = "optional_local_time")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "optional_local_time")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, with = "comma_list")]
    pub attendees: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub recurrence_pattern: Option<String>,
    #[serde(default, with = "optional_local_date")]
    pub recurrence_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Body of a create or update request: the wire shape minus server-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEventRequest {
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "local_date")]
    pub start_date: NaiveDate,
    #[serde(with = "local_date")]
    pub end_date: NaiveDate,
    #[serde(default, with = "optional_local_time")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "optional_local_time")]
    pub end_time: Option<NaiveTime>,
    pub is_all_day: bool,
    pub category: String,
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, with = "comma_list")]
    pub attendees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<String>,
    #[serde(default, with = "optional_local_date")]
    pub recurrence_end_date: Option<NaiveDate>,
}

impl TryFrom<WireEvent> for ScheduleEvent {
    type Error = RemoteError;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        let times = match (wire.is_all_day, wire.start_time, wire.end_time) {
            (true, _, _) | (false, None, None) => None,
            (false, Some(start), Some(end)) => Some(EventTimes::new(start, end)),
            (false, _, _) => {
                return Err(RemoteError::Decode(format!(
                    "event {} has only one of start_time/end_time",
                    wire.id
                )))
            }
        };

        let category = match wire.category.as_deref() {
            None => Category::default(),
            Some(value) => Category::parse(value).unwrap_or_else(|| {
                tracing::warn!(event_id = %wire.id, category = value, "Unknown category, using OTHER");
                Category::Other
            }),
        };
        let priority = wire
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or_default();
        let recurrence_pattern = wire
            .recurrence_pattern
            .as_deref()
            .and_then(RecurrencePattern::parse);

        Ok(ScheduleEvent {
            id: EventId::Remote(wire.id),
            owner_id: wire.user_id,
            title: wire.title,
            description: wire.description,
            start_date: wire.start_date,
            end_date: wire.end_date,
            times,
            category,
            priority,
            location: wire.location,
            attendees: wire.attendees,
            color: wire.color,
            is_recurring: wire.is_recurring,
            recurrence_pattern,
            recurrence_end_date: wire.recurrence_end_date,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            deleted_at: wire.deleted_at,
            is_deleted: wire.is_deleted,
        })
    }
}

impl From<&ScheduleEvent> for WireEvent {
    fn from(event: &ScheduleEvent) -> Self {
        let request = WireEventRequest::from(event);
        WireEvent {
            id: event.id.to_string(),
            user_id: request.user_id,
            title: request.title,
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
            start_time: request.start_time,
            end_time: request.end_time,
            is_all_day: request.is_all_day,
            category: Some(request.category),
            priority: Some(request.priority),
            location: request.location,
            attendees: request.attendees,
            color: request.color,
            is_recurring: request.is_recurring,
            recurrence_pattern: request.recurrence_pattern,
            recurrence_end_date: request.recurrence_end_date,
            created_at: event.created_at,
            updated_at: event.updated_at,
            is_deleted: event.is_deleted,
            deleted_at: event.deleted_at,
        }
    }
}

impl From<&ScheduleEvent> for WireEventRequest {
    fn from(event: &ScheduleEvent) -> Self {
        WireEventRequest {
            user_id: event.owner_id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            start_time: event.start_time(),
            end_time: event.end_time(),
            is_all_day: event.is_all_day(),
            category: event.category.as_str().to_string(),
            priority: event.priority.as_str().to_string(),
            location: event.location.clone(),
            attendees: event.attendees.clone(),
            color: event.color.clone(),
            is_recurring: event.is_recurring,
            recurrence_pattern: event
                .recurrence_pattern
                .map(|pattern| pattern.as_str().to_string()),
            recurrence_end_date: event.recurrence_end_date,
        }
    }
}

impl From<&EventDraft> for WireEventRequest {
    fn from(draft: &EventDraft) -> Self {
        WireEventRequest::from(&draft.clone().into_event(EventId::new_local()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE_JSON: &str = r#"{
        "id": 42,
        "user_id": "u1",
        "title": "Design review",
        "description": "",
        "start_date": "2024-03-10",
        "end_date": "2024-03-10",
        "start_time": "09:30:00",
        "end_time": "10:15",
        "is_all_day": false,
        "category": "MEETING",
        "priority": "high",
        "location": "Room 4",
        "attendees": "ana@example.com, bo@example.com",
        "color": null,
        "created_at": "2024-03-01T12:00:00Z",
        "updated_at": "2024-03-02T12:00:00Z"
    }"#;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_decode_wire_event() {
        let wire: WireEvent = serde_json::from_str(WIRE_JSON).unwrap();
        let event = ScheduleEvent::try_from(wire).unwrap();

        assert_eq!(event.id, EventId::Remote("42".to_string()));
        assert_eq!(event.owner_id, "u1");
        assert_eq!(event.description, None);
        assert_eq!(event.start_date, make_date(2024, 3, 10));
        assert_eq!(event.start_time(), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(event.end_time(), NaiveTime::from_hms_opt(10, 15, 0));
        assert_eq!(event.category, Category::Meeting);
        assert_eq!(event.priority, Priority::High);
        assert_eq!(event.attendees, vec!["ana@example.com", "bo@example.com"]);
        assert!(!event.is_recurring);
        assert!(event.is_active());
    }

    #[test]
    fn test_all_day_flag_drops_times() {
        let json = r#"{"id": "a1", "user_id": "u1", "title": "Holiday",
            "start_date": "2024-12-25", "end_date": "2024-12-25",
            "start_time": "00:00:00", "is_all_day": true}"#;
        let wire: WireEvent = serde_json::from_str(json).unwrap();
        let event = ScheduleEvent::try_from(wire).unwrap();

        assert!(event.is_all_day());
        assert_eq!(event.category, Category::Other);
        assert_eq!(event.priority, Priority::Medium);
    }

    #[test]
    fn test_half_specified_times_are_rejected() {
        let json = r#"{"id": "a1", "user_id": "u1", "title": "Broken",
            "start_date": "2024-12-25", "end_date": "2024-12-25",
            "start_time": "09:00:00", "is_all_day": false}"#;
        let wire: WireEvent = serde_json::from_str(json).unwrap();

        assert!(matches!(
            ScheduleEvent::try_from(wire),
            Err(RemoteError::Decode(_))
        ));
    }

    #[test]
    fn test_request_uses_local_formats() {
        let draft = EventDraft::timed(
            "u1",
            "Standup",
            make_date(2024, 1, 2),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
        )
        .with_category(Category::Work)
        .with_attendees(["ana", "bo"])
        .with_recurrence(RecurrencePattern::Weekly, Some(make_date(2024, 6, 30)));

        let json = serde_json::to_value(WireEventRequest::from(&draft)).unwrap();

        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["start_date"], "2024-01-02");
        assert_eq!(json["start_time"], "09:00:00");
        assert_eq!(json["end_time"], "09:15:00");
        assert_eq!(json["is_all_day"], false);
        assert_eq!(json["category"], "WORK");
        assert_eq!(json["attendees"], "ana,bo");
        assert_eq!(json["is_recurring"], true);
        assert_eq!(json["recurrence_pattern"], "WEEKLY");
        assert_eq!(json["recurrence_end_date"], "2024-06-30");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_stored_event_survives_wire_encoding() {
        let event = ScheduleEvent::all_day("u1", "Offsite", make_date(2024, 5, 6))
            .with_id("7")
            .with_location("Lisbon")
            .with_priority(Priority::Low);

        let json = serde_json::to_string(&WireEvent::from(&event)).unwrap();
        let decoded = ScheduleEvent::try_from(serde_json::from_str::<WireEvent>(&json).unwrap())
            .unwrap();

        assert_eq!(decoded, event);
    }
}
