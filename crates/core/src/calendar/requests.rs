//! Drafts and patches for schedule events.
//!
//! These are the shapes the host hands to the engine for create and update.
//! Pure data plus merge logic, no I/O.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::error::EventError;
use super::operations::validate_event;
use super::types::{Category, EventId, EventTimes, Priority, RecurrencePattern, ScheduleEvent};

/// An event that has not been saved yet. It has no id and no server timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub owner_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<EventTimes>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<NaiveDate>,
}

impl EventDraft {
    fn base(owner_id: String, title: String, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            owner_id,
            title,
            description: None,
            start_date: start,
            end_date: end,
            times: None,
            category: Category::default(),
            priority: Priority::default(),
            location: None,
            attendees: Vec::new(),
            color: None,
            is_recurring: false,
            recurrence_pattern: None,
            recurrence_end_date: None,
        }
    }

    /// Creates an all-day draft on a single day.
    pub fn all_day(owner_id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self::base(owner_id.into(), title.into(), date, date)
    }

    /// Creates a timed draft on a single day.
    pub fn timed(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        let mut draft = Self::base(owner_id.into(), title.into(), date, date);
        draft.times = Some(EventTimes::new(start, end));
        draft
    }

    /// Creates an all-day draft spanning `start..=end`.
    pub fn multi_day(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self::base(owner_id.into(), title.into(), start, end)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_recurrence(mut self, pattern: RecurrencePattern, end: Option<NaiveDate>) -> Self {
        self.is_recurring = pattern != RecurrencePattern::None;
        self.recurrence_pattern = Some(pattern);
        self.recurrence_end_date = end;
        self
    }

    /// Converts the draft into an event carrying the given identity.
    pub fn into_event(self, id: EventId) -> ScheduleEvent {
        ScheduleEvent {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            times: self.times,
            category: self.category,
            priority: self.priority,
            location: self.location,
            attendees: self.attendees,
            color: self.color,
            is_recurring: self.is_recurring,
            recurrence_pattern: self.recurrence_pattern,
            recurrence_end_date: self.recurrence_end_date,
            created_at: None,
            updated_at: None,
            deleted_at: None,
            is_deleted: false,
        }
    }
}

impl From<&ScheduleEvent> for EventDraft {
    fn from(event: &ScheduleEvent) -> Self {
        Self {
            owner_id: event.owner_id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            times: event.times,
            category: event.category,
            priority: event.priority,
            location: event.location.clone(),
            attendees: event.attendees.clone(),
            color: event.color.clone(),
            is_recurring: event.is_recurring,
            recurrence_pattern: event.recurrence_pattern,
            recurrence_end_date: event.recurrence_end_date,
        }
    }
}

/// A partial update. Only the fields that are set are merged into the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    /// `Some(true)` clears the times; `Some(false)` requires times to end up set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// `Some(RecurrencePattern::None)` stops the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<NaiveDate>,
}

impl EventPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Moves the event. Without an explicit end date the span is preserved.
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self.all_day = Some(false);
        self
    }

    pub fn with_all_day(mut self) -> Self {
        self.all_day = Some(true);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_recurrence(mut self, pattern: RecurrencePattern, end: Option<NaiveDate>) -> Self {
        self.recurrence_pattern = Some(pattern);
        self.recurrence_end_date = end;
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the patch into `event`.
    ///
    /// The merge happens on a copy; if the result violates an event invariant
    /// the error is returned and `event` is left untouched.
    pub fn apply_to(&self, event: &mut ScheduleEvent) -> Result<(), EventError> {
        let mut merged = event.clone();

        if let Some(title) = &self.title {
            merged.title = title.clone();
        }
        if let Some(description) = &self.description {
            merged.description = Some(description.clone());
        }
        if let Some(location) = &self.location {
            merged.location = Some(location.clone());
        }
        if let Some(attendees) = &self.attendees {
            merged.attendees = attendees.clone();
        }
        if let Some(color) = &self.color {
            merged.color = Some(color.clone());
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(priority) = self.priority {
            merged.priority = priority;
        }

        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                merged.start_date = start;
                merged.end_date = end;
            }
            (Some(start), None) => {
                let span = merged.end_date - merged.start_date;
                merged.start_date = start;
                merged.end_date = start + span;
            }
            (None, Some(end)) => merged.end_date = end,
            (None, None) => {}
        }

        merged.times = self.merged_times(merged.times)?;

        if let Some(pattern) = self.recurrence_pattern {
            if pattern == RecurrencePattern::None {
                merged.is_recurring = false;
                merged.recurrence_pattern = None;
                merged.recurrence_end_date = None;
            } else {
                merged.is_recurring = true;
                merged.recurrence_pattern = Some(pattern);
            }
        }
        if let Some(until) = self.recurrence_end_date {
            if merged.is_recurring {
                merged.recurrence_end_date = Some(until);
            }
        }

        validate_event(&merged)?;
        *event = merged;
        Ok(())
    }

    fn merged_times(&self, current: Option<EventTimes>) -> Result<Option<EventTimes>, EventError> {
        if self.all_day == Some(true) {
            return Ok(None);
        }

        let times = match (self.start_time, self.end_time, current) {
            (Some(start), Some(end), _) => Some(EventTimes::new(start, end)),
            (Some(start), None, Some(current)) => Some(EventTimes::new(start, current.end)),
            (None, Some(end), Some(current)) => Some(EventTimes::new(current.start, end)),
            (Some(_), None, None) | (None, Some(_), None) => {
                return Err(EventError::IncompleteTimes)
            }
            (None, None, current) => current,
        };

        if self.all_day == Some(false) && times.is_none() {
            return Err(EventError::IncompleteTimes);
        }

        Ok(times)
    }
}
