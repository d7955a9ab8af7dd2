use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::DateRange;

/// Identity of a schedule event.
///
/// Events created locally carry a temporary `Local` id until the remote store
/// confirms them and issues a `Remote` id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventId {
    Remote(String),
    Local(Uuid),
}

impl EventId {
    /// Creates a fresh temporary id for an optimistic insert.
    pub fn new_local() -> Self {
        EventId::Local(Uuid::new_v4())
    }

    /// Returns true if this id has not been confirmed by the remote store.
    pub fn is_local(&self) -> bool {
        matches!(self, EventId::Local(_))
    }

    /// Returns the server-issued id, if any.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            EventId::Remote(id) => Some(id),
            EventId::Local(_) => None,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Remote(id) => write!(f, "{id}"),
            EventId::Local(id) => write!(f, "local-{id}"),
        }
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::Remote(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        EventId::Remote(id)
    }
}

/// Closed set of event categories. Drives the default color and grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Work,
    Personal,
    Meeting,
    Deadline,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Meeting,
        Category::Deadline,
        Category::Other,
    ];

    /// The display color used when an event carries no override.
    pub fn default_color(&self) -> &'static str {
        match self {
            Category::Work => "#3B82F6",
            Category::Personal => "#10B981",
            Category::Meeting => "#8B5CF6",
            Category::Deadline => "#EF4444",
            Category::Other => "#6B7280",
        }
    }

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "WORK",
            Category::Personal => "PERSONAL",
            Category::Meeting => "MEETING",
            Category::Deadline => "DEADLINE",
            Category::Other => "OTHER",
        }
    }

    /// Case-insensitive lookup by wire name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
    }
}

/// UI-only weighting. Does not affect scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// How a recurring event repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    #[default]
    None,
}

impl RecurrencePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily => "DAILY",
            RecurrencePattern::Weekly => "WEEKLY",
            RecurrencePattern::Monthly => "MONTHLY",
            RecurrencePattern::Yearly => "YEARLY",
            RecurrencePattern::None => "NONE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(RecurrencePattern::Daily),
            "WEEKLY" => Some(RecurrencePattern::Weekly),
            "MONTHLY" => Some(RecurrencePattern::Monthly),
            "YEARLY" => Some(RecurrencePattern::Yearly),
            "NONE" => Some(RecurrencePattern::None),
            _ => None,
        }
    }
}

/// Clock times of a timed event. Start and end always travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTimes {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl EventTimes {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// A schedule event owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub id: EventId,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` means the event is all-day.
    pub times: Option<EventTimes>,
    pub category: Category,
    pub priority: Priority,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    /// Explicit color override (CSS color value).
    pub color: Option<String>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    /// Last day (inclusive) a recurring series may start an occurrence.
    pub recurrence_end_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl ScheduleEvent {
    fn base(owner_id: String, title: String, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: EventId::new_local(),
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
            created_at: None,
            updated_at: None,
            deleted_at: None,
            is_deleted: false,
        }
    }

    /// Creates a single-day all-day event.
    pub fn all_day(owner_id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self::base(owner_id.into(), title.into(), date, date)
    }

    /// Creates a timed event on a single day.
    pub fn timed(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        let mut event = Self::base(owner_id.into(), title.into(), date, date);
        event.times = Some(EventTimes::new(start, end));
        event
    }

    /// Creates an all-day event spanning several days.
    pub fn multi_day(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self::base(owner_id.into(), title.into(), start, end)
    }

    /// Sets a specific ID for this event.
    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = id.into();
        self
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

    /// Marks the event as recurring with the given pattern and optional end.
    pub fn with_recurrence(mut self, pattern: RecurrencePattern, end: Option<NaiveDate>) -> Self {
        self.is_recurring = true;
        self.recurrence_pattern = Some(pattern);
        self.recurrence_end_date = end;
        self
    }

    /// Returns true if the event has no time-of-day component.
    pub fn is_all_day(&self) -> bool {
        self.times.is_none()
    }

    /// Returns true if the event covers more than one calendar day.
    pub fn is_multi_day(&self) -> bool {
        self.end_date > self.start_date
    }

    /// Days between start and end (0 for a single-day event).
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(0)
    }

    /// The nominal (first-occurrence) date interval.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date.max(self.start_date),
        }
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.times.map(|times| times.start)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.times.map(|times| times.end)
    }

    /// The explicit override color, or the category default.
    pub fn effective_color(&self) -> &str {
        self.color
            .as_deref()
            .unwrap_or_else(|| self.category.default_color())
    }

    /// Returns false for soft-deleted events.
    pub fn is_active(&self) -> bool {
        !self.is_deleted && self.deleted_at.is_none()
    }
}
