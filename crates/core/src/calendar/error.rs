use thiserror::Error;

/// Validation failures for schedule events.
///
/// These are raised synchronously, before any remote call is attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Event owner is required")]
    MissingOwner,
    #[error("End date must be after or equal to start date")]
    InvalidDateRange,
    #[error("End time must be after start time")]
    InvalidTimeRange,
    #[error("Start time and end time must be provided together")]
    IncompleteTimes,
    #[error("Recurrence end date must be on or after the start date")]
    InvalidRecurrenceEnd,
    #[error("Invalid color format: {0}")]
    InvalidColor(String),
}
