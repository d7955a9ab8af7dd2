mod error;
mod operations;
mod requests;
mod sorting;
mod types;

pub use error::EventError;
pub use operations::{
    filter_events_by_category, filter_events_by_range, is_valid_color, validate_draft,
    validate_event, MAX_TITLE_LENGTH,
};
pub use requests::{EventDraft, EventPatch};
pub use sorting::{compare_for_display, display_rank, sort_events_for_display};
pub use types::{Category, EventId, EventTimes, Priority, RecurrencePattern, ScheduleEvent};
