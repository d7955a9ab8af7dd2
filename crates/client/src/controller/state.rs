use chrono::NaiveDate;
use serde::Serialize;

use daybook_core::calendar::{Category, ScheduleEvent};
use daybook_core::grid::CalendarView;

/// UI-facing state of one calendar view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleState {
    pub view: CalendarView,
    /// Anchor date of the active view.
    pub current_date: NaiveDate,
    pub selected_date: Option<NaiveDate>,
    pub selected_event: Option<ScheduleEvent>,
    pub is_event_modal_open: bool,
    /// Informational only. New actions are accepted while it is set.
    pub is_loading: bool,
    /// Message of the last failed action, cleared by the next successful load.
    pub error: Option<String>,
    pub category_filter: Option<Category>,
}

impl ScheduleState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view: CalendarView::default(),
            current_date: today,
            selected_date: None,
            selected_event: None,
            is_event_modal_open: false,
            is_loading: false,
            error: None,
            category_filter: None,
        }
    }
}

/// What observers see: the state plus the current working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSnapshot {
    #[serde(flatten)]
    pub state: ScheduleState,
    pub events: Vec<ScheduleEvent>,
}

/// Result of a `load` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The working set was replaced with `count` events.
    Loaded { count: usize },
    /// A newer load started before this one finished; its response was dropped.
    Superseded,
}
