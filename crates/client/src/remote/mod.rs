//! RemoteSync: the remote schedule store behind a trait.

mod http;
mod inmemory;
pub mod wire;

use async_trait::async_trait;

use daybook_core::calendar::{Category, EventDraft, ScheduleEvent};
use daybook_core::date::DateRange;

use crate::error::Result;

pub use http::HttpRemote;
pub use inmemory::InMemoryRemote;

/// Window-scoped query for one owner's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    pub owner_id: String,
    pub range: DateRange,
    pub category: Option<Category>,
}

impl FetchQuery {
    pub fn new(owner_id: impl Into<String>, range: DateRange) -> Self {
        Self {
            owner_id: owner_id.into(),
            range,
            category: None,
        }
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }
}

/// A remote store of schedule events.
///
/// Implementations normalize every failure into [`RemoteError`](crate::RemoteError).
#[async_trait]
pub trait ScheduleRemote: Send + Sync {
    /// Events intersecting the query window.
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<ScheduleEvent>>;

    /// Creates an event and returns it with its server-issued id.
    async fn create(&self, draft: &EventDraft) -> Result<ScheduleEvent>;

    /// Replaces the stored event `id` and returns the stored version.
    async fn update(&self, id: &str, event: &ScheduleEvent) -> Result<ScheduleEvent>;

    /// Soft-deletes the event `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}
