//! In-memory remote store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use daybook_core::calendar::{EventDraft, EventId, ScheduleEvent};
use daybook_core::recurrence::expand;

use super::{FetchQuery, ScheduleRemote};
use crate::error::{RemoteError, Result};

/// In-memory storage backend for tests and offline use.
///
/// Ids are issued from a counter, deletes are soft, and fetches apply the
/// same window semantics as the engine. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemote {
    events: Arc<RwLock<BTreeMap<u64, ScheduleEvent>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryRemote {
    /// Creates a new empty remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a remote holding `events`.
    ///
    /// Events with a numeric remote id keep it; every other event is issued a
    /// fresh one.
    pub fn with_events(events: Vec<ScheduleEvent>) -> Self {
        let mut stored = BTreeMap::new();
        let mut unnumbered = Vec::new();
        for event in events {
            match event.id.as_remote().and_then(|id| id.parse::<u64>().ok()) {
                Some(id) if !stored.contains_key(&id) => {
                    stored.insert(id, event);
                }
                _ => unnumbered.push(event),
            }
        }

        let mut next_id = stored.keys().next_back().copied().unwrap_or(0);
        for mut event in unnumbered {
            next_id += 1;
            event.id = EventId::Remote(next_id.to_string());
            stored.insert(next_id, event);
        }

        Self {
            events: Arc::new(RwLock::new(stored)),
            next_id: Arc::new(AtomicU64::new(next_id)),
        }
    }

    /// Every stored event, soft-deleted ones included, ordered by id.
    pub async fn all(&self) -> Vec<ScheduleEvent> {
        self.events.read().await.values().cloned().collect()
    }

    /// Number of events that are not soft-deleted.
    pub async fn active_count(&self) -> usize {
        self.events
            .read()
            .await
            .values()
            .filter(|e| e.is_active())
            .count()
    }

    fn parse_id(id: &str) -> Result<u64> {
        id.parse().map_err(|_| RemoteError::NotFound {
            resource: id.to_string(),
        })
    }

    fn not_found(id: u64) -> RemoteError {
        RemoteError::NotFound {
            resource: id.to_string(),
        }
    }
}

#[async_trait]
impl ScheduleRemote for InMemoryRemote {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<ScheduleEvent>> {
        let events = self.events.read().await;
        Ok(events
            .values()
            .filter(|e| e.is_active())
            .filter(|e| e.owner_id == query.owner_id)
            .filter(|e| query.category.is_none_or(|category| e.category == category))
            .filter(|e| expand(e, query.range).next().is_some())
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &EventDraft) -> Result<ScheduleEvent> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();

        let mut event = draft.clone().into_event(EventId::Remote(id.to_string()));
        event.created_at = Some(now);
        event.updated_at = Some(now);

        self.events.write().await.insert(id, event.clone());
        Ok(event)
    }

    async fn update(&self, id: &str, event: &ScheduleEvent) -> Result<ScheduleEvent> {
        let key = Self::parse_id(id)?;
        let mut events = self.events.write().await;

        let stored = events
            .get_mut(&key)
            .filter(|stored| stored.is_active())
            .ok_or_else(|| Self::not_found(key))?;

        let mut updated = event.clone();
        updated.id = stored.id.clone();
        updated.created_at = stored.created_at;
        updated.updated_at = Some(Utc::now());
        *stored = updated.clone();

        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let key = Self::parse_id(id)?;
        let mut events = self.events.write().await;

        let stored = events
            .get_mut(&key)
            .filter(|stored| stored.is_active())
            .ok_or_else(|| Self::not_found(key))?;

        let now = Utc::now();
        stored.is_deleted = true;
        stored.deleted_at = Some(now);
        stored.updated_at = Some(now);
        Ok(())
    }
}
