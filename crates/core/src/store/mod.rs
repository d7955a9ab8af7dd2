//! EventStore: the working set of events for the currently loaded window.
//!
//! Mutations are optimistic. Each one is applied immediately and tracked as a
//! [`Mutation`] until the caller commits or rolls it back. At most one mutation
//! may be in flight per event id.

mod error;
mod mutation;

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::calendar::{validate_draft, EventDraft, EventId, EventPatch, ScheduleEvent};
use crate::date::{DateRange, DateRangeError};
use crate::recurrence::{expand, occurs_on};

pub use error::{Result, StoreError};
pub use mutation::{Mutation, MutationKind, MutationState};

/// In-memory collection of schedule events with optimistic-update semantics.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<ScheduleEvent>,
    /// In-flight mutations in the order they were started.
    pending: Vec<Mutation>,
}

impl EventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the working set with a freshly fetched batch.
    ///
    /// Soft-deleted records are dropped. Mutations still in flight are
    /// re-applied on top of the batch: pending creates stay visible, pending
    /// removals stay hidden and pending updates keep their local version.
    /// Pending creates are appended in the order they were made.
    pub fn load(&mut self, events: Vec<ScheduleEvent>) {
        let mut seen = HashSet::new();
        let mut fresh: Vec<ScheduleEvent> = Vec::with_capacity(events.len());

        for event in events {
            if !event.is_active() {
                continue;
            }
            if !seen.insert(event.id.clone()) {
                tracing::warn!(event_id = %event.id, "Duplicate event in loaded batch, keeping first");
                continue;
            }
            fresh.push(event);
        }

        for mutation in &self.pending {
            match &mutation.kind {
                MutationKind::Create => {
                    if let Some(local) = self.get(&mutation.id) {
                        fresh.push(local.clone());
                    }
                }
                MutationKind::Update { .. } => {
                    if let Some(local) = self.get(&mutation.id) {
                        match fresh.iter_mut().find(|e| e.id == mutation.id) {
                            Some(slot) => *slot = local.clone(),
                            None => fresh.push(local.clone()),
                        }
                    }
                }
                MutationKind::Remove { .. } => fresh.retain(|e| e.id != mutation.id),
            }
        }

        tracing::debug!(
            count = fresh.len(),
            pending = self.pending.len(),
            "Event store loaded"
        );
        self.events = fresh;
    }

    /// Inserts a draft under a temporary local id.
    pub fn create(&mut self, draft: EventDraft) -> Result<Mutation> {
        validate_draft(&draft)?;

        let id = EventId::new_local();
        self.events.push(draft.into_event(id.clone()));

        Ok(self.track(Mutation::pending(id, MutationKind::Create)))
    }

    /// Merges `patch` into the event in place.
    pub fn update(&mut self, id: &EventId, patch: &EventPatch) -> Result<Mutation> {
        self.ensure_idle(id)?;

        let event = self
            .events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| not_found(id))?;
        let previous = event.clone();
        patch.apply_to(event)?;

        Ok(self.track(Mutation::pending(
            id.clone(),
            MutationKind::Update { previous },
        )))
    }

    /// Removes the event from the working set.
    pub fn remove(&mut self, id: &EventId) -> Result<Mutation> {
        self.ensure_idle(id)?;

        let position = self.position(id).ok_or_else(|| not_found(id))?;
        let previous = self.events.remove(position);

        Ok(self.track(Mutation::pending(
            id.clone(),
            MutationKind::Remove { previous, position },
        )))
    }

    /// Marks the pending mutation on `id` as confirmed.
    ///
    /// `confirmed` is the server's version of the event. For a create it
    /// replaces the temporary local entry, swapping in the server-issued id.
    /// If a load already brought in the server's copy, that entry is replaced
    /// and the local one dropped, so ids stay unique.
    pub fn commit(&mut self, id: &EventId, confirmed: Option<ScheduleEvent>) -> Result<Mutation> {
        let mutation = self.take_pending(id)?;

        match (&mutation.kind, confirmed) {
            (MutationKind::Remove { .. }, _) | (_, None) => {}
            (_, Some(server)) => {
                let local = self.position(id);
                let existing = if &server.id == id {
                    None
                } else {
                    self.position(&server.id)
                };

                match (local, existing) {
                    (Some(local), Some(existing)) => {
                        tracing::debug!(event_id = %server.id, "Server copy already loaded, dropping local entry");
                        self.events[existing] = server;
                        self.events.remove(local);
                    }
                    (Some(position), None) | (None, Some(position)) => {
                        self.events[position] = server
                    }
                    (None, None) => self.events.push(server),
                }
            }
        }

        tracing::debug!(event_id = %id, kind = mutation.kind.name(), "Mutation committed");
        Ok(mutation.resolve(MutationState::Committed))
    }

    /// Undoes the pending mutation on `id`.
    pub fn rollback(&mut self, id: &EventId) -> Result<Mutation> {
        let mutation = self.take_pending(id)?;

        match &mutation.kind {
            MutationKind::Create => self.events.retain(|e| &e.id != id),
            MutationKind::Update { previous } => {
                if let Some(position) = self.position(id) {
                    self.events[position] = previous.clone();
                }
            }
            MutationKind::Remove { previous, position } => {
                if self.position(id).is_none() {
                    let position = (*position).min(self.events.len());
                    self.events.insert(position, previous.clone());
                }
            }
        }

        tracing::debug!(event_id = %id, kind = mutation.kind.name(), "Mutation rolled back");
        Ok(mutation.resolve(MutationState::RolledBack))
    }

    /// State of the in-flight mutation on `id`, if there is one.
    pub fn pending_state(&self, id: &EventId) -> Option<MutationState> {
        self.pending
            .iter()
            .find(|mutation| &mutation.id == id)
            .map(|mutation| mutation.state)
    }

    pub fn has_pending(&self, id: &EventId) -> bool {
        self.pending.iter().any(|mutation| &mutation.id == id)
    }

    pub fn get(&self, id: &EventId) -> Option<&ScheduleEvent> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// All events in insertion order.
    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events active on `date`, including recurrences, in insertion order.
    pub fn events_for_date(&self, date: NaiveDate) -> Vec<&ScheduleEvent> {
        self.events
            .iter()
            .filter(|event| event.is_active() && occurs_on(event, date))
            .collect()
    }

    /// Events whose nominal start date falls in the given month.
    ///
    /// Recurring series are not expanded here; use [`events_for_date`] per
    /// day for that.
    ///
    /// [`events_for_date`]: EventStore::events_for_date
    pub fn events_for_month(
        &self,
        year: i32,
        month: u32,
    ) -> std::result::Result<Vec<&ScheduleEvent>, DateRangeError> {
        DateRange::month(year, month)?;
        Ok(self
            .events
            .iter()
            .filter(|event| {
                event.is_active()
                    && event.start_date.year() == year
                    && event.start_date.month() == month
            })
            .collect())
    }

    /// Events with at least one occurrence intersecting `range`.
    pub fn events_in_range(&self, range: DateRange) -> Vec<&ScheduleEvent> {
        self.events
            .iter()
            .filter(|event| event.is_active() && expand(event, range).next().is_some())
            .collect()
    }

    fn ensure_idle(&self, id: &EventId) -> Result<()> {
        if self.has_pending(id) {
            return Err(StoreError::ConcurrentMutation { id: id.to_string() });
        }
        Ok(())
    }

    fn track(&mut self, mutation: Mutation) -> Mutation {
        self.pending.push(mutation.clone());
        mutation
    }

    fn take_pending(&mut self, id: &EventId) -> Result<Mutation> {
        let index = self
            .pending
            .iter()
            .position(|mutation| &mutation.id == id)
            .ok_or_else(|| StoreError::NoPendingMutation { id: id.to_string() })?;
        Ok(self.pending.remove(index))
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }
}

fn not_found(id: &EventId) -> StoreError {
    StoreError::NotFound { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{EventError, RecurrencePattern};

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn remote(id: &str, title: &str, date: NaiveDate) -> ScheduleEvent {
        ScheduleEvent::all_day("u", title, date).with_id(id)
    }

    fn loaded_store() -> EventStore {
        let mut store = EventStore::new();
        store.load(vec![
            remote("1", "First", make_date(2024, 1, 15)),
            remote("2", "Second", make_date(2024, 1, 15)),
            remote("3", "Third", make_date(2024, 1, 20)),
        ]);
        store
    }

    fn titles(events: &[&ScheduleEvent]) -> Vec<String> {
        events.iter().map(|e| e.title.clone()).collect()
    }

    #[test]
    fn test_load_replaces_working_set_and_drops_deleted() {
        let mut store = loaded_store();
        let mut deleted = remote("9", "Deleted", make_date(2024, 1, 15));
        deleted.is_deleted = true;

        store.load(vec![remote("4", "Fourth", make_date(2024, 2, 1)), deleted]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.events()[0].title, "Fourth");
    }

    #[test]
    fn test_load_deduplicates_ids() {
        let mut store = EventStore::new();
        store.load(vec![
            remote("1", "Kept", make_date(2024, 1, 15)),
            remote("1", "Dropped", make_date(2024, 1, 15)),
        ]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.events()[0].title, "Kept");
    }

    #[test]
    fn test_events_for_date_keeps_insertion_order() {
        let store = loaded_store();

        assert_eq!(
            titles(&store.events_for_date(make_date(2024, 1, 15))),
            vec!["First", "Second"]
        );
        assert!(store.events_for_date(make_date(2024, 1, 16)).is_empty());
    }

    #[test]
    fn test_events_for_date_uses_interval_containment() {
        let mut store = EventStore::new();
        store.load(vec![ScheduleEvent::multi_day(
            "u",
            "Trip",
            make_date(2024, 1, 10),
            make_date(2024, 1, 12),
        )
        .with_id("1")]);

        for day in 10..=12 {
            assert_eq!(store.events_for_date(make_date(2024, 1, day)).len(), 1);
        }
        assert!(store.events_for_date(make_date(2024, 1, 9)).is_empty());
        assert!(store.events_for_date(make_date(2024, 1, 13)).is_empty());
    }

    #[test]
    fn test_events_for_date_expands_weekly_series() {
        let mut store = EventStore::new();
        store.load(vec![ScheduleEvent::all_day("u", "Sync", make_date(2024, 1, 1))
            .with_id("1")
            .with_recurrence(RecurrencePattern::Weekly, None)]);

        assert_eq!(store.events_for_date(make_date(2024, 1, 8)).len(), 1);
        assert_eq!(store.events_for_date(make_date(2024, 1, 15)).len(), 1);
        assert!(store.events_for_date(make_date(2024, 1, 9)).is_empty());
    }

    #[test]
    fn test_events_for_month_filters_on_nominal_start() {
        let mut store = EventStore::new();
        store.load(vec![
            ScheduleEvent::multi_day("u", "Spans", make_date(2024, 1, 30), make_date(2024, 2, 2))
                .with_id("1"),
            remote("2", "February", make_date(2024, 2, 10)),
            ScheduleEvent::all_day("u", "Series", make_date(2024, 1, 5))
                .with_id("3")
                .with_recurrence(RecurrencePattern::Weekly, None),
        ]);

        assert_eq!(
            titles(&store.events_for_month(2024, 2).unwrap()),
            vec!["February"]
        );
        assert_eq!(
            titles(&store.events_for_month(2024, 1).unwrap()),
            vec!["Spans", "Series"]
        );
        assert!(store.events_for_month(2024, 13).is_err());
    }

    #[test]
    fn test_create_is_optimistic_and_commit_swaps_id() {
        let mut store = EventStore::new();
        let date = make_date(2024, 3, 10);

        let mutation = store
            .create(EventDraft::all_day("u", "Draft", date))
            .unwrap();
        assert!(mutation.id.is_local());
        assert_eq!(store.pending_state(&mutation.id), Some(MutationState::Pending));
        assert_eq!(store.events_for_date(date).len(), 1);

        let server = store.get(&mutation.id).unwrap().clone().with_id("100");
        let resolved = store.commit(&mutation.id, Some(server)).unwrap();

        assert_eq!(resolved.state, MutationState::Committed);
        assert_eq!(store.pending_state(&mutation.id), None);
        assert!(store.get(&mutation.id).is_none());
        assert!(store.get(&EventId::from("100")).is_some());
    }

    #[test]
    fn test_create_rollback_removes_entry() {
        let mut store = EventStore::new();
        let date = make_date(2024, 3, 10);

        let mutation = store
            .create(EventDraft::all_day("u", "Draft", date))
            .unwrap();
        let resolved = store.rollback(&mutation.id).unwrap();

        assert_eq!(resolved.state, MutationState::RolledBack);
        assert!(store.events_for_date(date).is_empty());
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let mut store = EventStore::new();
        let draft = EventDraft::multi_day("u", "Bad", make_date(2024, 3, 10), make_date(2024, 3, 9));

        assert_eq!(
            store.create(draft),
            Err(StoreError::Validation(EventError::InvalidDateRange))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_rollback_restores_previous_values() {
        let mut store = loaded_store();
        let id = EventId::from("1");

        store
            .update(&id, &EventPatch::new().with_title("Renamed"))
            .unwrap();
        assert_eq!(store.get(&id).unwrap().title, "Renamed");

        store.rollback(&id).unwrap();
        assert_eq!(store.get(&id).unwrap().title, "First");
    }

    #[test]
    fn test_second_mutation_on_same_id_is_rejected() {
        let mut store = loaded_store();
        let id = EventId::from("1");

        store
            .update(&id, &EventPatch::new().with_title("A"))
            .unwrap();
        let second = store.update(&id, &EventPatch::new().with_title("B"));

        assert_eq!(
            second,
            Err(StoreError::ConcurrentMutation {
                id: "1".to_string()
            })
        );
        assert!(matches!(
            store.remove(&id),
            Err(StoreError::ConcurrentMutation { .. })
        ));
        assert_eq!(store.get(&id).unwrap().title, "A");

        store.commit(&id, None).unwrap();
        store
            .update(&id, &EventPatch::new().with_title("B"))
            .unwrap();
        assert_eq!(store.get(&id).unwrap().title, "B");
    }

    #[test]
    fn test_remove_rollback_reinserts_at_original_position() {
        let mut store = loaded_store();
        let id = EventId::from("2");

        store.remove(&id).unwrap();
        assert_eq!(
            titles(&store.events_for_date(make_date(2024, 1, 15))),
            vec!["First"]
        );

        store.rollback(&id).unwrap();
        assert_eq!(
            titles(&store.events_for_date(make_date(2024, 1, 15))),
            vec!["First", "Second"]
        );
    }

    #[test]
    fn test_unknown_ids() {
        let mut store = loaded_store();
        let missing = EventId::from("404");

        assert!(matches!(
            store.update(&missing, &EventPatch::new().with_title("x")),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.remove(&missing),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.commit(&missing, None),
            Err(StoreError::NoPendingMutation { .. })
        ));
    }

    #[test]
    fn test_load_preserves_pending_mutations() {
        let mut store = loaded_store();
        let created = store
            .create(EventDraft::all_day("u", "Local", make_date(2024, 1, 15)))
            .unwrap();
        store
            .update(&EventId::from("1"), &EventPatch::new().with_title("Edited"))
            .unwrap();
        store.remove(&EventId::from("2")).unwrap();

        store.load(vec![
            remote("1", "First", make_date(2024, 1, 15)),
            remote("2", "Second", make_date(2024, 1, 15)),
        ]);

        assert_eq!(
            titles(&store.events_for_date(make_date(2024, 1, 15))),
            vec!["Edited", "Local"]
        );

        // Rolling back after the reload still restores the server state
        store.rollback(&EventId::from("2")).unwrap();
        store.rollback(&created.id).unwrap();
        assert_eq!(
            titles(&store.events_for_date(make_date(2024, 1, 15))),
            vec!["Edited", "Second"]
        );
    }

    #[test]
    fn test_reload_keeps_pending_creates_in_creation_order() {
        let mut store = loaded_store();
        let date = make_date(2024, 1, 20);
        for title in ["Alpha", "Bravo", "Charlie", "Delta"] {
            store.create(EventDraft::all_day("u", title, date)).unwrap();
        }

        store.load(vec![remote("3", "Third", date)]);

        assert_eq!(
            titles(&store.events_for_date(date)),
            vec!["Third", "Alpha", "Bravo", "Charlie", "Delta"]
        );
    }

    #[test]
    fn test_commit_after_reload_with_server_copy_keeps_ids_unique() {
        let mut store = loaded_store();
        let date = make_date(2024, 1, 15);
        let mutation = store
            .create(EventDraft::all_day("u", "Lunch", date))
            .unwrap();
        let server = store.get(&mutation.id).unwrap().clone().with_id("4");

        // The server stored the create before the reload answered
        store.load(vec![
            remote("1", "First", date),
            server.clone(),
            remote("2", "Second", date),
        ]);
        store.commit(&mutation.id, Some(server)).unwrap();

        let ids: Vec<String> = store.events().iter().map(|e| e.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "4", "2"]);
        assert!(store.get(&mutation.id).is_none());

        store.remove(&EventId::from("4")).unwrap();
        assert_eq!(titles(&store.events_for_date(date)), vec!["First", "Second"]);
    }

    #[test]
    fn test_events_in_range() {
        let store = loaded_store();
        let range = DateRange::new(make_date(2024, 1, 16), make_date(2024, 1, 31)).unwrap();

        assert_eq!(titles(&store.events_in_range(range)), vec!["Third"]);
    }
}
