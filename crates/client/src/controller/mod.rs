//! ScheduleController: the long-lived state machine behind one calendar view.
//!
//! Every host action goes through here. Reads are served from the in-memory
//! [`EventStore`]; mutations are applied optimistically and then confirmed or
//! rolled back once the remote store answers. The state lock is never held
//! across a remote call, so the controller keeps accepting actions while a
//! load or mutation is outstanding.

mod error;
mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::{watch, RwLock};

use daybook_core::calendar::{Category, EventDraft, EventId, EventPatch, ScheduleEvent};
use daybook_core::date::DateRange;
use daybook_core::grid::{
    fetch_window, navigate, project, CalendarGrid, CalendarView, Direction, GridContext,
    GridOptions,
};
use daybook_core::store::{EventStore, MutationState};

use crate::remote::{FetchQuery, ScheduleRemote};
use crate::session::SessionProvider;

pub use error::ScheduleError;
pub use state::{LoadOutcome, ScheduleSnapshot, ScheduleState};

/// Result type alias for controller actions.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Source of "today" for the controller.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

struct Inner {
    state: ScheduleState,
    store: EventStore,
    /// Window and filter of the most recent load, cleared when it fails.
    requested: Option<WindowKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowKey {
    range: DateRange,
    category: Option<Category>,
}

impl WindowKey {
    fn of(state: &ScheduleState) -> Self {
        Self {
            range: fetch_window(state.view, state.current_date),
            category: state.category_filter,
        }
    }
}

/// Coordinates the event store, the remote store and the view state.
pub struct ScheduleController<R> {
    remote: R,
    session: Arc<dyn SessionProvider>,
    options: GridOptions,
    clock: Clock,
    inner: RwLock<Inner>,
    load_seq: AtomicU64,
    snapshots: watch::Sender<ScheduleSnapshot>,
}

impl<R: ScheduleRemote> ScheduleController<R> {
    /// Creates a controller anchored on today in month view.
    pub fn new(remote: R, session: Arc<dyn SessionProvider>) -> Self {
        let clock: Clock = Arc::new(|| Local::now().date_naive());
        let state = ScheduleState::new(clock());
        let (snapshots, _) = watch::channel(ScheduleSnapshot {
            state: state.clone(),
            events: Vec::new(),
        });

        Self {
            remote,
            session,
            options: GridOptions::default(),
            clock,
            inner: RwLock::new(Inner {
                state,
                store: EventStore::new(),
                requested: None,
            }),
            load_seq: AtomicU64::new(0),
            snapshots,
        }
    }

    pub fn with_options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the clock and re-anchors the view on its "today".
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        let today = (self.clock)();
        let inner = self.inner.get_mut();
        inner.state.current_date = today;
        self.snapshots.send_replace(snapshot_of(inner));
        self
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Fetches the window for the current view and anchor and replaces the
    /// working set with it.
    ///
    /// Only the most recently started load may apply its response. Earlier
    /// loads finishing later return [`LoadOutcome::Superseded`]. A failed load
    /// keeps the previous window's data in place.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let seq = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let WindowKey { range, category } = {
            let mut inner = self.inner.write().await;
            let key = WindowKey::of(&inner.state);
            inner.requested = Some(key);
            inner.state.is_loading = true;
            self.publish(&inner);
            key
        };

        tracing::debug!(seq, start = %range.start, end = %range.end, "Loading window");
        let result = match self.owner_id() {
            Ok(owner_id) => {
                let query = FetchQuery::new(owner_id, range).with_category(category);
                self.remote
                    .fetch(&query)
                    .await
                    .map_err(|e| ScheduleError::from_remote("load events", e))
            }
            Err(e) => Err(e),
        };

        let mut inner = self.inner.write().await;
        if seq != self.load_seq.load(Ordering::SeqCst) {
            tracing::debug!(seq, "Discarding superseded load");
            return Ok(LoadOutcome::Superseded);
        }

        inner.state.is_loading = false;
        match result {
            Ok(events) => {
                inner.store.load(events);
                inner.state.error = None;
                let count = inner.store.len();
                self.publish(&inner);
                tracing::info!(seq, count, "Window loaded");
                Ok(LoadOutcome::Loaded { count })
            }
            Err(err) => {
                inner.requested = None;
                inner.state.error = Some(err.to_string());
                self.publish(&inner);
                tracing::warn!(seq, error = %err, "Window load failed, keeping previous data");
                Err(err)
            }
        }
    }

    /// Switches the view, keeping the anchor date, and reloads if the
    /// window changed.
    pub async fn set_view(&self, view: CalendarView) -> Result<Option<LoadOutcome>> {
        self.update_state(|state| state.view = view).await;
        self.reload_if_moved().await
    }

    /// Moves the anchor and reloads if the window changed.
    pub async fn set_current_date(&self, date: NaiveDate) -> Result<Option<LoadOutcome>> {
        self.update_state(|state| state.current_date = date).await;
        self.reload_if_moved().await
    }

    /// Sets view and anchor together with at most one reload.
    pub async fn go_to(&self, view: CalendarView, date: NaiveDate) -> Result<Option<LoadOutcome>> {
        self.update_state(|state| {
            state.view = view;
            state.current_date = date;
        })
        .await;
        self.reload_if_moved().await
    }

    pub async fn select_date(&self, date: Option<NaiveDate>) {
        self.update_state(|state| state.selected_date = date).await;
    }

    /// Restricts loads and grids to one category. Takes effect on the next
    /// load or navigation.
    pub async fn set_category_filter(&self, category: Option<Category>) {
        self.update_state(|state| state.category_filter = category)
            .await;
    }

    /// Moves the anchor to today, reloads if needed, and returns it.
    pub async fn navigate_today(&self) -> Result<NaiveDate> {
        let today = (self.clock)();
        self.set_current_date(today).await?;
        Ok(today)
    }

    /// Moves the anchor back one unit of the active view and returns it.
    pub async fn navigate_previous(&self) -> Result<NaiveDate> {
        self.step(Direction::Previous).await
    }

    /// Moves the anchor forward one unit of the active view and returns it.
    pub async fn navigate_next(&self) -> Result<NaiveDate> {
        self.step(Direction::Next).await
    }

    /// Inserts `draft` optimistically and creates it on the remote store.
    ///
    /// A draft without an owner is assigned to the signed-in owner. Invalid
    /// drafts fail with [`ScheduleError::Validation`] before any network call.
    pub async fn add_event(&self, mut draft: EventDraft) -> Result<ScheduleEvent> {
        if draft.owner_id.trim().is_empty() {
            if let Some(session) = self.session.session() {
                draft.owner_id = session.owner_id;
            }
        }

        let local_id = {
            let mut inner = self.inner.write().await;
            let mutation = inner.store.create(draft.clone())?;
            self.publish(&inner);
            mutation.id
        };

        tracing::debug!(event_id = %local_id, "Creating event");
        match self.remote.create(&draft).await {
            Ok(server) => {
                let mut inner = self.inner.write().await;
                inner.store.commit(&local_id, Some(server.clone()))?;
                self.publish(&inner);
                tracing::info!(event_id = %server.id, "Event created");
                Ok(server)
            }
            Err(e) => {
                let err = ScheduleError::from_remote("create event", e);
                self.roll_back(&local_id, &err).await;
                Err(err)
            }
        }
    }

    /// Applies `patch` optimistically and sends the merged event to the remote store.
    pub async fn update_event(&self, id: &EventId, patch: EventPatch) -> Result<ScheduleEvent> {
        let updated = {
            let mut inner = self.inner.write().await;
            inner.store.update(id, &patch)?;
            self.publish(&inner);
            inner.store.get(id).cloned()
        };

        let (Some(updated), Some(remote_id)) = (updated, id.as_remote()) else {
            let err = ScheduleError::NotFound { id: id.to_string() };
            self.roll_back(id, &err).await;
            return Err(err);
        };

        tracing::debug!(event_id = %id, "Updating event");
        match self.remote.update(remote_id, &updated).await {
            Ok(server) => {
                let mut inner = self.inner.write().await;
                inner.store.commit(id, Some(server.clone()))?;
                if inner.state.selected_event.as_ref().is_some_and(|e| &e.id == id) {
                    inner.state.selected_event = Some(server.clone());
                }
                self.publish(&inner);
                tracing::info!(event_id = %id, "Event updated");
                Ok(server)
            }
            Err(e) => {
                let err = ScheduleError::from_remote("update event", e);
                self.roll_back(id, &err).await;
                Err(err)
            }
        }
    }

    /// Removes the event optimistically and soft-deletes it on the remote store.
    pub async fn delete_event(&self, id: &EventId) -> Result<()> {
        {
            let mut inner = self.inner.write().await;
            inner.store.remove(id)?;
            self.publish(&inner);
        }

        let Some(remote_id) = id.as_remote() else {
            let err = ScheduleError::NotFound { id: id.to_string() };
            self.roll_back(id, &err).await;
            return Err(err);
        };

        tracing::debug!(event_id = %id, "Deleting event");
        match self.remote.delete(remote_id).await {
            Ok(()) => {
                let mut inner = self.inner.write().await;
                inner.store.commit(id, None)?;
                if inner.state.selected_event.as_ref().is_some_and(|e| &e.id == id) {
                    inner.state.selected_event = None;
                    inner.state.is_event_modal_open = false;
                }
                self.publish(&inner);
                tracing::info!(event_id = %id, "Event deleted");
                Ok(())
            }
            Err(e) => {
                let err = ScheduleError::from_remote("delete event", e);
                self.roll_back(id, &err).await;
                Err(err)
            }
        }
    }

    /// Events active on `date`, recurrences included, in insertion order.
    pub async fn events_for_date(&self, date: NaiveDate) -> Vec<ScheduleEvent> {
        let inner = self.inner.read().await;
        inner
            .store
            .events_for_date(date)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Events whose nominal start falls in the month.
    pub async fn events_for_month(&self, year: i32, month: u32) -> Result<Vec<ScheduleEvent>> {
        let inner = self.inner.read().await;
        Ok(inner
            .store
            .events_for_month(year, month)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Projects the working set into the grid for the current view and anchor.
    pub async fn grid(&self) -> CalendarGrid {
        let inner = self.inner.read().await;
        let context = GridContext::new((self.clock)())
            .with_selected(inner.state.selected_date)
            .with_category(inner.state.category_filter);

        project(
            inner.state.view,
            inner.state.current_date,
            &context,
            &inner.store,
            &self.options,
        )
    }

    /// Opens the event modal, for `event` or for a new event when `None`.
    pub async fn open_event_modal(&self, event: Option<ScheduleEvent>) {
        self.update_state(|state| {
            state.selected_event = event;
            state.is_event_modal_open = true;
        })
        .await;
    }

    pub async fn close_event_modal(&self) {
        self.update_state(|state| {
            state.selected_event = None;
            state.is_event_modal_open = false;
        })
        .await;
    }

    /// State of the in-flight mutation on `id`, if any.
    pub async fn pending_state(&self, id: &EventId) -> Option<MutationState> {
        self.inner.read().await.store.pending_state(id)
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> ScheduleSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receives a new snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ScheduleSnapshot> {
        self.snapshots.subscribe()
    }

    fn owner_id(&self) -> Result<String> {
        self.session
            .session()
            .map(|session| session.owner_id)
            .ok_or(ScheduleError::SessionInvalid)
    }

    async fn step(&self, direction: Direction) -> Result<NaiveDate> {
        let date = {
            let mut inner = self.inner.write().await;
            let view = inner.state.view;
            let anchor = inner.state.current_date;

            match navigate(view, anchor, direction) {
                Some(date) => {
                    inner.state.current_date = date;
                    self.publish(&inner);
                    date
                }
                None => {
                    tracing::warn!(%anchor, ?direction, "Navigation out of supported date range");
                    anchor
                }
            }
        };

        self.reload_if_moved().await?;
        Ok(date)
    }

    /// Loads when the current window or filter differs from the last load.
    async fn reload_if_moved(&self) -> Result<Option<LoadOutcome>> {
        let moved = {
            let inner = self.inner.read().await;
            inner.requested != Some(WindowKey::of(&inner.state))
        };
        if !moved {
            return Ok(None);
        }
        self.load().await.map(Some)
    }

    async fn roll_back(&self, id: &EventId, err: &ScheduleError) {
        let mut inner = self.inner.write().await;
        if let Err(e) = inner.store.rollback(id) {
            tracing::error!(event_id = %id, error = %e, "Rollback failed");
        }
        inner.state.error = Some(err.to_string());
        self.publish(&inner);
        tracing::warn!(event_id = %id, error = %err, "Change rolled back");
    }

    async fn update_state<F>(&self, change: F)
    where
        F: FnOnce(&mut ScheduleState),
    {
        let mut inner = self.inner.write().await;
        change(&mut inner.state);
        self.publish(&inner);
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(snapshot_of(inner));
    }
}

fn snapshot_of(inner: &Inner) -> ScheduleSnapshot {
    ScheduleSnapshot {
        state: inner.state.clone(),
        events: inner.store.events().to_vec(),
    }
}
