use crate::calendar::{EventId, ScheduleEvent};

/// Lifecycle of an optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Applied locally, waiting for the remote store.
    Pending,
    /// Confirmed by the remote store.
    Committed,
    /// Undone after the remote store refused it.
    RolledBack,
}

/// What was changed, with enough of the prior state to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update { previous: ScheduleEvent },
    Remove { previous: ScheduleEvent, position: usize },
}

impl MutationKind {
    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update { .. } => "update",
            MutationKind::Remove { .. } => "remove",
        }
    }
}

/// One optimistic mutation on one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub id: EventId,
    pub kind: MutationKind,
    pub state: MutationState,
}

impl Mutation {
    pub(crate) fn pending(id: EventId, kind: MutationKind) -> Self {
        Self {
            id,
            kind,
            state: MutationState::Pending,
        }
    }

    pub(crate) fn resolve(mut self, state: MutationState) -> Self {
        self.state = state;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.state == MutationState::Pending
    }
}
