use thiserror::Error;

use crate::calendar::EventError;

/// Errors raised by the in-memory event store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Event not found: {id}")]
    NotFound { id: String },
    #[error("Event {id} already has a mutation in flight")]
    ConcurrentMutation { id: String },
    #[error("No pending mutation for event {id}")]
    NoPendingMutation { id: String },
    #[error(transparent)]
    Validation(#[from] EventError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
