use thiserror::Error;

use daybook_core::calendar::EventError;
use daybook_core::date::DateRangeError;
use daybook_core::store::StoreError;

use crate::error::RemoteError;

/// Outcome taxonomy reported by the controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Rejected before any network call.
    #[error(transparent)]
    Validation(#[from] EventError),

    #[error(transparent)]
    InvalidDate(#[from] DateRangeError),

    /// The host should send the user back to sign-in. Not retried.
    #[error("Session is missing or expired, please sign in again")]
    SessionInvalid,

    /// Network failure, timeout or non-2xx response. Local changes were rolled back.
    #[error("Failed to {operation}: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    /// Another change to the same event is still in flight.
    #[error("Event {id} already has a change in flight, retry once it settles")]
    ConcurrentMutation { id: String },

    #[error("Event not found: {id}")]
    NotFound { id: String },
}

impl ScheduleError {
    pub(crate) fn from_remote(operation: &'static str, err: RemoteError) -> Self {
        match err {
            RemoteError::SessionInvalid => ScheduleError::SessionInvalid,
            RemoteError::NotFound { resource } => ScheduleError::NotFound { id: resource },
            other => ScheduleError::Transport {
                operation,
                message: other.to_string(),
            },
        }
    }

    /// Returns true if the host should redirect to re-authentication.
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, ScheduleError::SessionInvalid)
    }
}

impl From<StoreError> for ScheduleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => ScheduleError::Validation(e),
            StoreError::ConcurrentMutation { id } => ScheduleError::ConcurrentMutation { id },
            StoreError::NotFound { id } | StoreError::NoPendingMutation { id } => {
                ScheduleError::NotFound { id }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_errors_keep_operation() {
        let err = ScheduleError::from_remote(
            "create event",
            RemoteError::Transport {
                status: Some(502),
                message: "bad gateway".to_string(),
            },
        );

        assert_eq!(
            err.to_string(),
            "Failed to create event: Server returned 502: bad gateway"
        );
        assert!(ScheduleError::from_remote("load events", RemoteError::SessionInvalid)
            .is_session_invalid());
    }

    #[test]
    fn test_remote_not_found_names_the_event() {
        let err = ScheduleError::from_remote(
            "update event",
            RemoteError::NotFound {
                resource: "42".to_string(),
            },
        );

        assert_eq!(err, ScheduleError::NotFound { id: "42".to_string() });
        assert_eq!(err.to_string(), "Event not found: 42");
    }

    #[test]
    fn test_decode_errors_are_transport() {
        let err = ScheduleError::from_remote(
            "load events",
            RemoteError::Decode("missing field `title`".to_string()),
        );

        assert_eq!(
            err.to_string(),
            "Failed to load events: Invalid response: missing field `title`"
        );
    }

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        assert_eq!(
            ScheduleError::from(StoreError::Validation(EventError::InvalidDateRange)),
            ScheduleError::Validation(EventError::InvalidDateRange)
        );
        assert_eq!(
            ScheduleError::from(StoreError::ConcurrentMutation {
                id: "5".to_string()
            }),
            ScheduleError::ConcurrentMutation {
                id: "5".to_string()
            }
        );
    }
}
