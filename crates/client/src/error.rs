//! Remote store error types.

use thiserror::Error;

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Normalized failures from a remote schedule store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The credential was rejected (HTTP 401) or no session exists.
    #[error("Session is missing or no longer valid")]
    SessionInvalid,

    /// Network failure, timeout or non-2xx response. `status` is `None` when
    /// no response arrived at all.
    #[error("{}", transport_message(*status, message))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },
}

fn transport_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Server returned {status}: {message}"),
        None => format!("Request failed: {message}"),
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return RemoteError::Decode(err.to_string());
        }
        RemoteError::Transport {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display() {
        let with_status = RemoteError::Transport {
            status: Some(503),
            message: "unavailable".to_string(),
        };
        let without_status = RemoteError::Transport {
            status: None,
            message: "connection refused".to_string(),
        };

        assert_eq!(with_status.to_string(), "Server returned 503: unavailable");
        assert_eq!(
            without_status.to_string(),
            "Request failed: connection refused"
        );
    }

    #[test]
    fn test_json_error_is_decode() {
        let err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(matches!(RemoteError::from(err), RemoteError::Decode(_)));
    }
}
