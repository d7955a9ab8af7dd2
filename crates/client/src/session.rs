//! SessionProvider: where the owner-scoping credential comes from.
//!
//! The engine treats the credential as opaque. It reads it before each
//! remote call and drops it when the remote store rejects it.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

/// Key holding the owner id in the session file.
const OWNER_KEY: &str = "owner_id";

/// Key holding the opaque credential in the session file.
const TOKEN_KEY: &str = "session_token";

/// An authenticated owner and its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub owner_id: String,
    pub token: String,
}

impl Session {
    pub fn new(owner_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            token: token.into(),
        }
    }
}

/// Capability for reading and invalidating the current session.
pub trait SessionProvider: Send + Sync {
    /// The current session, if one exists.
    fn session(&self) -> Option<Session>;

    /// Forgets the current session. Called when the remote store rejects it.
    fn invalidate(&self);
}

/// Session held in process memory.
#[derive(Debug, Default)]
pub struct MemorySession {
    inner: Mutex<Option<Session>>,
}

impl MemorySession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    /// A provider with no session.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(&self, session: Session) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }
}

impl SessionProvider for MemorySession {
    fn session(&self) -> Option<Session> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn invalidate(&self) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Session persisted in a small JSON key-value file.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `session` to the file, replacing any previous one.
    pub fn save(&self, session: &Session) -> std::io::Result<()> {
        let mut store = Map::new();
        store.insert(OWNER_KEY.to_string(), Value::from(session.owner_id.clone()));
        store.insert(TOKEN_KEY.to_string(), Value::from(session.token.clone()));

        let contents = serde_json::to_string_pretty(&Value::Object(store))?;
        std::fs::write(&self.path, contents)?;
        tracing::info!(path = %self.path.display(), owner_id = %session.owner_id, "Session saved");
        Ok(())
    }

    /// Removes the session file. A missing file is not an error.
    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn read(&self) -> Option<Session> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };

        let store: Map<String, Value> = match serde_json::from_str(&contents) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Malformed session file");
                return None;
            }
        };

        let owner_id = store.get(OWNER_KEY)?.as_str()?;
        let token = store.get(TOKEN_KEY)?.as_str()?;
        if owner_id.is_empty() || token.is_empty() {
            return None;
        }
        Some(Session::new(owner_id, token))
    }
}

impl SessionProvider for FileSession {
    fn session(&self) -> Option<Session> {
        self.read()
    }

    fn invalidate(&self) {
        if let Err(e) = self.clear() {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to clear session file");
        } else {
            tracing::info!("Session invalidated");
        }
    }
}
