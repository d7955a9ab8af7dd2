//! File-backed offline store.
//!
//! Offline mode runs the controller against an [`InMemoryRemote`] seeded from
//! a JSON file of wire events and writes the remote back when the command is
//! done. The file uses the same schema as the remote store.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::error::RemoteError;
use crate::remote::wire::WireEvent;
use crate::remote::InMemoryRemote;
use daybook_core::calendar::ScheduleEvent;

/// Errors reading or writing the offline file.
#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("Offline file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Offline file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Offline file holds an invalid event: {0}")]
    Event(#[from] RemoteError),
}

/// Opens the offline store at `path`. A missing file is an empty store.
pub fn open(path: &Path) -> Result<InMemoryRemote, OfflineError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No offline file yet, starting empty");
            return Ok(InMemoryRemote::new());
        }
        Err(e) => return Err(e.into()),
    };

    let wire: Vec<WireEvent> = serde_json::from_str(&raw)?;
    let events = wire
        .into_iter()
        .map(ScheduleEvent::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(path = %path.display(), count = events.len(), "Opened offline store");
    Ok(InMemoryRemote::with_events(events))
}

/// Writes every event of `remote`, soft-deleted ones included, to `path`.
pub async fn save(path: &Path, remote: &InMemoryRemote) -> Result<(), OfflineError> {
    let wire: Vec<WireEvent> = remote.all().await.iter().map(WireEvent::from).collect();
    let json = serde_json::to_string_pretty(&wire)?;
    tokio::fs::write(path, json).await?;

    tracing::debug!(path = %path.display(), count = wire.len(), "Saved offline store");
    Ok(())
}
