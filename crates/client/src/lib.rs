//! daybook_client - schedule controller, remote sync and CLI host for daybook.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod offline;
pub mod output;
pub mod remote;
pub mod session;

pub use config::ClientConfig;
pub use controller::{LoadOutcome, ScheduleController, ScheduleError, ScheduleSnapshot};
pub use error::{RemoteError, Result};
pub use remote::{HttpRemote, InMemoryRemote, ScheduleRemote};
pub use session::{FileSession, MemorySession, Session, SessionProvider};
