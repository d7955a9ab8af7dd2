//! Functional core of the daybook calendar engine.
//!
//! Everything in this crate is pure: no I/O, no clocks, no async. The client
//! crate wraps it with the remote store, the session and the controller.

pub mod calendar;
pub mod date;
pub mod grid;
pub mod recurrence;
pub mod serde;
pub mod store;
