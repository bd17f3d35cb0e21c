//! Event data model: names and dispatch arguments.
//!
//! This module groups what an emission *is made of*, independent of any
//! particular emitter:
//! - [`EventName`] the registry key (string or numeric tag), plus the three
//!   reserved control names;
//! - [`Args`] / [`Payload`] the argument pack snapshotted per emission.
//!
//! See `core/mod.rs` for how the dispatcher consumes these.

mod args;
mod name;

pub use args::{Args, Payload};
pub use name::{EventName, ERROR, NEW_LISTENER, REMOVE_LISTENER};
