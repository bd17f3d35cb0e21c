//! Emitter core: registry surface and dispatch engine.
//!
//! The only public API from this module is [`Emitter`] (and its identity,
//! [`EmitterId`]).
//!
//! Internal modules:
//! - [`emitter`]: the handle, registration/removal/listing, delegation;
//! - [`registry`]: shared live binding lists keyed by event name;
//! - [`dispatch`]: the `emit` loop, thread-local dispatch markers and the
//!   cooperative stop protocol.

mod dispatch;
mod emitter;
mod registry;

pub use emitter::{Emitter, EmitterId};
