//! Binding model: what gets filed in an emitter's registry.
//!
//! - [`Listener`] shared closure handle (identity-matched removal);
//! - [`Context`] receiver override for a binding;
//! - [`Target`] tagged variant over listener vs. delegate-emitter;
//! - [`Binding`] the stored `(event, target, context, once)` tuple.

mod binding;
mod target;

pub use binding::Binding;
pub use target::{Context, Listener, ListenerFn, Target};
