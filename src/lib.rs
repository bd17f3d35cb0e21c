//! # evoke
//!
//! **Evoke** is a synchronous, in-process event emitter for Rust.
//!
//! It provides the foundational publish/subscribe primitive other components
//! build upon (state changes, lifecycle hooks, delegation chains): objects
//! register named-event listeners and later trigger synchronous dispatch of
//! those listeners with arbitrary arguments, on the caller's own call stack.
//!
//! ## Architecture
//! ```text
//!     register / register_once / delegate            emit(name, args)
//!                  │                                       │
//!                  ▼                                       ▼
//! ┌───────────────────────────────────────┐   ┌──────────────────────────────┐
//! │  Registry (per emitter)               │   │  Dispatcher                  │
//! │  event name ──► [Binding, Binding, …] │◄──│  - captures live list        │
//! │  (insertion order = dispatch order)   │   │  - snapshots args            │
//! │  max-listeners hint (diagnostic)      │   │  - iterates by live length   │
//! └───────────────────────────────────────┘   │  - once: remove-then-invoke  │
//!                  ▲                          │  - honors stop_emit()        │
//!     "newListener" / "removeListener"        └──────────────┬───────────────┘
//!      control notifications                                 │
//!                                             thread-local dispatch markers
//!                                             (active emitter / stopped-for)
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types               |
//! |-----------------|--------------------------------------------------------------|-------------------------|
//! | **Registry**    | Ordered, identity-matched listener bindings per event name.  | [`Emitter`], [`Binding`]|
//! | **Dispatch**    | Synchronous, in-order, re-entrant emission with live lists.  | [`Emitter::emit`]       |
//! | **Stop**        | Cooperative halt of the in-progress emission, nesting-safe.  | [`Emitter::stop_emit`]  |
//! | **Delegation**  | Wire one emitter as another's target, with event renaming.   | [`Emitter::delegate_as`]|
//! | **Arguments**   | Heterogeneous, snapshot-per-emission argument packs.         | [`Args`], [`Payload`]   |
//! | **Errors**      | Fatal unobserved `error` events, listener failures.          | [`EmitError`]           |
//!
//! ## Reserved event names
//! - [`NEW_LISTENER`] fires *before* a binding is appended;
//! - [`REMOVE_LISTENER`] fires *after* a binding is removed;
//! - [`ERROR`] is fatal when emitted with nothing listening.
//!
//! ## Re-entrancy model
//! There is no parallelism and no suspension point: `emit` runs every
//! listener to completion, in sequence, before returning. "Concurrency" here
//! means re-entrancy — a listener may itself emit (same or different
//! emitter), register or unregister bindings, or request a stop. The only
//! state shared across nested emissions is a pair of thread-local dispatch
//! markers, saved and restored per `emit` frame on every exit path.
//! `Emitter` is a single-threaded handle (`!Send`); use one per thread.
//!
//! ## Example
//! ```rust
//! use evoke::{Args, Emitter};
//!
//! let emitter = Emitter::new();
//!
//! // `on` wraps the closure and returns the handle used for removal.
//! let greet = emitter.on("greet", |receiver, args| {
//!     let who = args.get::<&'static str>(0).copied().unwrap_or("world");
//!     assert!(receiver.as_emitter().is_some()); // default receiver = the emitter
//!     println!("hello, {who}");
//!     Ok(())
//! })?;
//!
//! assert!(emitter.emit("greet", &Args::new().with("rust"))?);
//!
//! emitter.unregister("greet", greet)?;
//! assert!(!emitter.emit("greet", &Args::new())?);
//! # Ok::<(), evoke::EmitError>(())
//! ```

mod bindings;
mod core;
mod error;
mod events;

// ---- Public re-exports ----

pub use bindings::{Binding, Context, Listener, ListenerFn, Target};
pub use core::{Emitter, EmitterId};
pub use error::{BoxError, EmitError};
pub use events::{Args, EventName, Payload, ERROR, NEW_LISTENER, REMOVE_LISTENER};
