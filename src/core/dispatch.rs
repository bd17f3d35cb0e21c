//! # The dispatcher: `emit` and the cooperative stop protocol.
//!
//! ## Dispatch flow
//! ```text
//! emit(name, args)
//!   │  resolve live binding list (absent/empty → false, or fatal for "error")
//!   │  snapshot args
//!   │  enter dispatch scope: save (active, stopped) markers, active = self
//!   ▼
//! loop over indices, re-reading list length each step
//!   │  fetch binding[i]
//!   │  once? → identity-remove it first (re-entrant listing won't see it)
//!   │  receiver = binding.context ?? self
//!   │  invoke: Listener → call(receiver, args)
//!   │          Delegate → delegate.emit(binding.event, args)
//!   │  stopped-for == self? → break
//!   ▼
//! scope drops: markers restored (also on error/unwind)
//! return Ok(true)   // "had listeners", not "all ran"
//! ```
//!
//! ## Markers
//! The active-emitter and stopped-for markers are thread-local slots shared
//! by every emission on the call stack. [`Emitter::stop_emit`] only succeeds
//! for the emitter currently marked active, which is what keeps nested
//! delegation honest: an inner emitter stopping itself can never halt the
//! outer dispatch, and vice versa.
//!
//! ## Live-length iteration
//! The loop re-reads the captured list's length on every step. Bindings a
//! handler appends during the emission are therefore visited when they land
//! beyond the current index (an at-least-once, possibly-more ordering
//! policy). Removals at or before the current index mid-emission are the
//! caller's to reason about — a known sharp edge, kept for compatibility.

use std::rc::Rc;

use tracing::trace;

use crate::bindings::{Context, Target};
use crate::error::EmitError;
use crate::events::{Args, EventName, ERROR};

use super::emitter::{Emitter, EmitterId};

thread_local! {
    /// Emitter currently dispatching on this thread, if any.
    static ACTIVE: std::cell::Cell<Option<EmitterId>> = const { std::cell::Cell::new(None) };
    /// Emitter whose in-progress emission has been asked to stop.
    static STOPPED: std::cell::Cell<Option<EmitterId>> = const { std::cell::Cell::new(None) };
}

/// Saved marker state for one `emit` frame.
///
/// Restores both markers on drop, so nested and failing emissions cannot
/// leak dispatch state into their callers.
struct DispatchScope {
    prev_active: Option<EmitterId>,
    prev_stopped: Option<EmitterId>,
}

impl DispatchScope {
    fn enter(id: EmitterId) -> Self {
        let prev_active = ACTIVE.with(|slot| slot.replace(Some(id)));
        let prev_stopped = STOPPED.with(|slot| slot.get());
        Self { prev_active, prev_stopped }
    }

    fn stopped_for(id: EmitterId) -> bool {
        STOPPED.with(|slot| slot.get()) == Some(id)
    }
}

impl Drop for DispatchScope {
    fn drop(&mut self) {
        ACTIVE.with(|slot| slot.set(self.prev_active));
        STOPPED.with(|slot| slot.set(self.prev_stopped));
    }
}

impl Emitter {
    /// Synchronously dispatches `event` to every binding filed under it, in
    /// insertion order, on the caller's own call stack.
    ///
    /// Returns `Ok(true)` if the event had at least one binding when
    /// dispatch began — even when a stop request skipped the rest — and
    /// `Ok(false)` if nothing was listening.
    ///
    /// # Errors
    /// - [`EmitError::Unhandled`] when `event` is `"error"` and nothing is
    ///   listening (unobserved error events are fatal);
    /// - [`EmitError::Listener`] when a listener fails; later bindings are
    ///   skipped for this emission, markers are still restored.
    ///
    /// ## Example
    /// ```rust
    /// use evoke::{Args, Emitter};
    ///
    /// let emitter = Emitter::new();
    /// assert!(!emitter.emit("tick", &Args::new())?); // nobody listening
    ///
    /// emitter.on("tick", |_cx, args| {
    ///     assert_eq!(args.get::<u32>(0), Some(&1));
    ///     Ok(())
    /// })?;
    /// assert!(emitter.emit("tick", &Args::new().with(1u32))?);
    /// # Ok::<(), evoke::EmitError>(())
    /// ```
    pub fn emit(&self, event: impl Into<EventName>, args: &Args) -> Result<bool, EmitError> {
        let event = event.into();
        self.emit_named(&event, args)
    }

    /// Dispatch by resolved name; delegation and the control-event
    /// notifications re-enter here.
    pub(crate) fn emit_named(&self, event: &EventName, args: &Args) -> Result<bool, EmitError> {
        let resolved = self.registry().borrow().lookup(event);
        let live = match resolved {
            Some(list) if !list.borrow().is_empty() => list,
            _ => {
                if event.is_named(ERROR) {
                    return Err(EmitError::unhandled(args));
                }
                return Ok(false);
            }
        };

        // One snapshot for the whole emission; listeners all see the same pack.
        let snapshot = args.clone();
        let _scope = DispatchScope::enter(self.id());

        let mut index = 0;
        loop {
            let binding = {
                let bindings = live.borrow();
                match bindings.get(index) {
                    Some(binding) => Rc::clone(binding),
                    None => break,
                }
            };

            // Once-bindings leave the registry before they run, so a
            // re-entrant listing never sees them and they are single-fire
            // even if the listener re-emits the same event.
            let removed_here = if binding.once() {
                self.remove_binding_from(event, &live, &binding)?
            } else {
                false
            };

            let receiver = match binding.context() {
                Some(context) => context.clone(),
                None => Context::emitter(self),
            };

            match binding.target() {
                Target::Listener(listener) => listener
                    .call(&receiver, &snapshot)
                    .map_err(|source| EmitError::listener(event, source))?,
                Target::Delegate(delegate) => {
                    delegate.emit_named(binding.event(), &snapshot)?;
                }
            }

            if DispatchScope::stopped_for(self.id()) {
                break;
            }
            // A removed once-binding already slid its successor into this
            // index; advancing would skip it.
            if !removed_here {
                index += 1;
            }
        }

        Ok(true)
    }

    /// Asks the emission currently in progress *for this emitter* to stop
    /// after the listener that is now running.
    ///
    /// Succeeds only when this emitter is the one currently dispatching;
    /// otherwise returns `false` and has no effect — an emitter cannot stop
    /// a dispatch it does not own, which matters under nested delegation.
    /// The request applies to the current emission only.
    pub fn stop_emit(&self) -> bool {
        let active = ACTIVE.with(|slot| slot.get());
        if active == Some(self.id()) {
            STOPPED.with(|slot| slot.set(Some(self.id())));
            true
        } else {
            trace!(
                emitter = self.id().value(),
                "stop_emit denied: not the active emitter"
            );
            false
        }
    }
}
