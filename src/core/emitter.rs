//! # The emitter: registry surface.
//!
//! [`Emitter`] owns a per-instance registry of named binding lists and the
//! registration/removal/listing API over it. The dispatch side (`emit`,
//! `stop_emit`) lives in `core/dispatch.rs`.
//!
//! An `Emitter` is a cheap-clone handle: clones share one registry, and
//! identity (what delegation targets and the dispatch markers compare) is
//! handle identity, exposed as [`EmitterId`].
//!
//! ## Control events
//! - `"newListener"` fires *before* a binding is appended, with
//!   `(event, target, context)` — its handlers never observe the binding
//!   they are being notified about;
//! - `"removeListener"` fires *after* a binding is removed, with
//!   `(event, target)`, once per removed binding.
//!
//! ## Re-entrancy
//! Every method takes `&self`; listeners running inside a dispatch may
//! register, unregister, list and emit on the same emitter. No registry
//! borrow is ever held across a listener invocation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::warn;

use crate::bindings::{Binding, Context, Listener, Target};
use crate::error::{BoxError, EmitError};
use crate::events::{Args, EventName, NEW_LISTENER, REMOVE_LISTENER};

use super::registry::{BindingList, Registry};

/// Global sequence counter for emitter identity.
static EMITTER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of an emitter handle family.
///
/// All clones of one [`Emitter`] share the same id; two separately created
/// emitters never do. The dispatch markers compare these.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EmitterId(u64);

impl EmitterId {
    fn next() -> Self {
        Self(EMITTER_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value (for logs).
    pub fn value(self) -> u64 {
        self.0
    }
}

struct Inner {
    id: EmitterId,
    registry: RefCell<Registry>,
}

/// Named listener registry with synchronous, in-order dispatch.
///
/// See the crate root for the full model. Registration methods return
/// `Result<&Self, _>` so calls chain with `?`:
///
/// ```rust
/// use evoke::{Emitter, Listener};
///
/// let emitter = Emitter::new();
/// emitter
///     .register("open", Listener::new(|_cx, _args| Ok(())))?
///     .register("close", Listener::new(|_cx, _args| Ok(())))?;
/// # Ok::<(), evoke::EmitError>(())
/// ```
pub struct Emitter {
    inner: Rc<Inner>,
}

impl Emitter {
    /// Creates an emitter with an empty registry and the default
    /// max-listeners hint (10).
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                id: EmitterId::next(),
                registry: RefCell::new(Registry::new()),
            }),
        }
    }

    /// Identity of this handle family.
    pub fn id(&self) -> EmitterId {
        self.inner.id
    }

    /// True if `other` is a clone of this emitter.
    pub fn same_as(&self, other: &Emitter) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn registry(&self) -> &RefCell<Registry> {
        &self.inner.registry
    }

    // ---- Registration ----

    /// Files a binding for `event` with no receiver override.
    ///
    /// If `"newListener"` has bindings, that event fires synchronously
    /// *before* the new binding is appended.
    #[doc(alias = "addListener")]
    pub fn register(
        &self,
        event: impl Into<EventName>,
        target: impl Into<Target>,
    ) -> Result<&Self, EmitError> {
        let event = event.into();
        let binding = Binding::new(event.clone(), target.into(), None, false);
        self.file(event, binding)
    }

    /// Like [`Emitter::register`], with an explicit receiver.
    ///
    /// A context that is the owning emitter itself is normalized to "no
    /// override", keeping receiver resolution a single branch at dispatch.
    pub fn register_with(
        &self,
        event: impl Into<EventName>,
        target: impl Into<Target>,
        context: Context,
    ) -> Result<&Self, EmitError> {
        let event = event.into();
        let context = self.normalize_context(Some(context));
        let binding = Binding::new(event.clone(), target.into(), context, false);
        self.file(event, binding)
    }

    /// Files a binding that is removed immediately before its first
    /// invocation, so it fires at most once and is absent from any listing
    /// made during that invocation.
    pub fn register_once(
        &self,
        event: impl Into<EventName>,
        target: impl Into<Target>,
    ) -> Result<&Self, EmitError> {
        let event = event.into();
        let binding = Binding::new(event.clone(), target.into(), None, true);
        self.file(event, binding)
    }

    /// [`Emitter::register_once`] with an explicit receiver.
    pub fn register_once_with(
        &self,
        event: impl Into<EventName>,
        target: impl Into<Target>,
        context: Context,
    ) -> Result<&Self, EmitError> {
        let event = event.into();
        let context = self.normalize_context(Some(context));
        let binding = Binding::new(event.clone(), target.into(), context, true);
        self.file(event, binding)
    }

    /// Convenience: wraps `f` into a [`Listener`], registers it, and returns
    /// the handle so the caller can unregister later.
    pub fn on(
        &self,
        event: impl Into<EventName>,
        f: impl Fn(&Context, &Args) -> Result<(), BoxError> + 'static,
    ) -> Result<Listener, EmitError> {
        let listener = Listener::new(f);
        self.register(event, listener.clone())?;
        Ok(listener)
    }

    /// Convenience: once-variant of [`Emitter::on`].
    pub fn once(
        &self,
        event: impl Into<EventName>,
        f: impl Fn(&Context, &Args) -> Result<(), BoxError> + 'static,
    ) -> Result<Listener, EmitError> {
        let listener = Listener::new(f);
        self.register_once(event, listener.clone())?;
        Ok(listener)
    }

    // ---- Removal ----

    /// Removes the newest binding for `event` whose target is identical to
    /// `target` (at most one per call). No match is a no-op, not an error.
    ///
    /// If the list becomes empty its key is deleted, and if
    /// `"removeListener"` has bindings that event fires with
    /// `(event, target)` after the removal.
    #[doc(alias = "removeListener")]
    pub fn unregister(
        &self,
        event: impl Into<EventName>,
        target: impl Into<Target>,
    ) -> Result<&Self, EmitError> {
        let event = event.into();
        let target = target.into();
        let list = match self.inner.registry.borrow().lookup(&event) {
            Some(list) => list,
            None => return Ok(self),
        };
        self.remove_matching(&event, &list, |b| b.target().same_as(&target))?;
        Ok(self)
    }

    /// Removes a specific binding, matched by handle identity.
    pub fn unregister_binding(
        &self,
        event: impl Into<EventName>,
        binding: &Rc<Binding>,
    ) -> Result<&Self, EmitError> {
        let event = event.into();
        let list = match self.inner.registry.borrow().lookup(&event) {
            Some(list) => list,
            None => return Ok(self),
        };
        self.remove_binding_from(&event, &list, binding)?;
        Ok(self)
    }

    /// Removes every binding for every event.
    ///
    /// Fast path: with nothing listening on `"removeListener"`, the whole
    /// registry is simply cleared. Otherwise every other event is drained
    /// binding by binding — firing per-binding `"removeListener"`
    /// notifications — and `"removeListener"`'s own bindings go last,
    /// silently.
    #[doc(alias = "removeAllListeners")]
    pub fn unregister_all(&self) -> Result<&Self, EmitError> {
        let control = EventName::named(REMOVE_LISTENER);
        if !self.inner.registry.borrow().has(&control) {
            self.inner.registry.borrow_mut().clear();
            return Ok(self);
        }
        let names = self.inner.registry.borrow().names();
        for name in names.iter().filter(|n| !n.is_named(REMOVE_LISTENER)) {
            self.drain_event(name)?;
        }
        self.inner.registry.borrow_mut().clear();
        Ok(self)
    }

    /// Removes every binding for one event, individually, so
    /// `"removeListener"` notifications fire once per removed binding.
    pub fn unregister_event(&self, event: impl Into<EventName>) -> Result<&Self, EmitError> {
        let event = event.into();
        self.drain_event(&event)?;
        Ok(self)
    }

    // ---- Introspection ----

    /// Snapshot of the bindings filed under `event`, in dispatch order.
    ///
    /// Lazily creates the named slot if absent. The snapshot does not track
    /// later registry mutation; handles stay valid for identity-based
    /// removal.
    #[doc(alias = "listeners")]
    pub fn bindings(&self, event: impl Into<EventName>) -> Vec<Rc<Binding>> {
        let event = event.into();
        let list = self.inner.registry.borrow_mut().slot(&event);
        let snapshot = list.borrow().clone();
        snapshot
    }

    /// Event names currently present in the registry.
    pub fn event_names(&self) -> Vec<EventName> {
        self.inner.registry.borrow().names()
    }

    /// Number of bindings `emitter` holds for `event`.
    ///
    /// Returns 0 when no emitter is given or the event has no bindings.
    #[doc(alias = "listenerCount")]
    pub fn count_bindings(emitter: Option<&Emitter>, event: impl Into<EventName>) -> usize {
        let Some(emitter) = emitter else { return 0 };
        let event = event.into();
        emitter
            .inner
            .registry
            .borrow()
            .lookup(&event)
            .map_or(0, |list| list.borrow().len())
    }

    // ---- Delegation ----

    /// Registers `target` so that emitting `event` here re-emits it on the
    /// delegate under the same name. Sugar over [`Emitter::register`].
    ///
    /// Delegation cycles are the caller's responsibility.
    pub fn delegate(
        &self,
        event: impl Into<EventName>,
        target: impl Into<Target>,
    ) -> Result<&Self, EmitError> {
        self.register(event, target)
    }

    /// Like [`Emitter::delegate`], but the delegate receives `alias` instead
    /// of `event` — event renaming across a forwarding chain. An alias equal
    /// to the source name collapses to plain forwarding.
    pub fn delegate_as(
        &self,
        event: impl Into<EventName>,
        alias: impl Into<EventName>,
        target: impl Into<Target>,
    ) -> Result<&Self, EmitError> {
        let event = event.into();
        let alias = alias.into();
        if alias == event {
            return self.register(event, target);
        }
        let binding = Binding::new(alias, target.into(), None, false);
        self.file(event, binding)
    }

    // ---- Max-listeners hint ----

    /// Sets the diagnostic listener-count hint for this emitter.
    ///
    /// Exceeding the hint logs a one-shot warning per event name; it never
    /// rejects a registration. Zero disables the diagnostic.
    pub fn set_max_listeners_hint(&self, hint: usize) -> &Self {
        self.inner.registry.borrow_mut().set_max_hint(hint);
        self
    }

    /// Current value of the listener-count hint (default 10).
    pub fn max_listeners_hint(&self) -> usize {
        self.inner.registry.borrow().max_hint()
    }

    // ---- Internals shared with the dispatcher ----

    /// Appends `binding` under `event`, firing the `"newListener"`
    /// pre-notification first.
    fn file(&self, event: EventName, binding: Rc<Binding>) -> Result<&Self, EmitError> {
        self.notify_new(&event, &binding)?;
        let mut registry = self.inner.registry.borrow_mut();
        let list = registry.slot(&event);
        list.borrow_mut().push(binding);
        let len = list.borrow().len();
        if registry.should_warn(&event, len) {
            warn!(
                event = %event,
                listeners = len,
                hint = registry.max_hint(),
                "listener count exceeds the max-listeners hint"
            );
        }
        Ok(self)
    }

    /// Removes the newest binding in `list` matching `pred`; on removal,
    /// drops an emptied key and fires the `"removeListener"` notification.
    fn remove_matching(
        &self,
        event: &EventName,
        list: &BindingList,
        pred: impl Fn(&Rc<Binding>) -> bool,
    ) -> Result<Option<Rc<Binding>>, EmitError> {
        let removed = {
            let mut bindings = list.borrow_mut();
            bindings
                .iter()
                .rposition(|b| pred(b))
                .map(|pos| bindings.remove(pos))
        };
        if let Some(binding) = &removed {
            self.inner.registry.borrow_mut().drop_if_empty(event, list);
            self.notify_removed(event, binding.target().clone())?;
        }
        Ok(removed)
    }

    /// Identity removal against a specific list (the dispatcher passes the
    /// list it captured at emit time, not whatever the key maps to now).
    pub(crate) fn remove_binding_from(
        &self,
        event: &EventName,
        list: &BindingList,
        binding: &Rc<Binding>,
    ) -> Result<bool, EmitError> {
        let removed = self.remove_matching(event, list, |b| Rc::ptr_eq(b, binding))?;
        Ok(removed.is_some())
    }

    fn drain_event(&self, event: &EventName) -> Result<(), EmitError> {
        loop {
            let list = match self.inner.registry.borrow().lookup(event) {
                Some(list) => list,
                None => return Ok(()),
            };
            if self.remove_matching(event, &list, |_| true)?.is_none() {
                return Ok(());
            }
        }
    }

    fn notify_new(&self, event: &EventName, binding: &Rc<Binding>) -> Result<(), EmitError> {
        let control = EventName::named(NEW_LISTENER);
        if !self.inner.registry.borrow().has(&control) {
            return Ok(());
        }
        let args = Args::new()
            .with(event.clone())
            .with(binding.target().clone())
            .with(binding.context().cloned());
        self.emit_named(&control, &args)?;
        Ok(())
    }

    fn notify_removed(&self, event: &EventName, target: Target) -> Result<(), EmitError> {
        let control = EventName::named(REMOVE_LISTENER);
        if !self.inner.registry.borrow().has(&control) {
            return Ok(());
        }
        let args = Args::new().with(event.clone()).with(target);
        self.emit_named(&control, &args)?;
        Ok(())
    }

    fn normalize_context(&self, context: Option<Context>) -> Option<Context> {
        match context {
            Some(cx) if cx.as_emitter().is_some_and(|em| em.same_as(self)) => None,
            other => other,
        }
    }
}

impl Clone for Emitter {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Emitter {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Emitter {}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter").field("id", &self.inner.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::cell::RefCell;

    use super::*;
    use crate::core::registry::DEFAULT_MAX_LISTENERS_HINT;

    fn noop() -> Listener {
        Listener::new(|_cx, _args| Ok(()))
    }

    #[test]
    fn test_clones_share_registry_and_identity() {
        let a = Emitter::new();
        let b = a.clone();
        assert!(a.same_as(&b));
        assert_eq!(a.id(), b.id());
        a.register("x", noop()).unwrap();
        assert_eq!(Emitter::count_bindings(Some(&b), "x"), 1);

        let c = Emitter::new();
        assert!(!a.same_as(&c));
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_register_chaining() {
        let e = Emitter::new();
        e.register("a", noop())
            .unwrap()
            .register("b", noop())
            .unwrap();
        assert_eq!(Emitter::count_bindings(Some(&e), "a"), 1);
        assert_eq!(Emitter::count_bindings(Some(&e), "b"), 1);
    }

    #[test]
    fn test_unregister_removes_at_most_one() {
        let e = Emitter::new();
        let f = noop();
        e.register("x", f.clone()).unwrap();
        e.register("x", f.clone()).unwrap();
        e.unregister("x", f.clone()).unwrap();
        assert_eq!(Emitter::count_bindings(Some(&e), "x"), 1);
        e.unregister("x", f).unwrap();
        assert_eq!(Emitter::count_bindings(Some(&e), "x"), 0);
    }

    #[test]
    fn test_unregister_binding_matches_by_handle_identity() {
        let e = Emitter::new();
        let f = noop();
        e.register("x", f.clone()).unwrap();
        e.register("x", f).unwrap();

        // Same target twice: handle identity picks the exact binding.
        let bindings = e.bindings("x");
        e.unregister_binding("x", &bindings[0]).unwrap();
        assert_eq!(Emitter::count_bindings(Some(&e), "x"), 1);
        let left = e.bindings("x");
        assert!(Rc::ptr_eq(&left[0], &bindings[1]), "the other binding survives");

        // Removing the same handle again is a no-op, as is a missing event.
        e.unregister_binding("x", &bindings[0]).unwrap();
        assert_eq!(Emitter::count_bindings(Some(&e), "x"), 1);
        e.unregister_binding("never-registered", &bindings[0]).unwrap();
    }

    #[test]
    fn test_unregister_missing_is_noop() {
        let e = Emitter::new();
        e.register("x", noop()).unwrap();
        e.unregister("x", noop()).unwrap();
        assert_eq!(Emitter::count_bindings(Some(&e), "x"), 1);
        e.unregister("never-registered", noop()).unwrap();
    }

    #[test]
    fn test_empty_list_drops_registry_key() {
        let e = Emitter::new();
        let f = noop();
        e.register("x", f.clone()).unwrap();
        assert!(e.event_names().contains(&EventName::from("x")));
        e.unregister("x", f).unwrap();
        assert!(!e.event_names().contains(&EventName::from("x")));
    }

    #[test]
    fn test_new_listener_fires_before_append() {
        let e = Emitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&seen);
        let watcher = e.clone();
        e.register(
            NEW_LISTENER,
            Listener::new(move |_cx, args| {
                let name = args.get::<EventName>(0).cloned().expect("event name slot");
                let pending = Emitter::count_bindings(Some(&watcher), name.clone());
                s.borrow_mut().push((name.to_string(), pending));
                Ok(())
            }),
        )
        .unwrap();

        e.register("x", noop()).unwrap();
        assert_eq!(&*seen.borrow(), &[("x".to_string(), 0)]);
        assert_eq!(Emitter::count_bindings(Some(&e), "x"), 1);
    }

    #[test]
    fn test_remove_listener_fires_after_removal() {
        let e = Emitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&seen);
        let watcher = e.clone();
        e.register(
            REMOVE_LISTENER,
            Listener::new(move |_cx, args| {
                let name = args.get::<EventName>(0).cloned().expect("event name slot");
                let left = Emitter::count_bindings(Some(&watcher), name.clone());
                assert!(args.get::<Target>(1).is_some(), "target slot missing");
                s.borrow_mut().push((name.to_string(), left));
                Ok(())
            }),
        )
        .unwrap();

        let f = noop();
        e.register("x", f.clone()).unwrap();
        e.unregister("x", f).unwrap();
        assert_eq!(&*seen.borrow(), &[("x".to_string(), 0)]);
    }

    #[test]
    fn test_unregister_all_fast_path() {
        let e = Emitter::new();
        e.register("a", noop()).unwrap();
        e.register("b", noop()).unwrap();
        e.unregister_all().unwrap();
        assert!(e.event_names().is_empty());
    }

    #[test]
    fn test_unregister_all_notifies_per_binding() {
        let e = Emitter::new();
        e.register("a", noop()).unwrap();
        e.register("b", noop()).unwrap();
        e.register("b", noop()).unwrap();

        let removed = Rc::new(Cell::new(0u32));
        let r = Rc::clone(&removed);
        e.register(
            REMOVE_LISTENER,
            Listener::new(move |_cx, _args| {
                r.set(r.get() + 1);
                Ok(())
            }),
        )
        .unwrap();

        e.unregister_all().unwrap();
        assert_eq!(removed.get(), 3, "one notification per non-control binding");
        assert!(e.event_names().is_empty(), "removeListener itself cleared last");
    }

    #[test]
    fn test_unregister_event_notifies_per_binding() {
        let e = Emitter::new();
        e.register("a", noop()).unwrap();
        e.register("a", noop()).unwrap();
        e.register("b", noop()).unwrap();

        let removed = Rc::new(Cell::new(0u32));
        let r = Rc::clone(&removed);
        e.register(
            REMOVE_LISTENER,
            Listener::new(move |_cx, _args| {
                r.set(r.get() + 1);
                Ok(())
            }),
        )
        .unwrap();

        e.unregister_event("a").unwrap();
        assert_eq!(removed.get(), 2);
        assert_eq!(Emitter::count_bindings(Some(&e), "b"), 1);
    }

    #[test]
    fn test_self_context_normalizes_to_none() {
        let e = Emitter::new();
        e.register_with("x", noop(), Context::emitter(&e)).unwrap();
        let bindings = e.bindings("x");
        assert!(bindings[0].context().is_none());
    }

    #[test]
    fn test_foreign_context_is_kept() {
        let e = Emitter::new();
        let other = Emitter::new();
        e.register_with("x", noop(), Context::emitter(&other)).unwrap();
        let bindings = e.bindings("x");
        let cx = bindings[0].context().expect("context kept");
        assert!(cx.as_emitter().is_some_and(|em| em.same_as(&other)));
    }

    #[test]
    fn test_bindings_snapshot_in_insertion_order() {
        let e = Emitter::new();
        let f = noop();
        let g = noop();
        e.register("x", f.clone()).unwrap();
        e.register_once("x", g.clone()).unwrap();
        let bindings = e.bindings("x");
        assert_eq!(bindings.len(), 2);
        assert!(bindings[0].target().same_as(&f.into()));
        assert!(bindings[1].target().same_as(&g.into()));
        assert!(!bindings[0].once());
        assert!(bindings[1].once());
    }

    #[test]
    fn test_count_bindings_without_emitter() {
        assert_eq!(Emitter::count_bindings(None, "x"), 0);
        let e = Emitter::new();
        assert_eq!(Emitter::count_bindings(Some(&e), "x"), 0);
    }

    #[test]
    fn test_max_listeners_hint_roundtrip() {
        let e = Emitter::new();
        assert_eq!(e.max_listeners_hint(), DEFAULT_MAX_LISTENERS_HINT);
        e.set_max_listeners_hint(3);
        assert_eq!(e.max_listeners_hint(), 3);
    }

    #[test]
    fn test_exceeding_hint_never_rejects() {
        let e = Emitter::new();
        e.set_max_listeners_hint(2);
        for _ in 0..12 {
            e.register("busy", noop()).unwrap();
        }
        assert_eq!(Emitter::count_bindings(Some(&e), "busy"), 12);
    }

    #[test]
    fn test_numeric_tags_are_separate_slots() {
        let e = Emitter::new();
        e.register(7u64, noop()).unwrap();
        e.register("7", noop()).unwrap();
        assert_eq!(Emitter::count_bindings(Some(&e), 7u64), 1);
        assert_eq!(Emitter::count_bindings(Some(&e), "7"), 1);
    }
}
