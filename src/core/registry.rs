//! # Internal binding storage.
//!
//! [`Registry`] maps event names to *shared, live* binding lists. Each list
//! is an `Rc<RefCell<Vec<..>>>` on purpose: the dispatcher captures the list
//! once at emit time and keeps iterating it by index while listeners
//! register and unregister through the same cell. Reading the length fresh
//! on every step is what gives the documented live-length iteration policy.
//!
//! Two invariants the emitter relies on:
//! - a list that becomes empty has its key deleted (key presence is what
//!   gates `removeListener` notifications and the `emit` short-circuit);
//! - key deletion only happens if the map still points at the same list the
//!   caller drained, so a key recreated mid-dispatch is left alone.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::bindings::Binding;
use crate::events::EventName;

/// Default value of the max-listeners hint (diagnostic only, never enforced).
pub(crate) const DEFAULT_MAX_LISTENERS_HINT: usize = 10;

/// Shared, live list of bindings for one event name.
pub(crate) type BindingList = Rc<RefCell<Vec<Rc<Binding>>>>;

/// Per-emitter storage: ordered binding lists keyed by event name.
pub(crate) struct Registry {
    events: HashMap<EventName, BindingList>,
    max_hint: usize,
    warned: HashSet<EventName>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            events: HashMap::new(),
            max_hint: DEFAULT_MAX_LISTENERS_HINT,
            warned: HashSet::new(),
        }
    }

    /// Returns the live list for `event`, if the key exists.
    pub(crate) fn lookup(&self, event: &EventName) -> Option<BindingList> {
        self.events.get(event).cloned()
    }

    /// Returns the live list for `event`, creating an empty slot if absent.
    pub(crate) fn slot(&mut self, event: &EventName) -> BindingList {
        self.events.entry(event.clone()).or_default().clone()
    }

    /// True if `event` has at least one binding.
    pub(crate) fn has(&self, event: &EventName) -> bool {
        self.events.get(event).is_some_and(|list| !list.borrow().is_empty())
    }

    /// All currently present keys (including lazily created empty slots).
    pub(crate) fn names(&self) -> Vec<EventName> {
        self.events.keys().cloned().collect()
    }

    /// Deletes the key for `event` if its list is empty and the map still
    /// points at `list`.
    pub(crate) fn drop_if_empty(&mut self, event: &EventName, list: &BindingList) {
        if !list.borrow().is_empty() {
            return;
        }
        if self.events.get(event).is_some_and(|current| Rc::ptr_eq(current, list)) {
            self.events.remove(event);
        }
    }

    /// Clears every key and resets warning state.
    pub(crate) fn clear(&mut self) {
        self.events.clear();
        self.warned.clear();
    }

    pub(crate) fn max_hint(&self) -> usize {
        self.max_hint
    }

    pub(crate) fn set_max_hint(&mut self, hint: usize) {
        self.max_hint = hint;
    }

    /// Soft-limit bookkeeping: true at most once per event name, the first
    /// time `len` exceeds the hint. A hint of zero disables the diagnostic.
    pub(crate) fn should_warn(&mut self, event: &EventName, len: usize) -> bool {
        if self.max_hint == 0 || len <= self.max_hint || self.warned.contains(event) {
            return false;
        }
        self.warned.insert(event.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::Listener;

    fn binding(event: &str) -> Rc<Binding> {
        Binding::new(
            EventName::from(event),
            Listener::new(|_cx, _args| Ok(())).into(),
            None,
            false,
        )
    }

    #[test]
    fn test_slot_is_lazily_created_and_shared() {
        let mut registry = Registry::new();
        let name = EventName::from("x");
        let a = registry.slot(&name);
        let b = registry.slot(&name);
        assert!(Rc::ptr_eq(&a, &b));
        assert!(registry.lookup(&name).is_some());
        assert!(!registry.has(&name), "empty slot must not count as listening");
    }

    #[test]
    fn test_drop_if_empty_removes_key() {
        let mut registry = Registry::new();
        let name = EventName::from("x");
        let list = registry.slot(&name);
        list.borrow_mut().push(binding("x"));
        registry.drop_if_empty(&name, &list);
        assert!(registry.lookup(&name).is_some(), "non-empty list must keep its key");

        list.borrow_mut().clear();
        registry.drop_if_empty(&name, &list);
        assert!(registry.lookup(&name).is_none());
    }

    #[test]
    fn test_drop_if_empty_ignores_replaced_list() {
        let mut registry = Registry::new();
        let name = EventName::from("x");
        let stale = registry.slot(&name);
        registry.clear();
        let fresh = registry.slot(&name);
        registry.drop_if_empty(&name, &stale);
        assert!(
            registry.lookup(&name).is_some_and(|l| Rc::ptr_eq(&l, &fresh)),
            "a recreated key must survive a stale drain"
        );
    }

    #[test]
    fn test_should_warn_fires_once_per_event() {
        let mut registry = Registry::new();
        registry.set_max_hint(2);
        let name = EventName::from("x");
        assert!(!registry.should_warn(&name, 2));
        assert!(registry.should_warn(&name, 3));
        assert!(!registry.should_warn(&name, 4), "warning is one-shot per event");
        assert!(registry.should_warn(&EventName::from("y"), 3));
    }

    #[test]
    fn test_zero_hint_disables_warning() {
        let mut registry = Registry::new();
        registry.set_max_hint(0);
        assert!(!registry.should_warn(&EventName::from("x"), 1000));
    }
}
