//! # Event names.
//!
//! [`EventName`] identifies a slot in an emitter's registry. Names are either
//! interned strings or plain numeric tags; both are cheap to clone and usable
//! as map keys.
//!
//! ## Reserved names
//! Three string names carry protocol meaning for every [`Emitter`](crate::Emitter):
//! - [`NEW_LISTENER`] — emitted *before* a binding is appended, with
//!   `(event, target, context)`;
//! - [`REMOVE_LISTENER`] — emitted *after* a binding is removed, with
//!   `(event, target)`;
//! - [`ERROR`] — emitting it with no registered bindings fails the `emit` call.

use std::fmt;
use std::sync::Arc;

/// Emitted before a new binding is appended to the registry.
///
/// Payload: `(EventName, Target, Option<Context>)`. The handler never
/// observes the binding it is being notified about.
pub const NEW_LISTENER: &str = "newListener";

/// Emitted after a binding has been removed from the registry.
///
/// Payload: `(EventName, Target)`. Fires once per removed binding.
pub const REMOVE_LISTENER: &str = "removeListener";

/// Unobserved `error` events are fatal: emitting this name with no bindings
/// returns [`EmitError::Unhandled`](crate::EmitError::Unhandled).
pub const ERROR: &str = "error";

/// Name under which bindings are filed in an emitter's registry.
///
/// Cloning is cheap: the string form shares an `Arc<str>`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum EventName {
    /// String name (the common case).
    Named(Arc<str>),
    /// Numeric tag, for callers that key events by id rather than by string.
    Tag(u64),
}

impl EventName {
    /// Creates a string name.
    pub fn named(name: impl AsRef<str>) -> Self {
        EventName::Named(Arc::from(name.as_ref()))
    }

    /// Creates a numeric tag.
    pub fn tag(tag: u64) -> Self {
        EventName::Tag(tag)
    }

    /// True if this is the string name `name`.
    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, EventName::Named(n) if &**n == name)
    }

    /// True for the three control names ([`NEW_LISTENER`], [`REMOVE_LISTENER`],
    /// [`ERROR`]).
    pub fn is_reserved(&self) -> bool {
        self.is_named(NEW_LISTENER) || self.is_named(REMOVE_LISTENER) || self.is_named(ERROR)
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        EventName::named(name)
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        EventName::Named(Arc::from(name))
    }
}

impl From<u64> for EventName {
    fn from(tag: u64) -> Self {
        EventName::tag(tag)
    }
}

impl From<&EventName> for EventName {
    fn from(name: &EventName) -> Self {
        name.clone()
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventName::Named(name) => write!(f, "{name}"),
            EventName::Tag(tag) => write!(f, "#{tag}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_equality_and_hashing_by_content() {
        let a = EventName::from("tick");
        let b = EventName::named("tick");
        assert_eq!(a, b);
        assert_ne!(a, EventName::from("tock"));
    }

    #[test]
    fn test_tag_and_named_never_equal() {
        assert_eq!(EventName::tag(7), EventName::from(7));
        assert_ne!(EventName::tag(7), EventName::from("7"));
    }

    #[test]
    fn test_is_named() {
        assert!(EventName::from("error").is_named("error"));
        assert!(!EventName::from(3).is_named("3"));
    }

    #[test]
    fn test_reserved_names() {
        assert!(EventName::from(NEW_LISTENER).is_reserved());
        assert!(EventName::from(REMOVE_LISTENER).is_reserved());
        assert!(EventName::from(ERROR).is_reserved());
        assert!(!EventName::from("custom").is_reserved());
    }

    #[test]
    fn test_display() {
        assert_eq!(EventName::from("x").to_string(), "x");
        assert_eq!(EventName::from(42).to_string(), "#42");
    }
}
