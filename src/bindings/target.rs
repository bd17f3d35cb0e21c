//! # Invocation targets: listeners, receivers, delegates.
//!
//! [`Target`] is the tagged variant behind every binding: either a plain
//! [`Listener`] closure or a delegate [`Emitter`](crate::Emitter) whose own
//! dispatch is triggered in place of a call. The enum makes the two
//! invocation strategies exhaustive at compile time — there is no runtime
//! capability probing and no way to file an uninvocable target.
//!
//! [`Listener`] wraps its closure in a shared handle (the same shape as a
//! shared task handle): clones compare equal by identity, which is what
//! removal matches on.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::core::Emitter;
use crate::error::BoxError;
use crate::events::Args;

/// Signature every listener closure satisfies.
///
/// The first parameter is the *receiver*: the binding's context if one was
/// registered, otherwise the emitting instance wrapped in a [`Context`].
pub type ListenerFn = dyn Fn(&Context, &Args) -> Result<(), BoxError>;

/// Shared handle to a listener closure.
///
/// Cloning is cheap and preserves identity: a clone compares equal to the
/// original under [`Listener::ptr_eq`], so the same handle used to register
/// can later be used to unregister.
///
/// ## Example
/// ```rust
/// use evoke::Listener;
///
/// let listener = Listener::new(|_receiver, _args| Ok(()));
/// let same = listener.clone();
/// assert!(listener.ptr_eq(&same));
///
/// let other = Listener::new(|_receiver, _args| Ok(()));
/// assert!(!listener.ptr_eq(&other));
/// ```
#[derive(Clone)]
pub struct Listener {
    f: Rc<ListenerFn>,
}

impl Listener {
    /// Wraps a closure into a shared listener handle.
    pub fn new(f: impl Fn(&Context, &Args) -> Result<(), BoxError> + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// Identity comparison: true only for clones of the same handle.
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }

    /// Invokes the closure with the resolved receiver and argument snapshot.
    pub(crate) fn call(&self, receiver: &Context, args: &Args) -> Result<(), BoxError> {
        (self.f)(receiver, args)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.f))
    }
}

/// Receiver override for a binding.
///
/// A registered context replaces the emitting instance as the first argument
/// of the listener call. A context that *is* the owning emitter is
/// normalized away at registration, so receiver resolution stays a single
/// `context-or-self` branch at dispatch time.
#[derive(Clone)]
pub struct Context {
    value: Rc<dyn Any>,
}

impl Context {
    /// Wraps an arbitrary value as a receiver.
    pub fn of<T: Any>(value: T) -> Self {
        Self { value: Rc::new(value) }
    }

    /// Wraps an emitter handle as a receiver.
    pub fn emitter(emitter: &Emitter) -> Self {
        Self::of(emitter.clone())
    }

    /// Downcasts the receiver to `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Shorthand for downcasting to an [`Emitter`].
    pub fn as_emitter(&self) -> Option<&Emitter> {
        self.downcast_ref::<Emitter>()
    }

    /// Identity comparison on the wrapped value.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context({:p})", Rc::as_ptr(&self.value))
    }
}

/// What a binding invokes: a closure, or another emitter's dispatcher.
#[derive(Clone, Debug)]
pub enum Target {
    /// Plain invocable listener.
    Listener(Listener),
    /// Delegate emitter: dispatch re-emits on it under the binding's filed
    /// name (alias-aware).
    Delegate(Emitter),
}

impl Target {
    /// Identity comparison across variants.
    ///
    /// Listeners match listeners by handle identity, delegates match
    /// delegates by emitter identity. Mixed variants never match.
    pub fn same_as(&self, other: &Target) -> bool {
        match (self, other) {
            (Target::Listener(a), Target::Listener(b)) => a.ptr_eq(b),
            (Target::Delegate(a), Target::Delegate(b)) => a.same_as(b),
            _ => false,
        }
    }
}

impl From<Listener> for Target {
    fn from(listener: Listener) -> Self {
        Target::Listener(listener)
    }
}

impl From<Emitter> for Target {
    fn from(emitter: Emitter) -> Self {
        Target::Delegate(emitter)
    }
}

impl From<&Emitter> for Target {
    fn from(emitter: &Emitter) -> Self {
        Target::Delegate(emitter.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_clone_keeps_identity() {
        let a = Listener::new(|_cx, _args| Ok(()));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_distinct_listeners_differ() {
        let a = Listener::new(|_cx, _args| Ok(()));
        let b = Listener::new(|_cx, _args| Ok(()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_target_identity_within_variant() {
        let listener = Listener::new(|_cx, _args| Ok(()));
        let a: Target = listener.clone().into();
        let b: Target = listener.into();
        assert!(a.same_as(&b));

        let emitter = Emitter::new();
        let c: Target = (&emitter).into();
        let d: Target = emitter.into();
        assert!(c.same_as(&d));
    }

    #[test]
    fn test_mixed_variants_never_match() {
        let listener: Target = Listener::new(|_cx, _args| Ok(())).into();
        let delegate: Target = Emitter::new().into();
        assert!(!listener.same_as(&delegate));
        assert!(!delegate.same_as(&listener));
    }

    #[test]
    fn test_context_clone_keeps_identity() {
        let a = Context::of(5u32);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Context::of(5u32)), "equal values, distinct contexts");
    }

    #[test]
    fn test_context_downcast() {
        let cx = Context::of(5u32);
        assert_eq!(cx.downcast_ref::<u32>(), Some(&5));
        assert!(cx.downcast_ref::<String>().is_none());
        assert!(cx.as_emitter().is_none());

        let emitter = Emitter::new();
        let cx = Context::emitter(&emitter);
        assert!(cx.as_emitter().is_some_and(|e| e.same_as(&emitter)));
    }
}
