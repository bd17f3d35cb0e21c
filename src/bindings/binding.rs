//! # One registered handler.
//!
//! A [`Binding`] is the `(event, target, context, once)` tuple an emitter
//! stores per registration. Bindings live in their event's list in insertion
//! order — that order *is* dispatch order — and are handed out as shared
//! `Rc` handles so removal can match them by identity.
//!
//! The `event` field is the name the target is invoked under. For ordinary
//! registrations it equals the name the binding is filed under; for aliased
//! delegation it is the alias, which is how event renaming across a
//! forwarding chain works.

use std::rc::Rc;

use crate::events::EventName;

use super::{Context, Target};

/// One registered `(event, target, context, once)` tuple.
#[derive(Debug)]
pub struct Binding {
    event: EventName,
    target: Target,
    context: Option<Context>,
    once: bool,
}

impl Binding {
    /// Creates a shared binding handle.
    ///
    /// Context normalization (owning-emitter context collapses to `None`)
    /// happens in the emitter before this is called.
    pub(crate) fn new(
        event: EventName,
        target: Target,
        context: Option<Context>,
        once: bool,
    ) -> Rc<Self> {
        Rc::new(Self { event, target, context, once })
    }

    /// Name the target is invoked under (the alias, for aliased delegation).
    pub fn event(&self) -> &EventName {
        &self.event
    }

    /// What this binding invokes.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Receiver override, if any. `None` means "the emitting instance".
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// True if the binding is removed immediately before its first invocation.
    pub fn once(&self) -> bool {
        self.once
    }
}
