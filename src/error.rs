//! Error types used by the emitter registry and dispatcher.
//!
//! One enum covers every failure a public method can report:
//!
//! - [`EmitError`] — dispatch-time failures: an unobserved `error` event, or
//!   a listener that returned an error mid-dispatch.
//!
//! The type provides helper methods (`as_label`, `as_message`) for
//! logging/metrics. There is no malformed-input variant: the tagged
//! [`Target`](crate::Target) variant and the unsigned listener-hint make
//! those states unrepresentable.

use thiserror::Error;

use crate::events::{Args, EventName};

/// Boxed error produced by a listener body.
///
/// Listeners return `Result<(), BoxError>`; a failure aborts the remainder of
/// the dispatch and surfaces as [`EmitError::Listener`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by emitter dispatch.
///
/// Both variants are synchronous: they surface at the call site of the public
/// method that triggered them. There is no asynchronous error channel.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EmitError {
    /// `emit("error", ..)` found no registered bindings.
    ///
    /// Unobserved error events are fatal by protocol. If the first argument
    /// slot carried a `String` or `&'static str`, it becomes the reason;
    /// otherwise a generic message is used.
    #[error("unhandled 'error' event: {reason}")]
    Unhandled {
        /// Message recovered from the first argument slot, or a generic text.
        reason: String,
    },

    /// A listener returned an error while handling `event`.
    ///
    /// Bindings after the failing one are skipped for that emission; the
    /// dispatch markers are still restored.
    #[error("listener failed while handling '{event}': {source}")]
    Listener {
        /// Name under which the failing binding was invoked.
        event: EventName,
        /// The listener's own error.
        #[source]
        source: BoxError,
    },
}

impl EmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitError::Unhandled { .. } => "emit_unhandled_error",
            EmitError::Listener { .. } => "emit_listener_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitError::Unhandled { reason } => format!("unhandled error event: {reason}"),
            EmitError::Listener { event, source } => {
                format!("listener failed on '{event}': {source}")
            }
        }
    }

    /// Builds the failure for an unobserved `error` emission from its
    /// argument pack.
    pub(crate) fn unhandled(args: &Args) -> Self {
        let reason = args
            .get::<String>(0)
            .cloned()
            .or_else(|| args.get::<&'static str>(0).map(|s| (*s).to_string()))
            .unwrap_or_else(|| "emitted with no registered listeners".to_string());
        EmitError::Unhandled { reason }
    }

    /// Wraps a listener failure with the event it was handling.
    pub(crate) fn listener(event: &EventName, source: BoxError) -> Self {
        EmitError::Listener { event: event.clone(), source }
    }
}
