//! # Dispatch arguments.
//!
//! [`Args`] is the heterogeneous argument pack handed to every listener of an
//! emission. It is built once by the caller, snapshotted by `emit` before
//! iteration, and shared read-only with every binding — later mutation of the
//! caller's own data can never affect an in-flight dispatch.
//!
//! Values are stored as `Rc<dyn Any>` slots, so cloning the pack clones
//! handles, not payloads.
//!
//! ## Example
//! ```rust
//! use evoke::Args;
//!
//! let args = Args::new().with(7u32).with(String::from("ready"));
//! assert_eq!(args.len(), 2);
//! assert_eq!(args.get::<u32>(0), Some(&7));
//! assert_eq!(args.get::<String>(1).map(String::as_str), Some("ready"));
//! assert_eq!(args.get::<u32>(1), None); // wrong type
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// One argument slot: a shared, dynamically typed value.
pub type Payload = Rc<dyn Any>;

/// Ordered, immutable-by-convention argument pack for one emission.
#[derive(Clone, Default)]
pub struct Args {
    values: Vec<Payload>,
}

impl Args {
    /// Creates an empty pack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, taking ownership.
    #[must_use]
    pub fn with<T: Any>(mut self, value: T) -> Self {
        self.values.push(Rc::new(value));
        self
    }

    /// Appends an already shared payload without re-wrapping it.
    #[must_use]
    pub fn with_payload(mut self, value: Payload) -> Self {
        self.values.push(value);
        self
    }

    /// Returns the slot at `index` downcast to `T`, or `None` if the slot is
    /// absent or holds a different type.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref()
    }

    /// Returns the raw payload at `index`.
    pub fn payload(&self, index: usize) -> Option<&Payload> {
        self.values.get(index)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the pack carries no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args").field("len", &self.values.len()).finish()
    }
}
