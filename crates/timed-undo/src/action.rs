/// Core types: action identities and the reversible action descriptor.
use std::fmt;

use anyhow::Result;

/// Opaque identity of a history entry.
///
/// Assigned by the manager when an action enters the undo stack, never by
/// the caller. Unique among all entries currently held in either stack; a
/// re-applied action receives a fresh identity, so ids are never reused
/// across redo cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Produces strictly increasing `ActionId`s for one manager instance.
///
/// A plain owned counter, not a process-wide global: each manager allocates
/// independently and requires no cross-instance coordination.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an id strictly greater than all previously returned ids.
    pub fn next_id(&mut self) -> ActionId {
        let id = ActionId(self.next);
        self.next += 1;
        id
    }
}

/// Callback invoked to perform or undo an action's effect.
///
/// May hand real work off to a background task of the host's choosing; the
/// manager only observes the synchronous result and never awaits anything.
pub type ActionFn = Box<dyn FnMut() -> Result<()>>;

/// One reversible user-visible operation.
///
/// The manager treats both callbacks as opaque: it dispatches them
/// fire-and-forget and does not validate their semantics.
pub struct Action {
    apply_fn: ActionFn,
    reverse_fn: ActionFn,
    label: Option<String>,
}

impl Action {
    /// Creates an action from its apply and reverse callbacks.
    pub fn new(apply: ActionFn, reverse: ActionFn) -> Self {
        Self {
            apply_fn: apply,
            reverse_fn: reverse,
            label: None,
        }
    }

    /// Attaches a human-readable description, display only.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Performs (or re-performs) the effect.
    pub(crate) fn apply(&mut self) -> Result<()> {
        (self.apply_fn)()
    }

    /// Undoes the effect.
    pub(crate) fn reverse(&mut self) -> Result<()> {
        (self.reverse_fn)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("label", &self.label).finish()
    }
}
