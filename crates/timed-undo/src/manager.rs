/// Core manager for timed reversible actions.
///
/// Orchestrates execute / undo / redo / clear over two bounded stacks and
/// an expiration scheduler. All bookkeeping is synchronous: callbacks are
/// dispatched fire-and-forget, and every removal locates its target by
/// identity, never by stack position, so a deadline that outlives its
/// entry can never remove the wrong one.
use std::time::Instant;

use crate::action::{Action, ActionId, IdAllocator};
use crate::config::HistoryConfig;
use crate::scheduler::ExpiryScheduler;
use crate::stack::{ActionStack, HistoryEntry};

/// Manages a linear timeline of reversible actions.
///
/// Each manager instance owns its stacks, its identity allocator, and its
/// pending-expiration map; instances are independent. Hosts drive
/// expiration by pumping [`UndoManager::tick`] from their event loop.
pub struct UndoManager {
    /// Undo stack, newest entry at the head. Every entry here may hold a
    /// pending expiration deadline.
    undo_stack: ActionStack,
    /// Redo stack, most-recently-reversed at the head. Entries here never
    /// hold deadlines.
    redo_stack: ActionStack,
    /// Identity source for new history entries.
    ids: IdAllocator,
    /// Pending expiration deadlines, keyed by identity.
    scheduler: ExpiryScheduler,
    /// Configuration parameters.
    config: HistoryConfig,
}

impl std::fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoManager")
            .field("undo_len", &self.undo_stack.len())
            .field("redo_len", &self.redo_stack.len())
            .field("pending_expirations", &self.scheduler.len())
            .field("config", &self.config)
            .finish()
    }
}

impl UndoManager {
    /// Creates an empty manager with the given configuration.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: ActionStack::new(config.max_history),
            redo_stack: ActionStack::new(config.max_history),
            ids: IdAllocator::new(),
            scheduler: ExpiryScheduler::new(),
            config,
        }
    }

    /// Creates a manager with the default configuration.
    ///
    /// Convenience constructor for tests and simple usage.
    pub fn with_defaults() -> Self {
        Self::new(HistoryConfig::default())
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Records and (unless `auto_execute` is off) performs a new action.
    ///
    /// A fresh action discards the redo stack: redoing an old branch after
    /// performing a new action would be ambiguous, so the timeline stays
    /// strictly linear. The apply callback is dispatched fire-and-forget;
    /// its failure is logged, never re-thrown, and on return the new
    /// entry's identity is in the undo stack regardless of what the
    /// callback did.
    ///
    /// Returns the identity assigned to the new entry.
    pub fn execute(&mut self, mut action: Action) -> ActionId {
        // Redo entries hold no deadlines, so there is nothing to cancel.
        self.redo_stack.clear();

        let id = self.ids.next_id();
        if self.config.auto_execute {
            if let Err(e) = action.apply() {
                tracing::warn!("Apply callback failed for action {id}: {e}");
            }
        }
        self.push_with_expiry(HistoryEntry::new(id, action));
        id
    }

    /// Reverses the most recent action.
    ///
    /// Moves the undo-stack head onto the redo stack under the same
    /// identity and cancels its pending deadline, looked up by identity.
    /// Returns the moved identity, or `None` if there was nothing to undo.
    pub fn undo(&mut self) -> Option<ActionId> {
        let mut entry = self.undo_stack.pop()?;
        let id = entry.id;
        // Cancel before anything else can observe the entry as gone; a
        // deadline for an identity outside the undo stack must not exist.
        self.scheduler.cancel(id);
        if let Err(e) = entry.action.reverse() {
            tracing::warn!("Reverse callback failed for action {id}: {e}");
        }
        // Redo entries evicted by the bound carry no deadlines; drop them.
        self.redo_stack.push(entry);
        Some(id)
    }

    /// Re-applies the most recently reversed action.
    ///
    /// The entry returns to the undo stack as a new temporal instance: it
    /// is minted a fresh identity and a fresh expiration window, and the
    /// old identity is permanently retired. Returns the new identity, or
    /// `None` if there was nothing to redo.
    pub fn redo(&mut self) -> Option<ActionId> {
        let mut entry = self.redo_stack.pop()?;
        entry.id = self.ids.next_id();
        let id = entry.id;
        if let Err(e) = entry.action.apply() {
            tracing::warn!("Re-apply callback failed for action {id}: {e}");
        }
        self.push_with_expiry(entry);
        Some(id)
    }

    /// Cancels every pending deadline and empties both stacks.
    pub fn clear(&mut self) {
        self.scheduler.cancel_all();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Processes expirations that have come due, using the current time.
    ///
    /// Hosts call this from their event loop (e.g. once per frame or
    /// turn). Returns the number of entries removed.
    pub fn tick(&mut self) -> usize {
        self.tick_at(Instant::now())
    }

    /// Processes expirations that are due as of `now`.
    ///
    /// Each fired identity is looked up in the undo stack by identity
    /// equality; an identity with no matching entry fired stale (the
    /// entry already left the stack) and is a defined no-op.
    pub fn tick_at(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        for id in self.scheduler.fire_due(now) {
            match self.undo_stack.remove(id) {
                Some(_) => {
                    tracing::debug!("Action {id} expired after its timeout window");
                    removed += 1;
                }
                None => {
                    tracing::trace!("Stale deadline fired for action {id}; entry already gone");
                }
            }
        }
        removed
    }

    /// Whether there is an action to reverse.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there is an action to re-apply.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the most recent undoable action, if it has one.
    pub fn last_action_label(&self) -> Option<&str> {
        self.undo_stack.head().and_then(HistoryEntry::label)
    }

    /// Number of entries currently on the undo stack.
    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of entries currently on the redo stack.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Number of live expiration deadlines.
    pub fn pending_expirations(&self) -> usize {
        self.scheduler.len()
    }

    /// Pushes an entry onto the undo stack, cancelling the deadlines of
    /// anything the bound evicts and scheduling expiry for the newcomer if
    /// it survived the push.
    fn push_with_expiry(&mut self, entry: HistoryEntry) {
        let id = entry.id;
        for evicted in self.undo_stack.push(entry) {
            self.scheduler.cancel(evicted.id());
            tracing::debug!(
                "Evicted action {} to keep history within {} entries",
                evicted.id(),
                self.config.max_history
            );
        }
        if let Some(delay) = self.config.expiry() {
            if self.undo_stack.contains(id) {
                self.scheduler.schedule(id, delay, Instant::now());
            }
        }
    }
}
