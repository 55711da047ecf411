/// Deadline bookkeeping for automatic entry expiration.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::action::ActionId;

/// Maps entry identities to their pending expiration deadlines.
///
/// Owned by a single `UndoManager`; there is no process-wide timer state.
/// The scheduler runs no callbacks itself: the host pumps the manager,
/// which asks for the identities that have come due and performs the
/// removals. Cancellation is idempotent, so cancelling an identity whose
/// deadline already fired (or was never scheduled) is a defined no-op.
#[derive(Debug, Default)]
pub struct ExpiryScheduler {
    deadlines: HashMap<ActionId, Instant>,
}

impl ExpiryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a one-shot deadline `delay` from `now`.
    ///
    /// A zero delay registers nothing: the entry never auto-expires. The
    /// caller guarantees at most one live schedule per identity.
    pub fn schedule(&mut self, id: ActionId, delay: Duration, now: Instant) {
        if delay.is_zero() {
            return;
        }
        self.deadlines.insert(id, now + delay);
    }

    /// Cancels the pending deadline for `id`, if any. Returns whether a
    /// registration was removed.
    pub fn cancel(&mut self, id: ActionId) -> bool {
        self.deadlines.remove(&id).is_some()
    }

    /// Cancels every pending deadline. Used on manager teardown.
    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    /// Removes and returns every identity whose deadline is at or before
    /// `now`, in firing order (earliest deadline first, ties by id).
    pub fn fire_due(&mut self, now: Instant) -> Vec<ActionId> {
        let mut due: Vec<(Instant, ActionId)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.deadlines.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn is_scheduled(&self, id: ActionId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::IdAllocator;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_fire_due_respects_deadlines() {
        let mut ids = IdAllocator::new();
        let mut sched = ExpiryScheduler::new();
        let now = Instant::now();

        let early = ids.next_id();
        let late = ids.next_id();
        sched.schedule(early, 10 * MS, now);
        sched.schedule(late, 100 * MS, now);

        assert!(sched.fire_due(now + 5 * MS).is_empty());
        assert_eq!(sched.fire_due(now + 50 * MS), vec![early]);
        assert_eq!(sched.fire_due(now + 200 * MS), vec![late]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_fire_due_orders_by_deadline() {
        let mut ids = IdAllocator::new();
        let mut sched = ExpiryScheduler::new();
        let now = Instant::now();

        let slow = ids.next_id();
        let fast = ids.next_id();
        sched.schedule(slow, 30 * MS, now);
        sched.schedule(fast, 10 * MS, now);

        assert_eq!(sched.fire_due(now + 60 * MS), vec![fast, slow]);
    }

    #[test]
    fn test_firing_removes_registration() {
        let mut ids = IdAllocator::new();
        let mut sched = ExpiryScheduler::new();
        let now = Instant::now();

        let id = ids.next_id();
        sched.schedule(id, 10 * MS, now);
        assert!(sched.is_scheduled(id));

        assert_eq!(sched.fire_due(now + 20 * MS), vec![id]);
        assert!(!sched.is_scheduled(id));
        // A second sweep finds nothing: deadlines are one-shot.
        assert!(sched.fire_due(now + 40 * MS).is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut ids = IdAllocator::new();
        let mut sched = ExpiryScheduler::new();
        let now = Instant::now();

        let id = ids.next_id();
        sched.schedule(id, 10 * MS, now);
        assert!(sched.cancel(id));
        assert!(!sched.cancel(id));
        assert!(!sched.cancel(ids.next_id()));
        assert!(sched.fire_due(now + 20 * MS).is_empty());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut ids = IdAllocator::new();
        let mut sched = ExpiryScheduler::new();
        let now = Instant::now();

        let id = ids.next_id();
        sched.schedule(id, 10 * MS, now);
        sched.fire_due(now + 20 * MS);
        assert!(!sched.cancel(id));
    }

    #[test]
    fn test_zero_delay_registers_nothing() {
        let mut ids = IdAllocator::new();
        let mut sched = ExpiryScheduler::new();
        let now = Instant::now();

        sched.schedule(ids.next_id(), Duration::ZERO, now);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut ids = IdAllocator::new();
        let mut sched = ExpiryScheduler::new();
        let now = Instant::now();

        for _ in 0..5 {
            sched.schedule(ids.next_id(), 10 * MS, now);
        }
        assert_eq!(sched.len(), 5);

        sched.cancel_all();
        assert!(sched.is_empty());
        assert!(sched.fire_due(now + 20 * MS).is_empty());
    }
}
