/// Bounded undo/redo action history with automatic expiration.
///
/// Provides an `UndoManager` that tracks reversible operations on two
/// bounded stacks, lets any entry be reversed or re-applied, and forgets
/// entries automatically once a configurable timeout elapses. Expirations
/// are processed when the host pumps `UndoManager::tick` from its event
/// loop; all bookkeeping is synchronous and keyed by entry identity, so
/// stack mutations and timer firings can never desynchronize.
pub mod action;
pub mod config;
pub mod manager;
pub mod scheduler;
pub mod stack;

pub use action::{Action, ActionFn, ActionId, IdAllocator};
pub use config::HistoryConfig;
pub use manager::UndoManager;
pub use scheduler::ExpiryScheduler;
pub use stack::{ActionStack, HistoryEntry};
