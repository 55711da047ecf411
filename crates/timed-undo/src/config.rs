/// Configuration for the action history system.
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay in milliseconds before an untouched history entry is forgotten.
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Maximum number of entries kept on each of the undo and redo stacks.
const DEFAULT_MAX_HISTORY: usize = 100;

/// Construction-time knobs for an `UndoManager`.
///
/// Serializable so hosts can embed it in their settings files; missing
/// fields fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Expiration delay in milliseconds. `0` disables auto-expiration.
    pub timeout_ms: u64,
    /// Bound on both the undo and redo stacks. Expected to be at least 1;
    /// `0` retains nothing.
    pub max_history: usize,
    /// Whether `execute` invokes the apply callback immediately, or only
    /// records the entry (for callers that perform the effect themselves).
    pub auto_execute: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_history: DEFAULT_MAX_HISTORY,
            auto_execute: true,
        }
    }
}

impl HistoryConfig {
    /// Returns the expiration window, or `None` when auto-expiration is
    /// disabled.
    pub fn expiry(&self) -> Option<Duration> {
        if self.timeout_ms > 0 {
            Some(Duration::from_millis(self.timeout_ms))
        } else {
            None
        }
    }
}
