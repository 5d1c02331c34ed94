//! Per-session concurrency control.
//!
//! Ensures only one turn runs per session at a time. A second message
//! arriving while a turn is in-flight is rejected with a "busy" error
//! rather than interleaved.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Manages per-session turn locks.
///
/// Each session id maps to a `Semaphore(1)`. Holding the permit gives
/// exclusive access for one turn; it auto-releases on drop.
pub struct SessionLockMap {
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Default for SessionLockMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLockMap {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the turn lock for a session without waiting.
    ///
    /// Returns `Err(SessionBusy)` when a turn is already in progress for
    /// this session.
    pub fn try_acquire(&self, session_id: &str) -> Result<OwnedSemaphorePermit, SessionBusy> {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(session_id.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        sem.try_acquire_owned().map_err(|_| SessionBusy)
    }

    /// Number of tracked sessions (for monitoring).
    pub fn session_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Remove locks for sessions that aren't actively held (cleanup).
    pub fn prune_idle(&self) {
        let mut locks = self.locks.lock();
        locks.retain(|_, sem| sem.available_permits() == 0);
    }
}

/// Error returned when a turn is already in progress for a session.
#[derive(Debug)]
pub struct SessionBusy;

impl std::fmt::Display for SessionBusy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session is busy, a turn is already in progress")
    }
}

impl std::error::Error for SessionBusy {}
