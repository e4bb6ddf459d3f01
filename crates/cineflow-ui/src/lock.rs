//! Scoped input lock that suppresses container scrolling during a gesture.
//!
//! A gesture acquires an [`InputLock`] when it starts. Dropping the guard
//! releases it, so every exit path (end, cancel, detach, panic unwinding)
//! gives the container its scrolling back.

use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// Owner of the lock state for one scrollable container.
///
/// Cheap to clone; clones share state. Single-threaded by construction.
#[derive(Debug, Clone, Default)]
pub struct InputLockHost {
    holders: Rc<Cell<usize>>,
}

impl InputLockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for the lifetime of the returned guard.
    pub fn acquire(&self, reason: &'static str) -> InputLock {
        self.holders.set(self.holders.get() + 1);
        trace!(reason, holders = self.holders.get(), "Input lock acquired");
        InputLock {
            holders: Rc::clone(&self.holders),
            reason,
        }
    }

    /// Whether any gesture currently holds the lock.
    ///
    /// While locked, the container must not scroll and native touch
    /// panning is disabled.
    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }

    /// Number of live guards.
    pub fn holders(&self) -> usize {
        self.holders.get()
    }
}

/// RAII guard returned by [`InputLockHost::acquire`].
#[derive(Debug)]
pub struct InputLock {
    holders: Rc<Cell<usize>>,
    reason: &'static str,
}

impl InputLock {
    /// What acquired the lock.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl Drop for InputLock {
    fn drop(&mut self) {
        self.holders.set(self.holders.get().saturating_sub(1));
        trace!(reason = self.reason, holders = self.holders.get(), "Input lock released");
    }
}
