//! Reference-counted background scroll lock.
//!
//! Any number of modal surfaces may hold the lock at once. The host is told
//! to lock when the first holder arrives and to unlock when the last one
//! leaves, so closing one of two stacked dialogs keeps scrolling suppressed.

use devui_core::Host;
use std::cell::Cell;
use std::rc::Rc;

/// Shared lock over a host's background scrolling.
pub struct ScrollLock {
    host: Rc<dyn Host>,
    holders: Cell<usize>,
}

impl ScrollLock {
    /// Create an unlocked scroll lock for a host.
    #[must_use]
    pub fn new(host: Rc<dyn Host>) -> Rc<Self> {
        Rc::new(Self {
            host,
            holders: Cell::new(0),
        })
    }

    /// Take a hold on the lock for the lifetime of the returned guard.
    #[must_use = "dropping the guard releases the lock immediately"]
    pub fn acquire(self: &Rc<Self>) -> ScrollLockGuard {
        let holders = self.holders.get() + 1;
        self.holders.set(holders);
        tracing::debug!(holders, "scroll lock acquired");
        if holders == 1 {
            self.host.set_scroll_locked(true);
        }
        ScrollLockGuard {
            lock: Rc::clone(self),
        }
    }

    /// Number of outstanding guards.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.holders.get()
    }

    /// Whether scrolling is currently suppressed.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }

    fn release(&self) {
        let holders = self.holders.get().saturating_sub(1);
        self.holders.set(holders);
        tracing::debug!(holders, "scroll lock released");
        if holders == 0 {
            self.host.set_scroll_locked(false);
        }
    }
}

/// One hold on a [`ScrollLock`]; released on drop.
pub struct ScrollLockGuard {
    lock: Rc<ScrollLock>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}
