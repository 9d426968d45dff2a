//! Re-entrancy latch for operations that write through a channel they also
//! observe.
//!
//! While a [`ReplayLatch`] is held, the engine treats incoming change
//! notifications as its own echo. Dropping the latch releases it on every
//! exit path, including early returns and errors.

use std::sync::atomic::{AtomicBool, Ordering};

/// Scoped ownership of a replay flag.
#[derive(Debug)]
pub struct ReplayLatch<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ReplayLatch<'a> {
    /// Set the flag, or return `None` if it is already set.
    pub fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }

    /// Whether `flag` is currently held by some latch.
    pub fn is_held(flag: &AtomicBool) -> bool {
        flag.load(Ordering::Acquire)
    }
}

impl Drop for ReplayLatch<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
