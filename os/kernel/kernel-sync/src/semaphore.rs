use core::hint::spin_loop;
use core::sync::atomic::{AtomicU32, Ordering};

/// Counting semaphore.
///
/// `p` waits until the count is positive and decrements it; `v` increments
/// it. Waiting busy-loops through a caller-supplied relax hook, so the
/// semaphore works with or without a scheduler underneath.
pub struct Semaphore {
    count: AtomicU32,
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Semaphore {
    #[must_use]
    pub const fn new(initial: u32) -> Self {
        Self {
            count: AtomicU32::new(initial),
        }
    }

    /// Decrement if positive; never waits.
    #[inline]
    #[must_use]
    pub fn try_p(&self) -> bool {
        let mut cur = self.count.load(Ordering::Relaxed);
        while cur > 0 {
            match self.count.compare_exchange_weak(
                cur,
                cur - 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(seen) => cur = seen,
            }
        }
        false
    }

    /// Wait for a positive count using [`spin_loop`] between polls.
    #[inline]
    pub fn p(&self) {
        self.p_with(spin_loop);
    }

    /// Wait for a positive count, calling `relax` between polls.
    pub fn p_with(&self, mut relax: impl FnMut()) {
        while !self.try_p() {
            while self.count.load(Ordering::Relaxed) == 0 {
                relax();
            }
        }
    }

    /// Increment the count, releasing one waiter.
    #[inline]
    pub fn v(&self) {
        let prev = self.count.fetch_add(1, Ordering::Release);
        assert!(prev < u32::MAX, "BUG: semaphore count overflow");
    }

    /// Current count; a snapshot.
    #[inline]
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}
