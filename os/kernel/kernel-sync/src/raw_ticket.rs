use crate::RawLock;
use core::hint::spin_loop;
use core::sync::atomic::{AtomicUsize, Ordering};

/// FIFO ticket lock word: waiters are served in the order they arrived.
pub struct RawTicket {
    next: AtomicUsize,
    serving: AtomicUsize,
}

impl RawTicket {
    /// Tickets drawn but not yet served, the holder included.
    #[inline]
    #[must_use]
    pub fn queued(&self) -> usize {
        let serving = self.serving.load(Ordering::Relaxed);
        self.next.load(Ordering::Relaxed).wrapping_sub(serving)
    }
}

unsafe impl RawLock for RawTicket {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self {
        next: AtomicUsize::new(0),
        serving: AtomicUsize::new(0),
    };

    #[inline]
    fn lock(&self) {
        let ticket = self.next.fetch_add(1, Ordering::Relaxed);
        while self.serving.load(Ordering::Acquire) != ticket {
            spin_loop();
        }
    }

    #[inline]
    fn try_lock(&self) -> bool {
        let serving = self.serving.load(Ordering::Relaxed);
        self.next
            .compare_exchange(serving, serving.wrapping_add(1), Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.queued() != 0
    }

    #[inline]
    unsafe fn unlock(&self) {
        // only the holder writes `serving`
        let t = self.serving.load(Ordering::Relaxed);
        self.serving.store(t.wrapping_add(1), Ordering::Release);
    }
}
