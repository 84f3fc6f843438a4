use crate::RawLock;
use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

/// A value guarded by the lock word `R`.
///
/// See [`SpinLock`](crate::SpinLock) and [`TicketLock`](crate::TicketLock).
pub struct Lock<T, R> {
    raw: R,
    cell: UnsafeCell<T>,
}

// Safety: mutual exclusion; only T: Send may cross threads.
unsafe impl<T: Send, R: RawLock + Sync> Sync for Lock<T, R> {}

impl<T, R: RawLock> Lock<T, R> {
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            raw: R::INIT,
            cell: UnsafeCell::new(value),
        }
    }

    /// Construct an unlocked lock in place at `slot` and borrow it for `'a`.
    ///
    /// This is how the coremap puts its own lock into the RAM it manages,
    /// before any allocator exists.
    ///
    /// # Safety
    /// `slot` must be non-null, aligned for `Self`, valid for writes of
    /// `size_of::<Self>()` bytes, and stay valid and otherwise unused for `'a`.
    pub unsafe fn init_at<'a>(slot: *mut Self, value: T) -> &'a Self {
        unsafe {
            slot.write(Self::new(value));
            &*slot
        }
    }

    #[inline]
    #[must_use]
    pub fn lock(&self) -> LockGuard<'_, T, R> {
        self.raw.lock();
        LockGuard { lock: self }
    }

    #[inline]
    #[must_use]
    pub fn try_lock(&self) -> Option<LockGuard<'_, T, R>> {
        self.raw.try_lock().then(|| LockGuard { lock: self })
    }

    #[inline]
    pub fn with_lock<U>(&self, f: impl FnOnce(&mut T) -> U) -> U {
        let mut g = self.lock();
        f(&mut g)
    }

    /// Racy snapshot; only meaningful for assertions.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }

    #[inline]
    #[must_use]
    pub const fn raw(&self) -> &R {
        &self.raw
    }
}

impl<T, R> Lock<T, R> {
    /// Direct access; `&mut self` rules out contention.
    #[inline]
    pub const fn get_mut(&mut self) -> &mut T {
        self.cell.get_mut()
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> T {
        self.cell.into_inner()
    }
}

pub struct LockGuard<'a, T, R: RawLock> {
    lock: &'a Lock<T, R>,
}

impl<T, R: RawLock> Deref for LockGuard<'_, T, R> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the guard proves the lock is held
        unsafe { &*self.lock.cell.get() }
    }
}

impl<T, R: RawLock> DerefMut for LockGuard<'_, T, R> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the guard proves the lock is held
        unsafe { &mut *self.lock.cell.get() }
    }
}

impl<T, R: RawLock> Drop for LockGuard<'_, T, R> {
    fn drop(&mut self) {
        // SAFETY: constructed only after acquiring
        unsafe { self.lock.raw.unlock() }
    }
}
