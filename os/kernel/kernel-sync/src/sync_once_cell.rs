use core::cell::UnsafeCell;
use core::hint::spin_loop;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU8, Ordering};

const EMPTY: u8 = 0;
const WRITING: u8 = 1;
const READY: u8 = 2;

/// Write-once cell for boot-time singletons such as the kernel coremap.
///
/// The first caller of [`set`](Self::set) or [`get_or_init`](Self::get_or_init)
/// wins; everyone else sees its value.
pub struct SyncOnceCell<T> {
    state: AtomicU8,
    value: UnsafeCell<MaybeUninit<T>>,
}

// Safety: the value is written once, before READY, and only shared afterwards.
unsafe impl<T: Sync + Send> Sync for SyncOnceCell<T> {}
unsafe impl<T: Send> Send for SyncOnceCell<T> {}

impl<T> Default for SyncOnceCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SyncOnceCell<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        // SAFETY: READY was observed with Acquire
        (self.state.load(Ordering::Acquire) == READY).then(|| unsafe { self.value_ref() })
    }

    /// Store `value` if the cell is still empty; hands it back otherwise.
    ///
    /// # Errors
    /// `Err(value)` if the cell is initialized or being initialized.
    pub fn set(&self, value: T) -> Result<&T, T> {
        if self.claim() {
            // SAFETY: claimed
            Ok(unsafe { self.publish(value) })
        } else {
            Err(value)
        }
    }

    /// Initialize at most once and return the value.
    ///
    /// Spins while another caller runs its `init`.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        if let Some(v) = self.get() {
            return v;
        }
        if self.claim() {
            // SAFETY: claimed
            return unsafe { self.publish(init()) };
        }
        while self.state.load(Ordering::Acquire) != READY {
            spin_loop();
        }
        // SAFETY: READY
        unsafe { self.value_ref() }
    }

    fn claim(&self) -> bool {
        self.state
            .compare_exchange(EMPTY, WRITING, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// # Safety
    /// The caller must have won [`claim`](Self::claim).
    unsafe fn publish(&self, value: T) -> &T {
        unsafe { (*self.value.get()).write(value) };
        self.state.store(READY, Ordering::Release);
        // SAFETY: just written
        unsafe { self.value_ref() }
    }

    /// # Safety
    /// The state must be READY.
    unsafe fn value_ref(&self) -> &T {
        unsafe { (*self.value.get()).assume_init_ref() }
    }
}

impl<T> Drop for SyncOnceCell<T> {
    fn drop(&mut self) {
        if *self.state.get_mut() == READY {
            // SAFETY: READY means initialized; `&mut self` means unshared
            unsafe { self.value.get_mut().assume_init_drop() };
        }
    }
}
