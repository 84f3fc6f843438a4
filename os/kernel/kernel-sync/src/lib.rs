//! # Kernel synchronization primitives
//!
//! Everything here busy-waits; none of it needs a scheduler, so the same
//! primitives protect the coremap before any thread exists and the process
//! table afterwards.
//!
//! | Primitive | Used for |
//! |-----------|----------|
//! | [`SpinLock`] | the coremap's exclusive lock, placed into raw RAM at boot; per-process fields |
//! | [`TicketLock`] | the process table (FIFO fairness between forking CPUs) |
//! | [`Semaphore`] | exit notification from a child to its parent |
//! | [`SyncOnceCell`] | kernel-global singletons initialized during boot |
//!
//! Both lock flavors are the same [`Lock`] over a different [`RawLock`] word.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod lock;
mod raw_spin;
mod raw_ticket;
mod semaphore;
mod sync_once_cell;

pub use lock::{Lock, LockGuard};
pub use raw_spin::RawSpin;
pub use raw_ticket::RawTicket;
pub use semaphore::Semaphore;
pub use sync_once_cell::SyncOnceCell;

pub type SpinLock<T> = Lock<T, RawSpin>;
pub type SpinLockGuard<'a, T> = LockGuard<'a, T, RawSpin>;
pub type TicketLock<T> = Lock<T, RawTicket>;
pub type TicketLockGuard<'a, T> = LockGuard<'a, T, RawTicket>;

/// A bare lock word.
///
/// # Safety
/// `lock` and a successful `try_lock` must not return while another caller
/// holds the word, and must synchronize-with the previous `unlock`.
pub unsafe trait RawLock {
    /// The unlocked state.
    const INIT: Self;

    fn lock(&self);

    fn try_lock(&self) -> bool;

    /// Racy snapshot; only meaningful for assertions.
    fn is_locked(&self) -> bool;

    /// # Safety
    /// The caller must hold the lock.
    unsafe fn unlock(&self);
}
