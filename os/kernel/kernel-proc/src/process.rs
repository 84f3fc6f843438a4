//! # Process Record

use crate::exit_status::ExitStatus;
use crate::pid::Pid;
use crate::platform::Platform;
use alloc::string::String;
use core::fmt;
use core::sync::atomic::{AtomicI32, Ordering};
use kernel_sync::{Semaphore, SpinLock};

/// Mutable per-process state, guarded by the record's own lock.
struct Inner<P: Platform> {
    address_space: Option<P::AddressSpace>,
    cwd: Option<P::Vnode>,
    threads: u32,
    thread: Option<P::Thread>,
    exit_status: Option<ExitStatus>,
}

/// One process.
///
/// A record moves through `Running → Exited → Reaped`. It is `Exited` once
/// [`exit`](Self::exit) has stored a status, and `Reaped` once the table has
/// dropped its slot; neither step can be undone.
pub struct Process<P: Platform> {
    pid: AtomicI32,
    ppid: AtomicI32,
    name: String,
    inner: SpinLock<Inner<P>>,
    exit_sem: Semaphore,
}

impl<P: Platform> Process<P> {
    /// A record with no threads, no address space, no cwd and no parent,
    /// not yet in any table.
    pub(crate) fn new(name: String) -> Self {
        Self {
            pid: AtomicI32::new(Pid::INVALID.as_i32()),
            ppid: AtomicI32::new(Pid::INVALID.as_i32()),
            name,
            inner: SpinLock::new(Inner {
                address_space: None,
                cwd: None,
                threads: 0,
                thread: None,
                exit_status: None,
            }),
            exit_sem: Semaphore::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn pid(&self) -> Pid {
        Pid::new(self.pid.load(Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub fn ppid(&self) -> Pid {
        Pid::new(self.ppid.load(Ordering::Relaxed))
    }

    /// Only called by the table, under its lock, before the record is visible.
    pub(crate) fn set_ids(&self, pid: Pid, ppid: Pid) {
        self.pid.store(pid.as_i32(), Ordering::Relaxed);
        self.ppid.store(ppid.as_i32(), Ordering::Relaxed);
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `f` on the address space while holding the record lock.
    pub fn with_address_space<R>(&self, f: impl FnOnce(Option<&mut P::AddressSpace>) -> R) -> R {
        self.inner.with_lock(|inner| f(inner.address_space.as_mut()))
    }

    /// Install `space` and return the previous one.
    pub fn set_address_space(&self, space: Option<P::AddressSpace>) -> Option<P::AddressSpace> {
        self.inner
            .with_lock(|inner| core::mem::replace(&mut inner.address_space, space))
    }

    #[must_use]
    pub fn has_address_space(&self) -> bool {
        self.inner.with_lock(|inner| inner.address_space.is_some())
    }

    /// Another reference to the working directory.
    #[must_use]
    pub fn cwd(&self) -> Option<P::Vnode> {
        self.inner.with_lock(|inner| inner.cwd.clone())
    }

    pub fn set_cwd(&self, cwd: Option<P::Vnode>) -> Option<P::Vnode> {
        self.inner
            .with_lock(|inner| core::mem::replace(&mut inner.cwd, cwd))
    }

    #[must_use]
    pub fn thread_count(&self) -> u32 {
        self.inner.with_lock(|inner| inner.threads)
    }

    /// Account for one more thread running in this process.
    pub fn add_thread(&self) {
        self.inner.with_lock(|inner| {
            inner.threads = inner
                .threads
                .checked_add(1)
                .unwrap_or_else(|| panic!("BUG: thread count overflow in pid {}", self.pid()));
        });
    }

    /// Remember `thread` as the process's execution context, unless every
    /// thread has already left.
    pub fn set_thread(&self, thread: P::Thread) {
        self.inner.with_lock(|inner| {
            if inner.threads > 0 && inner.exit_status.is_none() {
                inner.thread = Some(thread);
            }
        });
    }

    /// Account for a thread leaving this process.
    ///
    /// # Panics
    /// If no thread is attached.
    pub fn remove_thread(&self) -> Option<P::Thread> {
        self.inner.with_lock(|inner| {
            assert!(inner.threads > 0, "BUG: pid {} has no thread to remove", self.pid());
            inner.threads -= 1;
            inner.thread.take()
        })
    }

    #[must_use]
    pub fn has_exited(&self) -> bool {
        self.inner.with_lock(|inner| inner.exit_status.is_some())
    }

    #[must_use]
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.inner.with_lock(|inner| inner.exit_status)
    }

    /// Record `status`, detach the calling thread and wake the waiter.
    ///
    /// Also reports whether the record is now an orphan nobody will reap:
    /// parentless and without threads.
    ///
    /// # Panics
    /// If the process already exited.
    pub(crate) fn exit(&self, status: ExitStatus) -> (Option<P::Thread>, bool) {
        let (thread, unreapable) = self.inner.with_lock(|inner| {
            assert!(inner.exit_status.is_none(), "BUG: pid {} exited twice", self.pid());
            inner.exit_status = Some(status);
            if inner.threads > 0 {
                inner.threads -= 1;
            }
            let unreapable = self.ppid() == Pid::INVALID && inner.threads == 0;
            (inner.thread.take(), unreapable)
        });
        self.exit_sem.v();
        (thread, unreapable)
    }

    /// Detach from a parent that is gone.
    ///
    /// Returns `true` if the record already exited and has no threads, so
    /// nobody can reap it any more. Serialized with [`exit`](Self::exit) by
    /// the record lock.
    pub(crate) fn orphan(&self) -> bool {
        self.inner.with_lock(|inner| {
            self.ppid.store(Pid::INVALID.as_i32(), Ordering::Relaxed);
            inner.exit_status.is_some() && inner.threads == 0
        })
    }

    /// Wake waiters of a record that leaves the table without exiting.
    pub(crate) fn abandon(&self) {
        self.exit_sem.v();
    }

    /// Block until [`exit`](Self::exit) or [`abandon`](Self::abandon) has
    /// run, polling with `relax`. `None` if the record was abandoned.
    ///
    /// The semaphore is posted again afterwards, so any number of waiters
    /// observe the same exit.
    pub(crate) fn wait_exited(&self, relax: impl FnMut()) -> Option<ExitStatus> {
        if !self.has_exited() {
            self.exit_sem.p_with(relax);
            self.exit_sem.v();
        }
        self.exit_status()
    }

    /// Release the address space and cwd.
    ///
    /// # Panics
    /// If threads are still attached.
    pub(crate) fn teardown(&self) {
        let (space, cwd) = self.inner.with_lock(|inner| {
            assert_eq!(
                inner.threads,
                0,
                "BUG: destroying pid {} with live threads",
                self.pid()
            );
            (inner.address_space.take(), inner.cwd.take())
        });
        drop(space);
        drop(cwd);
    }
}

impl<P: Platform> fmt::Debug for Process<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid())
            .field("ppid", &self.ppid())
            .field("name", &self.name)
            .field("exit_status", &self.exit_status())
            .finish_non_exhaustive()
    }
}
