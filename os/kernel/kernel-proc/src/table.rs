//! # Process Table
//!
//! A fixed arena of `PID_MAX` slots indexed by pid. Slot allocation, lookup
//! and removal are serialized by one ticket lock; nothing blocks while
//! holding it. Removing a record orphans its children under the same lock,
//! so a recycled pid never inherits them.

use crate::error::{ProcError, WaitError};
use crate::exit_status::ExitStatus;
use crate::fork::{Context, ForkedChild};
use crate::pid::Pid;
use crate::platform::{AddressSpace, Platform};
use crate::process::Process;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::array;
use kernel_info::process::{KERNEL_PROCESS_NAME, PID_MAX, PID_MIN};
use kernel_sync::TicketLock;
use log::{debug, info, warn};

#[allow(clippy::cast_sign_loss)]
const SLOTS: usize = PID_MAX as usize;

type Slots<P> = [Option<Arc<Process<P>>>; SLOTS];

pub struct ProcessTable<P: Platform> {
    slots: TicketLock<Slots<P>>,
    platform: P,
}

impl<P: Platform> ProcessTable<P> {
    /// Create the table with the kernel process installed at [`Pid::KERNEL`].
    ///
    /// # Panics
    /// If the kernel process cannot be created.
    pub fn bootstrap(platform: P) -> Self {
        let table = Self {
            slots: TicketLock::new(array::from_fn(|_| None)),
            platform,
        };
        let kernel = match table.create_process(KERNEL_PROCESS_NAME) {
            Ok(p) => p,
            Err(e) => panic!("BUG: cannot create the kernel process: {e}"),
        };
        kernel.set_ids(Pid::KERNEL, Pid::INVALID);
        table.slots.with_lock(|slots| {
            slots[slot_of(Pid::KERNEL)] = Some(Arc::new(kernel));
        });
        info!("proc: kernel process {KERNEL_PROCESS_NAME} is pid {}", Pid::KERNEL);
        table
    }

    #[inline]
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// A fresh record named `name`: no threads, no address space, no cwd,
    /// no parent. It is not in the table yet.
    ///
    /// # Errors
    /// [`ProcError::OutOfMemory`] if the name cannot be copied.
    pub fn create_process(&self, name: &str) -> Result<Process<P>, ProcError> {
        let mut owned = String::new();
        owned
            .try_reserve_exact(name.len())
            .map_err(|_| ProcError::OutOfMemory)?;
        owned.push_str(name);
        Ok(Process::new(owned))
    }

    /// A fresh record for running a program on behalf of `parent`; it has
    /// no address space and shares the parent's working directory.
    ///
    /// # Errors
    /// [`ProcError::OutOfMemory`] if the name cannot be copied.
    pub fn create_runprogram(&self, name: &str, parent: Pid) -> Result<Process<P>, ProcError> {
        let process = self.create_process(name)?;
        if let Some(parent) = self.get(parent) {
            process.set_cwd(parent.cwd());
        }
        Ok(process)
    }

    /// Lowest free pid in `PID_MIN..PID_MAX`.
    ///
    /// The pid stays free until something is inserted, so this is only a
    /// hint; [`insert`](Self::insert) allocates atomically.
    #[must_use]
    pub fn allocate_pid(&self) -> Option<Pid> {
        self.slots.with_lock(|slots| lowest_free(slots))
    }

    /// Give `process` the lowest free pid, make it a child of `ppid` and
    /// publish it.
    ///
    /// # Errors
    /// [`ProcError::TooManyProcesses`] if every pid is taken.
    pub fn insert(&self, process: Process<P>, ppid: Pid) -> Result<Arc<Process<P>>, ProcError> {
        let mut slots = self.slots.lock();
        let Some(pid) = lowest_free(&slots) else {
            drop(slots);
            warn!("proc: process table full");
            return Err(ProcError::TooManyProcesses);
        };
        process.set_ids(pid, ppid);
        let process = Arc::new(process);
        slots[slot_of(pid)] = Some(Arc::clone(&process));
        Ok(process)
    }

    #[must_use]
    pub fn get(&self, pid: Pid) -> Option<Arc<Process<P>>> {
        let slot = pid.slot()?;
        self.slots.with_lock(|slots| slots[slot].clone())
    }

    #[must_use]
    pub fn parent_of(&self, pid: Pid) -> Option<Pid> {
        self.get(pid).map(|p| p.ppid())
    }

    /// Number of occupied slots, the kernel process included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .with_lock(|slots| slots.iter().filter(|s| s.is_some()).count())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duplicate the calling process.
    ///
    /// The child gets the next free pid, a copy of the caller's address
    /// space, the caller's cwd and a thread that resumes from the caller's
    /// trapframe with `fork` returning 0. On any failure the child is gone
    /// again before this returns.
    ///
    /// # Errors
    /// - [`ProcError::OutOfMemory`] if the record or the address space copy
    ///   cannot be allocated.
    /// - [`ProcError::TooManyProcesses`] if the table is full.
    /// - [`ProcError::Spawn`] if the thread cannot be started.
    ///
    /// # Panics
    /// If the caller is not in the table.
    pub fn fork(&self, ctx: &Context<'_>) -> Result<Pid, ProcError> {
        let Some(parent) = self.get(ctx.pid) else {
            panic!("BUG: fork from pid {} which is not in the table", ctx.pid);
        };

        let child = self.create_process(parent.name())?;
        child.set_cwd(parent.cwd());
        let child = self.insert(child, parent.pid())?;
        let pid = child.pid();

        let space = parent.with_address_space(|space| space.map(|s| s.copy()).transpose());
        match space {
            Ok(space) => {
                child.set_address_space(space);
            }
            Err(e) => {
                warn!("proc: fork of pid {}: {e}", parent.pid());
                self.discard(pid);
                return Err(e.into());
            }
        }

        let entry = ForkedChild::new(Arc::clone(&child), Box::new(*ctx.trapframe));
        child.add_thread();
        match self.platform.spawn_with_entry(child.name(), &child, entry) {
            Ok(thread) => child.set_thread(thread),
            Err(e) => {
                warn!("proc: fork of pid {}: {e}", parent.pid());
                child.remove_thread();
                self.discard(pid);
                return Err(e.into());
            }
        }

        debug!("proc: pid {} forked pid {pid} ({})", parent.pid(), child.name());
        Ok(pid)
    }

    /// Record a normal exit of `pid` with `code` and wake its parent.
    ///
    /// The record stays in the table until it is reaped by
    /// [`wait`](Self::wait), unless its parent is already gone; then it is
    /// torn down right away. Must not be called with the table lock held.
    ///
    /// # Panics
    /// If `pid` is not in the table or already exited.
    pub fn exit(&self, pid: Pid, code: i32) -> Option<P::Thread> {
        let Some(process) = self.get(pid) else {
            panic!("BUG: exit of pid {pid} which is not in the table");
        };
        let status = ExitStatus::exited(code);
        debug!("proc: pid {pid} exits with {status:?}");
        let (thread, unreapable) = process.exit(status);
        if unreapable && pid != Pid::KERNEL && self.remove(&process) {
            debug!("proc: orphan pid {pid} released at exit");
        }
        thread
    }

    /// Block until child `target` of `caller` exits, then reap it.
    ///
    /// # Errors
    /// - [`WaitError::NotAChild`] for the caller itself, its parent, or a
    ///   process with another parent.
    /// - [`WaitError::InvalidPid`] if `target` is outside the process range.
    /// - [`WaitError::NoSuchProcess`] if there is no such process, or another
    ///   waiter reaped it first.
    pub fn wait(&self, caller: Pid, target: Pid) -> Result<ExitStatus, WaitError> {
        let child = self.waitable(caller, target)?;
        let status = child
            .wait_exited(|| self.platform.relax())
            .ok_or(WaitError::NoSuchProcess)?;
        self.reap(&child)?;
        Ok(status)
    }

    /// Like [`wait`](Self::wait), but returns `Ok(None)` instead of
    /// blocking while the child is still running.
    ///
    /// # Errors
    /// As for [`wait`](Self::wait).
    pub fn try_wait(&self, caller: Pid, target: Pid) -> Result<Option<ExitStatus>, WaitError> {
        let child = self.waitable(caller, target)?;
        let Some(status) = child.exit_status() else {
            return Ok(None);
        };
        self.reap(&child)?;
        Ok(Some(status))
    }

    /// Remove `pid` from the table and release its address space and cwd.
    ///
    /// # Panics
    /// If `pid` is the kernel process, is not in the table, or still has
    /// threads.
    pub fn destroy_process(&self, pid: Pid) {
        assert_ne!(pid, Pid::KERNEL, "BUG: attempt to destroy the kernel process");
        let Some(process) = self.get(pid) else {
            panic!("BUG: destroy of pid {pid} which is not in the table");
        };
        assert_eq!(
            process.thread_count(),
            0,
            "BUG: destroying pid {pid} with live threads"
        );
        self.discard(pid);
        debug!("proc: destroyed pid {pid}");
    }

    fn waitable(&self, caller: Pid, target: Pid) -> Result<Arc<Process<P>>, WaitError> {
        if target.as_i32() <= Pid::INVALID.as_i32() {
            return Err(WaitError::InvalidPid);
        }
        if target == caller || self.parent_of(caller) == Some(target) {
            return Err(WaitError::NotAChild);
        }
        if !target.is_user() {
            return Err(WaitError::InvalidPid);
        }
        let child = self.get(target).ok_or(WaitError::NoSuchProcess)?;
        if child.ppid() != caller {
            return Err(WaitError::NotAChild);
        }
        Ok(child)
    }

    /// Clear the slot of an exited `child`, unless someone else already did.
    fn reap(&self, child: &Arc<Process<P>>) -> Result<(), WaitError> {
        if !self.remove(child) {
            return Err(WaitError::NoSuchProcess);
        }
        debug!("proc: reaped pid {}", child.pid());
        Ok(())
    }

    /// Take `process` out of its slot if it is still there, and release it.
    fn remove(&self, process: &Arc<Process<P>>) -> bool {
        let pid = process.pid();
        let mut released = Vec::new();
        let removed = self.slots.with_lock(|slots| {
            let slot = &mut slots[slot_of(pid)];
            if !slot.as_ref().is_some_and(|p| Arc::ptr_eq(p, process)) {
                return false;
            }
            released.extend(slot.take());
            orphan_children(slots, pid, &mut released);
            true
        });
        release(released);
        removed
    }

    /// Take `pid` out of the table and release its resources. Waiters on
    /// a record that never exited see it disappear.
    fn discard(&self, pid: Pid) {
        let mut released = Vec::new();
        self.slots.with_lock(|slots| {
            if let Some(process) = slots[slot_of(pid)].take() {
                process.abandon();
                released.push(process);
                orphan_children(slots, pid, &mut released);
            }
        });
        release(released);
    }
}

/// Detach every descendant of the removed `pid`. Children that already
/// exited can never be reaped now; they leave the table too, and their own
/// children are orphaned in turn.
fn orphan_children<P: Platform>(
    slots: &mut Slots<P>,
    pid: Pid,
    released: &mut Vec<Arc<Process<P>>>,
) {
    let mut parents = Vec::from([pid]);
    while let Some(parent) = parents.pop() {
        for slot in slots.iter_mut() {
            let unreapable = match slot {
                Some(p) if p.ppid() == parent => p.orphan(),
                _ => false,
            };
            if unreapable && let Some(p) = slot.take() {
                debug!("proc: orphan pid {} released with its parent {parent}", p.pid());
                parents.push(p.pid());
                released.push(p);
            }
        }
    }
}

fn release<P: Platform>(released: Vec<Arc<Process<P>>>) {
    for process in released {
        process.teardown();
    }
}

#[inline]
fn slot_of(pid: Pid) -> usize {
    pid.slot()
        .unwrap_or_else(|| panic!("BUG: pid {pid} has no table slot"))
}

fn lowest_free<P: Platform>(slots: &Slots<P>) -> Option<Pid> {
    #[allow(clippy::cast_sign_loss)]
    let first = PID_MIN as usize;
    (first..SLOTS).find(|&i| slots[i].is_none()).map(Pid::from_slot)
}
