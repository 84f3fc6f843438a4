//! # Processes
//!
//! The process table and the lifecycle built on it:
//!
//! * [`ProcessTable::fork`] duplicates the caller into a new pid whose first
//!   thread starts in [`ForkedChild::enter_forked_process`];
//! * [`ProcessTable::exit`] records an [`ExitStatus`] and wakes the parent;
//! * [`ProcessTable::wait`] blocks for a child's exit and reaps it;
//! * a record whose parent is gone is torn down as soon as it has exited;
//! * [`ProcessTable::destroy_process`] tears a record down explicitly.
//!
//! The address space and thread implementations are supplied by a
//! [`Platform`]; the calling process is always passed in explicitly as a pid
//! or a [`Context`].
//!
//! ## Lifecycle
//!
//! ```text
//!   fork ──► Running ──exit──► Exited ──wait──► Reaped (slot free)
//! ```
//!
//! ## Locking
//!
//! | Lock | Protects |
//! |------|----------|
//! | table [`TicketLock`](kernel_sync::TicketLock) | slot allocation, lookup, removal |
//! | per-record [`SpinLock`](kernel_sync::SpinLock) | address space, cwd, thread count, exit status |
//! | per-record [`Semaphore`](kernel_sync::Semaphore) | exit notification |
//!
//! Record locks may be taken under the table lock, never the other way round.
//! Nothing blocks while holding either.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod error;
mod exit_status;
mod fork;
mod pid;
mod platform;
mod process;
mod table;
mod trapframe;

pub use error::{ProcError, WaitError};
pub use exit_status::ExitStatus;
pub use fork::{Context, ForkedChild, UserEntry};
pub use pid::Pid;
pub use platform::{AddressSpace, AddressSpaceError, Platform, SpawnError};
pub use process::Process;
pub use table::ProcessTable;
pub use trapframe::{SYSCALL_INSN_LEN, TrapFrame};
