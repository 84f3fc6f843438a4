//! # Fork Trampoline
//!
//! A forked child does not start at a function of its own: its first thread
//! runs [`ForkedChild::enter_forked_process`], which turns the parent's saved
//! registers into the child's return from `fork` and drops into user mode.

use crate::pid::Pid;
use crate::platform::{AddressSpace, Platform};
use crate::process::Process;
use crate::trapframe::TrapFrame;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

/// The calling process and the registers it trapped with.
#[derive(Debug, Copy, Clone)]
pub struct Context<'a> {
    pub pid: Pid,
    pub trapframe: &'a TrapFrame,
}

impl<'a> Context<'a> {
    #[must_use]
    pub const fn new(pid: Pid, trapframe: &'a TrapFrame) -> Self {
        Self { pid, trapframe }
    }
}

/// Return to user mode with a prepared register set.
pub trait UserEntry {
    fn enter(self, trapframe: TrapFrame) -> !;
}

/// Start state of a forked child: its record and a private copy of the
/// parent's trapframe.
pub struct ForkedChild<P: Platform> {
    process: Arc<Process<P>>,
    trapframe: Box<TrapFrame>,
}

impl<P: Platform> ForkedChild<P> {
    pub(crate) const fn new(process: Arc<Process<P>>, trapframe: Box<TrapFrame>) -> Self {
        Self { process, trapframe }
    }

    #[inline]
    #[must_use]
    pub fn process(&self) -> &Arc<Process<P>> {
        &self.process
    }

    #[inline]
    #[must_use]
    pub fn pid(&self) -> Pid {
        self.process.pid()
    }

    /// Activate the child's address space and return the registers it must
    /// resume with: `fork` returns 0, past the syscall instruction.
    #[must_use]
    pub fn prepare(&self) -> TrapFrame {
        let mut tf = *self.trapframe;
        tf.complete_syscall(0);
        self.process.with_address_space(|space| {
            if let Some(space) = space {
                space.activate();
            }
        });
        tf
    }

    /// Thread entry of every forked child.
    pub fn enter_forked_process(self, user: impl UserEntry) -> ! {
        let tf = self.prepare();
        drop(self);
        user.enter(tf)
    }
}

impl<P: Platform> fmt::Debug for ForkedChild<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForkedChild")
            .field("pid", &self.pid())
            .field("rip", &format_args!("{:#x}", self.trapframe.rip))
            .finish()
    }
}
