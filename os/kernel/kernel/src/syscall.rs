//! # Process System Calls
//!
//! `fork`, `getpid`, `waitpid` and `_exit` on top of the process table. The
//! trap handler decodes arguments, calls in here, and stores the result or
//! the [`Errno`] into the caller's trapframe.

use crate::errno::Errno;
use kernel_proc::{Context, ExitStatus, Pid, Platform, ProcessTable};
use log::trace;

/// `waitpid` option: return at once if the child is still running.
pub const WNOHANG: i32 = 1;

/// Leave the current thread for good.
pub trait ThreadExit {
    fn thread_exit(self) -> !;
}

pub struct ProcessSyscalls<'t, P: Platform> {
    table: &'t ProcessTable<P>,
}

impl<'t, P: Platform> ProcessSyscalls<'t, P> {
    #[must_use]
    pub const fn new(table: &'t ProcessTable<P>) -> Self {
        Self { table }
    }

    /// The parent's side of `fork`: the child's pid.
    ///
    /// # Errors
    /// `ENOMEM`, `ENPROC` or `EAGAIN` if the child could not be made.
    pub fn sys_fork(&self, ctx: &Context<'_>) -> Result<Pid, Errno> {
        let child = self.table.fork(ctx)?;
        trace!("syscall: fork in pid {} -> {child}", ctx.pid);
        Ok(child)
    }

    #[inline]
    #[must_use]
    pub fn sys_getpid(&self, ctx: &Context<'_>) -> Pid {
        ctx.pid
    }

    /// Collect the exit status of child `pid` of `caller`.
    ///
    /// Returns `Ok(None)` if `options` is [`WNOHANG`] and the child is still
    /// running; the user-visible result is 0 in that case.
    ///
    /// # Errors
    /// - `EINVAL` for options other than 0 and [`WNOHANG`].
    /// - `ESRCH` if there is no such process.
    /// - `ECHILD` if it is not a child of `caller`.
    pub fn sys_waitpid(
        &self,
        caller: Pid,
        pid: i32,
        options: i32,
    ) -> Result<Option<(Pid, ExitStatus)>, Errno> {
        let target = Pid::new(pid);
        let status = match options {
            0 => Some(self.table.wait(caller, target)?),
            WNOHANG => self.table.try_wait(caller, target)?,
            _ => return Err(Errno::EINVAL),
        };
        Ok(status.map(|status| (target, status)))
    }

    /// Record the exit of `caller` and leave through `exit`.
    pub fn sys_exit(&self, caller: Pid, code: i32, exit: impl ThreadExit) -> ! {
        let thread = self.table.exit(caller, code);
        drop(thread);
        exit.thread_exit()
    }
}
