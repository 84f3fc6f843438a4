//! # Error Numbers
//!
//! Values returned to user space in place of a system call result.

use kernel_proc::{ProcError, SpawnError, WaitError};

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Errno {
    #[error("out of memory")]
    ENOMEM = 3,
    #[error("try again later")]
    EAGAIN = 4,
    #[error("invalid argument")]
    EINVAL = 8,
    #[error("too many processes")]
    ENPROC = 12,
    #[error("no such process")]
    ESRCH = 15,
    #[error("no child process")]
    ECHILD = 16,
}

impl Errno {
    #[inline]
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<ProcError> for Errno {
    fn from(e: ProcError) -> Self {
        match e {
            ProcError::OutOfMemory | ProcError::Spawn(SpawnError::OutOfMemory) => Self::ENOMEM,
            ProcError::TooManyProcesses => Self::ENPROC,
            ProcError::Spawn(SpawnError::TooManyThreads) => Self::EAGAIN,
        }
    }
}

impl From<WaitError> for Errno {
    fn from(e: WaitError) -> Self {
        match e {
            WaitError::InvalidPid | WaitError::NoSuchProcess => Self::ESRCH,
            WaitError::NotAChild => Self::ECHILD,
        }
    }
}
