//! # Encoded Exit Status
//!
//! The value `waitpid` hands back to user space. The low two bits say how the
//! process ended, the rest carry the exit code or signal number:
//!
//! ```text
//!  31                            2 1 0
//! ┌───────────────────────────────┬───┐
//! │ exit code (8 bits) / signal   │how│   how: 0 = exited, 1 = signaled
//! └───────────────────────────────┴───┘
//! ```

use core::fmt;

const HOW_MASK: i32 = 0b11;
const HOW_EXITED: i32 = 0;
const HOW_SIGNALED: i32 = 1;

/// How a process ended, as reported by `wait`.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ExitStatus(i32);

impl ExitStatus {
    /// Normal exit with `code`; only the low 8 bits of `code` are kept.
    #[inline]
    #[must_use]
    pub const fn exited(code: i32) -> Self {
        Self(((code & 0xff) << 2) | HOW_EXITED)
    }

    /// Termination by signal `sig`.
    #[inline]
    #[must_use]
    pub const fn signaled(sig: i32) -> Self {
        Self((sig << 2) | HOW_SIGNALED)
    }

    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_exited(self) -> bool {
        self.0 & HOW_MASK == HOW_EXITED
    }

    #[inline]
    #[must_use]
    pub const fn is_signaled(self) -> bool {
        self.0 & HOW_MASK == HOW_SIGNALED
    }

    /// Exit code of a normal exit.
    #[inline]
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        if self.is_exited() { Some(self.0 >> 2) } else { None }
    }

    /// Signal number of a signaled termination.
    #[inline]
    #[must_use]
    pub const fn signal(self) -> Option<i32> {
        if self.is_signaled() { Some(self.0 >> 2) } else { None }
    }
}

impl fmt::Debug for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code(), self.signal()) {
            (Some(code), _) => write!(f, "ExitStatus(exited {code})"),
            (_, Some(sig)) => write!(f, "ExitStatus(signal {sig})"),
            _ => write!(f, "ExitStatus({:#x})", self.0),
        }
    }
}
