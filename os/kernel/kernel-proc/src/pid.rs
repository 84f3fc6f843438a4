//! # Process Identifiers

use core::fmt;
use kernel_info::process::{INVALID_PID, KERNEL_PID, PID_MAX, PID_MIN};

/// A process identifier.
///
/// Any `i32` can be wrapped, because user programs pass arbitrary values to
/// `waitpid`; only [`Pid::slot`] decides whether it names a table entry.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Pid(i32);

impl Pid {
    /// "No process"; the parent of the kernel process.
    pub const INVALID: Self = Self(INVALID_PID);

    /// The kernel process.
    pub const KERNEL: Self = Self(KERNEL_PID);

    #[inline]
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Whether this pid lies in the range handed out to forked processes.
    #[inline]
    #[must_use]
    pub const fn is_user(self) -> bool {
        self.0 >= PID_MIN && self.0 < PID_MAX
    }

    /// Table slot of this pid, if it has one.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub(crate) const fn slot(self) -> Option<usize> {
        if self.0 >= 0 && self.0 < PID_MAX {
            Some(self.0 as usize)
        } else {
            None
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        Self(slot as i32)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Pid> for i32 {
    fn from(pid: Pid) -> Self {
        pid.0
    }
}
