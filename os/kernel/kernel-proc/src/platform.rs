//! # Collaborator Seam
//!
//! The process table drives address spaces and threads it does not own the
//! implementation of. A [`Platform`] bundles them: the kernel plugs in its VM
//! system and scheduler, tests plug in counting fakes.

use crate::pid::Pid;
use crate::process::Process;
use crate::fork::ForkedChild;
use alloc::sync::Arc;

/// A user address space, exclusively owned by one process.
///
/// Dropping the value destroys the address space.
pub trait AddressSpace: Send + Sized {
    /// Duplicate this address space for a forked child.
    ///
    /// # Errors
    /// [`AddressSpaceError`] if the copy could not be built.
    fn copy(&self) -> Result<Self, AddressSpaceError>;

    /// Make this the address space of the running CPU.
    fn activate(&self);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("address space copy failed: out of memory")]
pub struct AddressSpaceError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("out of memory for the thread")]
    OutOfMemory,
    #[error("too many threads")]
    TooManyThreads,
}

pub trait Platform: Send + Sync + Sized {
    type AddressSpace: AddressSpace;

    /// Working directory handle; cloning takes another reference.
    type Vnode: Clone + Send;

    /// Handle to a running execution context.
    type Thread: Send;

    /// Start a thread named `name` in `owner` that runs `entry`.
    ///
    /// `owner` is already in the process table when this is called. The new
    /// thread may run before this returns.
    ///
    /// # Errors
    /// [`SpawnError`] if the thread could not be created; `entry` is dropped.
    fn spawn_with_entry(
        &self,
        name: &str,
        owner: &Arc<Process<Self>>,
        entry: ForkedChild<Self>,
    ) -> Result<Self::Thread, SpawnError>;

    /// Called between polls while `wait` blocks.
    #[inline]
    fn relax(&self) {
        core::hint::spin_loop();
    }
}
