use crate::platform::{AddressSpaceError, SpawnError};

/// Failures of process creation and fork.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("process table is full")]
    TooManyProcesses,
    #[error("failed to start the child thread")]
    Spawn(#[source] SpawnError),
}

impl From<AddressSpaceError> for ProcError {
    fn from(_: AddressSpaceError) -> Self {
        Self::OutOfMemory
    }
}

impl From<SpawnError> for ProcError {
    fn from(e: SpawnError) -> Self {
        Self::Spawn(e)
    }
}

/// Failures of `wait`, reported before any blocking happens.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error("pid is outside the process range")]
    InvalidPid,
    #[error("no such process")]
    NoSuchProcess,
    #[error("not a child of the caller")]
    NotAChild,
}
