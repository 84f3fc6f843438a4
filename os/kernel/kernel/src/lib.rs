//! # Kernel
//!
//! Kernel-side glue over the building blocks:
//!
//! * [`kmem`]: the global coremap behind `alloc_kpages`/`free_kpages`;
//! * [`syscall`]: the process system calls and their errno mapping;
//! * [`init`]: the boot sequence that brings both up.

#![cfg_attr(not(any(test, doctest)), no_std)]

pub mod errno;
pub mod init;
pub mod kmem;
pub mod syscall;

pub use errno::Errno;
