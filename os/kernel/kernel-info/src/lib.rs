//! # Kernel Configuration and Boot Geometry
//!
//! This crate is the single source of truth for the compile-time constants the
//! coremap and the process table agree on, and for the RAM geometry the boot
//! code hands to the physical page allocator.
//!
//! ## Overview
//!
//! ### Memory Layout ([`memory`])
//! * **Page size**: the allocation granularity of the coremap
//! * **Direct map**: the fixed offset at which the kernel sees all of physical RAM
//!
//! ### Process Limits ([`process`])
//! * **PID range**: `PID_MIN..PID_MAX` for user processes
//! * **Kernel process**: the reserved slot and name of the boot process
//!
//! ### Boot Geometry ([`boot`])
//! * [`RamRange`](boot::RamRange): the usable physical range left over after
//!   the kernel image, as reported by the platform firmware
//!
//! ## Physical Memory Layout
//!
//! ```text
//! RamRange::first ┌─────────────────────────────────┐
//!                 │  Coremap header (lock object)   │  rounded up to PAGE_SIZE
//!                 ├─────────────────────────────────┤
//!                 │  Page descriptor array          │  rounded up to PAGE_SIZE
//!                 ├─────────────────────────────────┤
//!                 │  Allocatable page pool          │
//!                 │  (descriptor i ↔ page i)        │
//! RamRange::last  └─────────────────────────────────┘
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod boot;
pub mod memory;
pub mod process;
