//! # Kernel Physical Page Allocation
//!
//! This crate owns every physical page above the kernel image. It provides:
//!
//! * [`coremap`]: the [`Coremap`], a first-fit allocator of contiguous page runs
//!   whose lock and descriptor array live in the RAM it manages;
//! * [`page_descriptor`]: the per-page [`PageDescriptor`] and its packed flags;
//! * [`phys_mapper`]: the [`PhysMapper`] seam between physical pages and the
//!   kernel addresses they are reachable at, with the direct-map
//!   [`DirectMapper`] used by the kernel proper.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kernel_alloc::{Coremap, DirectMapper};
//! use kernel_info::boot::RamRange;
//! use kernel_memory_addresses::PhysicalAddress;
//!
//! static MAPPER: DirectMapper = DirectMapper;
//!
//! let ram = RamRange::new(PhysicalAddress::new(0x20_0000), PhysicalAddress::new(0x800_0000));
//! let coremap = unsafe { Coremap::bootstrap(ram, &MAPPER) };
//!
//! let two = coremap.alloc_kpages(2).expect("out of pages");
//! coremap.free_kpages(two);
//! ```
//!
//! ## Concurrency
//!
//! [`Coremap`] is `Sync`. Every operation takes the coremap spin lock for a
//! bounded linear scan; nothing blocks while holding it.

#![cfg_attr(not(any(test, doctest)), no_std)]

pub mod coremap;
pub mod page_descriptor;
pub mod phys_mapper;

pub use coremap::Coremap;
pub use page_descriptor::{PageDescriptor, PageFlags};
pub use phys_mapper::{DirectMapper, PhysMapper};
