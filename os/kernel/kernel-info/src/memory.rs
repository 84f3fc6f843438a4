//! # Memory Layout

use kernel_memory_addresses::{PageSize, Size4K};

/// Allocation granularity of the coremap, in bytes.
pub const PAGE_SIZE: u64 = Size4K::SIZE;

/// Base of the kernel's direct map of physical memory.
///
/// Every physical address `pa` is visible to the kernel at
/// `DIRECT_MAP_BASE + pa`, without any page table walk of its own.
pub const DIRECT_MAP_BASE: u64 = 0xffff_8880_0000_0000;

/// Size of the physical range covered by the direct map.
pub const DIRECT_MAP_SIZE: u64 = 0x0000_0100_0000_0000; // 1 TiB

/// Physical load address of the kernel image; RAM below this is never handed
/// to the coremap.
pub const PHYS_LOAD: u64 = 0x0010_0000; // 1 MiB

const _: () = {
    assert!(PAGE_SIZE.is_power_of_two());
    assert!(DIRECT_MAP_BASE.is_multiple_of(PAGE_SIZE));
    assert!(DIRECT_MAP_BASE.checked_add(DIRECT_MAP_SIZE).is_some());
    assert!(PHYS_LOAD.is_multiple_of(PAGE_SIZE));
};
