//! # Physical ↔ Kernel-Virtual Translation
//!
//! The coremap never dereferences a physical address itself. Everything it
//! touches (its own lock, the descriptor array) and everything it hands out
//! goes through a [`PhysMapper`], so the same allocator runs on the kernel's
//! direct map and on a plain heap buffer in host tests.
//!
//! ```rust
//! use kernel_alloc::phys_mapper::{DirectMapper, PhysMapper};
//! use kernel_info::memory::DIRECT_MAP_BASE;
//! use kernel_memory_addresses::PhysicalAddress;
//!
//! let pa = PhysicalAddress::new(0x20_3000);
//! let va = DirectMapper.phys_to_virt(pa);
//! assert_eq!(va.as_u64(), DIRECT_MAP_BASE + 0x20_3000);
//! assert_eq!(DirectMapper.virt_to_phys(va), Some(pa));
//! ```

use kernel_info::memory::{DIRECT_MAP_BASE, DIRECT_MAP_SIZE};
use kernel_memory_addresses::{PhysicalAddress, VirtualAddress};

/// Translation between physical RAM and the kernel addresses it is visible at.
///
/// Implementations must be consistent: `virt_to_phys(phys_to_virt(pa)) == Some(pa)`
/// for every `pa` they cover.
pub trait PhysMapper: Sync {
    /// Kernel address at which `pa` can be accessed.
    fn phys_to_virt(&self, pa: PhysicalAddress) -> VirtualAddress;

    /// Inverse of [`phys_to_virt`](Self::phys_to_virt); `None` if `va` is not
    /// covered by this mapping.
    fn virt_to_phys(&self, va: VirtualAddress) -> Option<PhysicalAddress>;
}

/// [`PhysMapper`] for the kernel's direct map at [`DIRECT_MAP_BASE`].
///
/// # Safety
/// Translation itself is always safe. Dereferencing the result is only sound
/// once the direct map has been established and covers the physical range.
#[derive(Copy, Clone, Debug, Default)]
pub struct DirectMapper;

impl PhysMapper for DirectMapper {
    #[inline]
    fn phys_to_virt(&self, pa: PhysicalAddress) -> VirtualAddress {
        debug_assert!(pa.as_u64() < DIRECT_MAP_SIZE, "{pa:?} is outside the direct map");
        VirtualAddress::new(DIRECT_MAP_BASE + pa.as_u64())
    }

    #[inline]
    fn virt_to_phys(&self, va: VirtualAddress) -> Option<PhysicalAddress> {
        va.as_u64()
            .checked_sub(DIRECT_MAP_BASE)
            .filter(|&off| off < DIRECT_MAP_SIZE)
            .map(PhysicalAddress::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_map_rejects_foreign_addresses() {
        assert_eq!(DirectMapper.virt_to_phys(VirtualAddress::new(0x1000)), None);
        assert_eq!(
            DirectMapper.virt_to_phys(VirtualAddress::new(DIRECT_MAP_BASE + DIRECT_MAP_SIZE)),
            None
        );
        assert_eq!(
            DirectMapper.virt_to_phys(VirtualAddress::new(DIRECT_MAP_BASE)),
            Some(PhysicalAddress::zero())
        );
    }
}
