use crate::{PageSize, address_type};

/// An address in physical RAM.
///
/// Page descriptors record their page by `PhysicalAddress`; callers of the
/// allocator only ever see the [`VirtualAddress`](crate::VirtualAddress) the
/// kernel maps it at.
///
/// ```rust
/// # use kernel_memory_addresses::*;
/// let base = PhysicalAddress::new(0x0020_0000);
/// let page = base + 3 * Size4K::SIZE;
/// assert_eq!(page.page_index_from::<Size4K>(base), 3);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalAddress(u64);

address_type!(PhysicalAddress, "PA");

impl PhysicalAddress {
    /// Byte distance from `base` up to `self`.
    ///
    /// # Panics
    /// If `base` lies above `self`.
    #[inline]
    #[must_use]
    pub const fn offset_from(self, base: Self) -> u64 {
        match self.0.checked_sub(base.0) {
            Some(d) => d,
            None => panic!("physical address below its base"),
        }
    }

    /// Number of whole `S` pages between `base` and `self`.
    #[inline]
    #[must_use]
    pub const fn page_index_from<S: PageSize>(self, base: Self) -> u64 {
        self.offset_from(base) >> S::SHIFT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size4K;

    #[test]
    fn page_index_truncates_partial_pages() {
        let base = PhysicalAddress::new(0x10_0000);
        assert_eq!(PhysicalAddress::new(0x10_0fff).page_index_from::<Size4K>(base), 0);
        assert_eq!(PhysicalAddress::new(0x10_2000).page_index_from::<Size4K>(base), 2);
    }

    #[test]
    #[should_panic(expected = "below its base")]
    fn offset_below_base_panics() {
        let _ = PhysicalAddress::new(0x1000).offset_from(PhysicalAddress::new(0x2000));
    }
}
