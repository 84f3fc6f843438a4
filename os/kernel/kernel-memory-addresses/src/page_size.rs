mod sealed {
    pub trait Sealed {}
}

/// Page granularity, as a type-level constant.
pub trait PageSize: sealed::Sealed + Copy + Eq + Ord + core::fmt::Debug {
    /// Bytes per page; a power of two.
    const SIZE: u64;
    /// `log2(SIZE)`.
    const SHIFT: u32;
    /// Mask of the in-page offset bits.
    const MASK: u64 = Self::SIZE - 1;
}

/// 4 KiB page, the granularity of the coremap.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Size4K;

impl sealed::Sealed for Size4K {}

impl PageSize for Size4K {
    const SIZE: u64 = 4096;
    const SHIFT: u32 = 12;
}

const _: () = assert!(1 << Size4K::SHIFT == Size4K::SIZE);
