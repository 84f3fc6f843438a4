//! # Physical and Kernel-Virtual Address Types
//!
//! The coremap constantly converts between two address kinds:
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`PhysicalAddress`] | An address in physical RAM, as stored in a page descriptor. |
//! | [`VirtualAddress`] | A kernel-mapped address, as handed out to allocation callers. |
//!
//! Both are `u64` newtypes. Mixing them up is a type error instead of a
//! silent corruption of the page descriptor array. Page geometry comes from
//! the [`PageSize`] marker trait; the kernel only manages [`Size4K`] pages.
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let pa = PhysicalAddress::new(0x0020_1234);
//! assert_eq!(pa.align_down::<Size4K>().as_u64(), 0x0020_1000);
//! assert_eq!(pa.align_up::<Size4K>().as_u64(), 0x0020_2000);
//! assert!(!pa.is_aligned::<Size4K>());
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod page_size;
mod physical_address;
mod virtual_address;

pub use crate::page_size::{PageSize, Size4K};
pub use crate::physical_address::PhysicalAddress;
pub use crate::virtual_address::VirtualAddress;

/// Shared arithmetic of the address newtypes.
macro_rules! address_type {
    ($ty:ident, $tag:literal) => {
        impl $ty {
            #[inline]
            #[must_use]
            pub const fn new(v: u64) -> Self {
                Self(v)
            }

            #[inline]
            #[must_use]
            pub const fn zero() -> Self {
                Self(0)
            }

            #[inline]
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            #[inline]
            #[must_use]
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            #[inline]
            #[must_use]
            pub const fn align_down<S: $crate::PageSize>(self) -> Self {
                Self(self.0 & !S::MASK)
            }

            /// Round up to the next `S` boundary.
            ///
            /// # Panics
            /// On overflow past the top of the address space.
            #[inline]
            #[must_use]
            pub const fn align_up<S: $crate::PageSize>(self) -> Self {
                match self.0.checked_add(S::MASK) {
                    Some(v) => Self(v & !S::MASK),
                    None => panic!("address overflow while aligning up"),
                }
            }

            #[inline]
            #[must_use]
            pub const fn is_aligned<S: $crate::PageSize>(self) -> bool {
                self.0 & S::MASK == 0
            }

            #[inline]
            #[must_use]
            pub const fn checked_add(self, rhs: u64) -> Option<Self> {
                match self.0.checked_add(rhs) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }
        }

        impl core::fmt::Debug for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!($tag, "({:#x})"), self.0)
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{:#x}", self.0)
            }
        }

        impl From<u64> for $ty {
            #[inline]
            fn from(v: u64) -> Self {
                Self(v)
            }
        }

        impl From<$ty> for u64 {
            #[inline]
            fn from(a: $ty) -> Self {
                a.0
            }
        }

        impl core::ops::Add<u64> for $ty {
            type Output = Self;

            #[inline]
            fn add(self, rhs: u64) -> Self {
                Self(self.0 + rhs)
            }
        }

        impl core::ops::AddAssign<u64> for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: u64) {
                self.0 += rhs;
            }
        }
    };
}

pub(crate) use address_type;

/// Number of `S`-sized pages needed to hold `bytes` bytes.
#[inline]
#[must_use]
pub const fn pages_for<S: PageSize>(bytes: u64) -> u64 {
    bytes.div_ceil(S::SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_counts_round_up() {
        assert_eq!(pages_for::<Size4K>(0), 0);
        assert_eq!(pages_for::<Size4K>(1), 1);
        assert_eq!(pages_for::<Size4K>(4096), 1);
        assert_eq!(pages_for::<Size4K>(4097), 2);
    }

    #[test]
    fn aligning_an_aligned_address_is_a_no_op() {
        let pa = PhysicalAddress::new(0x13000);
        assert_eq!(pa.align_up::<Size4K>(), pa);
        assert_eq!(pa.align_down::<Size4K>(), pa);
        assert!(pa.is_aligned::<Size4K>());
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn aligning_up_past_the_top_panics() {
        let _ = VirtualAddress::new(u64::MAX - 1).align_up::<Size4K>();
    }

    #[test]
    fn addresses_print_with_their_kind() {
        let pa = PhysicalAddress::new(0x0020_0042);
        assert_eq!(format!("{pa:?}"), "PA(0x200042)");
        assert_eq!(format!("{pa}"), "0x200042");
        assert_eq!(format!("{:?}", VirtualAddress::new(0x1000)), "VA(0x1000)");
        assert_eq!(u64::from(pa + 0x10), 0x0020_0052);
        assert_eq!(PhysicalAddress::zero().checked_add(u64::MAX), Some(PhysicalAddress::new(u64::MAX)));
        assert_eq!(PhysicalAddress::new(1).checked_add(u64::MAX), None);
    }
}
