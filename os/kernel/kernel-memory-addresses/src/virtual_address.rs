use crate::address_type;

/// A kernel-mapped address.
///
/// The allocator returns these for every page run it hands out. A null
/// `VirtualAddress` is never a valid allocation result.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VirtualAddress(u64);

address_type!(VirtualAddress, "VA");

impl VirtualAddress {
    /// Address of `ptr`, exposing its provenance so it can be turned back into
    /// a pointer with [`as_mut_ptr`](Self::as_mut_ptr).
    #[inline]
    #[must_use]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self::new(ptr.expose_provenance() as u64)
    }

    /// Raw pointer to the memory at this address.
    ///
    /// Dereferencing it is only sound if the address is mapped and the memory
    /// holds a valid `T`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_mut_ptr<T>(self) -> *mut T {
        core::ptr::with_exposed_provenance_mut(self.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointers_round_trip_through_addresses() {
        let mut page = [0u8; 64];
        let va = VirtualAddress::from_ptr(page.as_mut_ptr());
        unsafe { va.as_mut_ptr::<u8>().add(3).write(7) };
        assert_eq!(page[3], 7);
    }
}
