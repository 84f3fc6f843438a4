//! # Boot-Time RAM Geometry

use kernel_memory_addresses::PhysicalAddress;

/// The usable physical RAM range reported at boot, `[first, last)`.
///
/// `first` is the lowest byte not already claimed by the kernel image and the
/// boot stack; `last` is one past the highest byte of RAM. Neither end has to
/// be page aligned.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RamRange {
    pub first: PhysicalAddress,
    pub last: PhysicalAddress,
}

impl RamRange {
    #[must_use]
    pub const fn new(first: PhysicalAddress, last: PhysicalAddress) -> Self {
        Self { first, last }
    }

    /// Size of the range in bytes; zero if the range is empty or inverted.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.last.as_u64().saturating_sub(self.first.as_u64())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_saturates_for_inverted_ranges() {
        let r = RamRange::new(PhysicalAddress::new(0x2000), PhysicalAddress::new(0x1000));
        assert_eq!(r.len(), 0);
        assert!(r.is_empty());

        let r = RamRange::new(PhysicalAddress::new(0x1000), PhysicalAddress::new(0x9000));
        assert_eq!(r.len(), 0x8000);
    }
}
