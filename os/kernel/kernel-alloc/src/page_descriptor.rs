//! # Per-Page Descriptor
//!
//! One [`PageDescriptor`] exists for every page in the coremap pool. Pages
//! that are handed out together form a *run*: every page of the run is
//! marked allocated, and only the first one (the run head) carries the run
//! length. Freeing is only legal on a run head.
//!
//! ```text
//!  index:     0     1     2     3     4     5     6     7
//!  alloc:     1     1     1     0     1     1     0     0
//!  block:     3     0     0     0     2     0     0     0
//!             └─ run head       └─ run head
//! ```
//!
//! The flag word is packed the way the hardware descriptors in this kernel
//! are, via [`bitfield_struct`]:
//!
//! | bits   | field          |
//! |--------|----------------|
//! | 0..4   | `cpu_index`    |
//! | 4      | `allocated`    |
//! | 5      | `pinned`       |
//! | 6..32  | `block_length` |

use bitfield_struct::bitfield;
use kernel_memory_addresses::PhysicalAddress;

/// Largest run a single descriptor can describe.
pub const MAX_BLOCK_PAGES: u32 = (1 << 26) - 1;

/// TLB slot value meaning "not in any TLB slot".
pub const NO_TLB_SLOT: i8 = -1;

/// Packed state bits of a [`PageDescriptor`].
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PageFlags {
    /// CPU that last touched the page (reserved, always 0).
    #[bits(4)]
    pub cpu_index: u8,
    /// Page belongs to a live allocation.
    pub allocated: bool,
    /// Page may not be evicted (reserved, never set).
    pub pinned: bool,
    /// Run length in pages; non-zero only on a run head.
    #[bits(26)]
    pub block_length: u32,
}

/// State of one physical page of the coremap pool.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageDescriptor {
    paddr: PhysicalAddress,
    swap_offset: u64,
    flags: PageFlags,
    tlb_slot: i8,
}

impl PageDescriptor {
    /// A free, unpinned page at `paddr` with no swap slot and no TLB slot.
    #[must_use]
    pub const fn free(paddr: PhysicalAddress) -> Self {
        Self {
            paddr,
            swap_offset: 0,
            flags: PageFlags::new(),
            tlb_slot: NO_TLB_SLOT,
        }
    }

    #[inline]
    #[must_use]
    pub const fn paddr(&self) -> PhysicalAddress {
        self.paddr
    }

    /// Backing-store offset (reserved, always 0).
    #[inline]
    #[must_use]
    pub const fn swap_offset(&self) -> u64 {
        self.swap_offset
    }

    #[inline]
    #[must_use]
    pub const fn tlb_slot(&self) -> Option<u8> {
        if self.tlb_slot < 0 {
            None
        } else {
            #[allow(clippy::cast_sign_loss)]
            Some(self.tlb_slot as u8)
        }
    }

    #[inline]
    #[must_use]
    pub const fn flags(&self) -> PageFlags {
        self.flags
    }

    #[inline]
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        self.flags.allocated()
    }

    #[inline]
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.flags.pinned()
    }

    #[inline]
    #[must_use]
    pub const fn cpu_index(&self) -> u8 {
        self.flags.cpu_index()
    }

    /// Pages in the run this descriptor heads; `0` unless it is a run head.
    #[inline]
    #[must_use]
    pub const fn block_length(&self) -> u32 {
        self.flags.block_length()
    }

    #[inline]
    #[must_use]
    pub const fn is_run_head(&self) -> bool {
        self.is_allocated() && self.block_length() != 0
    }

    /// Mark as an allocated run member; `head_of` is the run length on the
    /// first page and `0` on the rest.
    #[inline]
    pub(crate) const fn mark_allocated(&mut self, head_of: u32) {
        debug_assert!(head_of <= MAX_BLOCK_PAGES);
        self.flags.set_allocated(true);
        self.flags.set_block_length(head_of);
    }

    #[inline]
    pub(crate) const fn release(&mut self) {
        self.flags.set_allocated(false);
        self.flags.set_block_length(0);
    }
}
