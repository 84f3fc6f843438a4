//! # Coremap
//!
//! First-fit allocator of contiguous physical page runs. The allocator's own
//! state is carved out of the RAM it manages:
//!
//! ```text
//! ram.first ─► ┌──────────────────────────────┐
//!              │ header: SpinLock<Descriptors>│  rounded up to whole pages
//!              ├──────────────────────────────┤
//!              │ [PageDescriptor; N]          │  rounded up to whole pages
//! pool base ─► ├──────────────────────────────┤
//!              │ page 0                       │  ◄─ descriptor 0
//!              │ page 1                       │  ◄─ descriptor 1
//!              │ ...                          │
//! ram.last  ─► └──────────────────────────────┘
//! ```
//!
//! All allocation and free operations run under the header lock, so every
//! scan-and-mark sequence is atomic with respect to the others.

use crate::page_descriptor::{MAX_BLOCK_PAGES, PageDescriptor};
use crate::phys_mapper::PhysMapper;
use core::fmt;
use core::mem::size_of;
use kernel_info::boot::RamRange;
use kernel_info::memory::PAGE_SIZE;
use kernel_memory_addresses::{PhysicalAddress, Size4K, VirtualAddress, pages_for};
use kernel_sync::SpinLock;
use log::{info, trace, warn};

/// The descriptor array, owned by the coremap lock.
///
/// # Invariants
/// - `base` points at `len` initialized descriptors inside the header-reserved
///   RAM and stays valid for the lifetime of the owning [`Coremap`].
pub(crate) struct Descriptors {
    base: *mut PageDescriptor,
    len: usize,
}

// Safety: the array is only reached through the coremap SpinLock.
unsafe impl Send for Descriptors {}

impl Descriptors {
    #[inline]
    fn as_slice(&self) -> &[PageDescriptor] {
        // SAFETY: see the type invariants
        unsafe { core::slice::from_raw_parts(self.base, self.len) }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [PageDescriptor] {
        // SAFETY: see the type invariants; `&mut self` means the lock is held
        unsafe { core::slice::from_raw_parts_mut(self.base, self.len) }
    }
}

/// The kernel physical page allocator.
pub struct Coremap<'m, M: PhysMapper> {
    descriptors: &'m SpinLock<Descriptors>,
    mapper: &'m M,
    pool_base: PhysicalAddress,
    page_count: usize,
}

impl<'m, M: PhysMapper> Coremap<'m, M> {
    /// Carve the coremap out of `ram` and initialize one free descriptor per
    /// pool page.
    ///
    /// # Panics
    /// If `ram.first` is zero, the range is inverted, or the range cannot hold
    /// the header, the descriptor array and at least one pool page.
    ///
    /// # Safety
    /// - Every page in `ram` must be reachable through `mapper`, writable, and
    ///   not used by anything else for `'m`.
    /// - Must be called once per RAM range.
    #[allow(clippy::cast_possible_truncation)]
    pub unsafe fn bootstrap(ram: RamRange, mapper: &'m M) -> Self {
        assert!(!ram.first.is_null(), "BUG: coremap bootstrap with RAM at physical 0");
        assert!(
            ram.first < ram.last,
            "BUG: inverted RAM range {:?}..{:?}",
            ram.first,
            ram.last
        );

        let first = ram.first.align_up::<Size4K>();
        let last = ram.last.align_down::<Size4K>();

        let header_bytes = pages_for::<Size4K>(size_of::<SpinLock<Descriptors>>() as u64) * PAGE_SIZE;
        let array_base = match first.checked_add(header_bytes) {
            Some(base) if base < last => base,
            _ => too_small(ram),
        };

        let slots = last.page_index_from::<Size4K>(array_base);
        let array_bytes = pages_for::<Size4K>(slots * size_of::<PageDescriptor>() as u64) * PAGE_SIZE;
        let pool_base = match array_base.checked_add(array_bytes) {
            Some(base) if base < last => base,
            _ => too_small(ram),
        };
        let page_count = last.page_index_from::<Size4K>(pool_base) as usize;

        let array: *mut PageDescriptor = mapper.phys_to_virt(array_base).as_mut_ptr();
        for i in 0..page_count {
            let paddr = pool_base + (i as u64) * PAGE_SIZE;
            // SAFETY: slot `i` lies inside the array region reserved above
            unsafe { array.add(i).write(PageDescriptor::free(paddr)) };
        }

        let header = mapper.phys_to_virt(first).as_mut_ptr();
        // SAFETY: the header page is reserved above and page-aligned
        let descriptors = unsafe {
            SpinLock::init_at(
                header,
                Descriptors {
                    base: array,
                    len: page_count,
                },
            )
        };

        info!(
            "coremap: header at {first:?}, {slots} descriptor slots at {array_base:?}, {page_count} pages from {pool_base:?}"
        );

        Self {
            descriptors,
            mapper,
            pool_base,
            page_count,
        }
    }

    /// Allocate `npages` physically contiguous pages, first fit in address
    /// order, and return the kernel address of the first one.
    ///
    /// Returns `None` without changing any state if `npages` is zero or no
    /// free run of that length exists.
    #[must_use]
    pub fn alloc_kpages(&self, npages: usize) -> Option<VirtualAddress> {
        if npages == 0 {
            return None;
        }
        let Some(len) = u32::try_from(npages).ok().filter(|&n| n <= MAX_BLOCK_PAGES) else {
            warn!("coremap: {npages} pages exceed the largest describable run");
            return None;
        };

        let mut guard = self.descriptors.lock();
        let pages = guard.as_mut_slice();

        let Some(start) = first_fit(pages, npages) else {
            drop(guard);
            warn!("coremap: no free run of {npages} pages");
            return None;
        };

        let (head, tail) = pages[start..start + npages].split_at_mut(1);
        head[0].mark_allocated(len);
        for page in tail {
            page.mark_allocated(0);
        }
        let paddr = head[0].paddr();
        drop(guard);

        let va = self.mapper.phys_to_virt(paddr);
        trace!("coremap: alloc {npages} pages at {paddr:?} -> {va:?}");
        Some(va)
    }

    /// Return the run that starts at `va` to the pool.
    ///
    /// # Panics
    /// If `va` does not translate to a pool page, the page is not allocated,
    /// or it is not the first page of a run.
    pub fn free_kpages(&self, va: VirtualAddress) {
        let Some(paddr) = self.mapper.virt_to_phys(va) else {
            panic!("BUG: free_kpages({va:?}): not a kernel-mapped address");
        };

        let mut guard = self.descriptors.lock();
        let pages = guard.as_mut_slice();

        let Some(index) = pages.iter().position(|d| d.paddr() == paddr) else {
            panic!("BUG: free_kpages({va:?}): {paddr:?} is not a coremap page");
        };
        let head = pages[index];
        assert!(head.is_allocated(), "BUG: free_kpages({va:?}): page is not allocated");
        assert!(
            head.block_length() != 0,
            "BUG: free_kpages({va:?}): page is not the start of an allocation"
        );

        let npages = head.block_length() as usize;
        let Some(run) = pages.get_mut(index..index + npages) else {
            panic!("BUG: free_kpages({va:?}): run of {npages} pages overruns the coremap");
        };
        for page in run {
            page.release();
        }
        drop(guard);

        trace!("coremap: free {npages} pages at {paddr:?}");
    }

    /// Bytes currently allocated; a snapshot for diagnostics.
    #[must_use]
    pub fn used_bytes(&self) -> u64 {
        let guard = self.descriptors.lock();
        let used = guard.as_slice().iter().filter(|d| d.is_allocated()).count();
        used as u64 * PAGE_SIZE
    }

    /// Pages currently free; a snapshot.
    #[must_use]
    pub fn free_pages(&self) -> usize {
        let guard = self.descriptors.lock();
        guard.as_slice().iter().filter(|d| !d.is_allocated()).count()
    }

    /// Number of pages in the pool.
    #[inline]
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// Copy of the descriptor of pool page `index`.
    #[must_use]
    pub fn descriptor(&self, index: usize) -> Option<PageDescriptor> {
        self.descriptors.lock().as_slice().get(index).copied()
    }

    /// Physical range `[first, last)` covered by the pool.
    #[must_use]
    pub const fn pool_range(&self) -> RamRange {
        RamRange::new(
            self.pool_base,
            PhysicalAddress::new(self.pool_base.as_u64() + self.page_count as u64 * PAGE_SIZE),
        )
    }
}

impl<M: PhysMapper> fmt::Debug for Coremap<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coremap")
            .field("pool", &self.pool_range())
            .field("page_count", &self.page_count)
            .finish_non_exhaustive()
    }
}

#[cold]
fn too_small(ram: RamRange) -> ! {
    panic!(
        "BUG: RAM range {:?}..{:?} cannot hold the coremap",
        ram.first, ram.last
    )
}

/// Index of the first run of `npages` free descriptors, scanning upwards.
fn first_fit(pages: &[PageDescriptor], npages: usize) -> Option<usize> {
    let mut run = 0;
    for (i, page) in pages.iter().enumerate() {
        if page.is_allocated() {
            run = 0;
            continue;
        }
        run += 1;
        if run == npages {
            return Some(i + 1 - npages);
        }
    }
    None
}
