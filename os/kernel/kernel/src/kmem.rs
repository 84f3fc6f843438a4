//! # Kernel Page Allocation
//!
//! The one coremap of the running kernel. It is built by [`vm_bootstrap`]
//! over the direct map and is reachable from every CPU afterwards.

use kernel_alloc::{Coremap, DirectMapper};
use kernel_info::boot::RamRange;
use kernel_memory_addresses::VirtualAddress;
use kernel_sync::SyncOnceCell;
use log::info;

static MAPPER: DirectMapper = DirectMapper;

static COREMAP: SyncOnceCell<Coremap<'static, DirectMapper>> = SyncOnceCell::new();

/// Take over `ram` and build the kernel coremap in it.
///
/// # Safety
/// `ram` must be unused physical memory reachable through the direct map,
/// and nothing else may touch it afterwards.
///
/// # Panics
/// If called twice, or if `ram` cannot hold the coremap.
pub unsafe fn vm_bootstrap(ram: RamRange) -> &'static Coremap<'static, DirectMapper> {
    assert!(COREMAP.get().is_none(), "BUG: vm_bootstrap called twice");
    // SAFETY: forwarded to the caller
    let coremap = unsafe { Coremap::bootstrap(ram, &MAPPER) };
    let Ok(coremap) = COREMAP.set(coremap) else {
        panic!("BUG: vm_bootstrap called twice");
    };
    info!(
        "kmem: {} pages available at {:?}",
        coremap.page_count(),
        coremap.pool_range().first
    );
    coremap
}

/// The kernel coremap, once [`vm_bootstrap`] has run.
#[inline]
#[must_use]
pub fn coremap() -> Option<&'static Coremap<'static, DirectMapper>> {
    COREMAP.get()
}

/// Allocate `npages` contiguous kernel pages.
///
/// `None` before bootstrap, for `npages == 0`, or when no run is free.
#[must_use]
pub fn alloc_kpages(npages: usize) -> Option<VirtualAddress> {
    coremap()?.alloc_kpages(npages)
}

/// Release a run returned by [`alloc_kpages`].
///
/// # Panics
/// Before bootstrap, or if `va` is not the start of a live allocation.
pub fn free_kpages(va: VirtualAddress) {
    let Some(coremap) = coremap() else {
        panic!("BUG: free_kpages({va:?}) before vm_bootstrap");
    };
    coremap.free_kpages(va);
}

/// Bytes currently handed out; 0 before bootstrap.
#[must_use]
pub fn coremap_used_bytes() -> u64 {
    coremap().map_or(0, Coremap::used_bytes)
}
