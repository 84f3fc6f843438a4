//! # Boot Sequence

use crate::kmem;
use kernel_info::boot::RamRange;
use kernel_info::memory::PHYS_LOAD;
use kernel_memory_addresses::PhysicalAddress;
use kernel_proc::{Platform, ProcessTable};
use kernel_qemu::{QemuLogger, qemu_trace};
use log::{LevelFilter, info, warn};

/// Route `log` output to the QEMU debug port.
pub fn init_logging(max_level: LevelFilter) {
    if QemuLogger::new(max_level).init().is_err() {
        warn!("init: logger already installed");
    }
}

/// The part of `ram` the coremap may take: nothing below the kernel load
/// address.
#[must_use]
pub fn usable_ram(ram: RamRange) -> RamRange {
    RamRange::new(ram.first.max(PhysicalAddress::new(PHYS_LOAD)), ram.last)
}

/// Hand `ram` to the coremap and create the process table.
///
/// # Safety
/// As for [`kmem::vm_bootstrap`].
pub unsafe fn boot<P: Platform>(ram: RamRange, platform: P) -> ProcessTable<P> {
    qemu_trace!("boot: RAM {}..{}\n", ram.first, ram.last);
    let ram = usable_ram(ram);
    info!("init: {} bytes of RAM at {:?}", ram.len(), ram.first);

    // SAFETY: forwarded to the caller
    unsafe { kmem::vm_bootstrap(ram) };
    let table = ProcessTable::bootstrap(platform);

    info!("init: {} KiB in use after boot", kmem::coremap_used_bytes() / 1024);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ram_below_the_kernel_is_never_used() {
        let low = RamRange::new(PhysicalAddress::new(0x1000), PhysicalAddress::new(0x80_0000));
        assert_eq!(usable_ram(low).first.as_u64(), PHYS_LOAD);
        assert_eq!(usable_ram(low).last, low.last);

        let high = RamRange::new(PhysicalAddress::new(0x40_0000), PhysicalAddress::new(0x80_0000));
        assert_eq!(usable_ram(high), high);
    }
}
