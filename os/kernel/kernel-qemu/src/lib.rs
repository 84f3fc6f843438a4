//! # QEMU Debug Console Output
//!
//! Kernel log output goes to QEMU's debug console, I/O port `0x402`. Run the
//! guest with `-debugcon stdio` (or `-debugcon file:debug.log`) to see it.
//!
//! ```text
//! log::info!() ─► QemuLogger ─► write_record ─► QemuSink ─► out 0x402
//! ```
//!
//! * [`QemuLogger`] is the `log` backend, installed once during boot.
//! * [`qemu_trace!`] writes straight to the port, bypassing `log`.
//!
//! Port writes only exist on bare-metal x86-64 with the `enabled` feature
//! (on by default). Everywhere else, including host test builds, the sink
//! discards its input.
//!
//! ```rust,no_run
//! use kernel_qemu::QemuLogger;
//! use log::{LevelFilter, info};
//!
//! QemuLogger::new(LevelFilter::Debug).init().expect("logger already installed");
//! info!("coremap ready");
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;

pub use logger::{QemuLogger, write_record};

#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt::{self, Write};

    /// The port number for QEMU's debug port.
    #[cfg(all(feature = "enabled", target_arch = "x86_64", target_os = "none"))]
    const QEMU_DEBUG_PORT: u16 = 0x402;

    /// Write a single byte to QEMU's debug port.
    #[allow(clippy::inline_always)]
    #[inline(always)]
    pub fn dbg_putc(c: u8) {
        #[cfg(all(feature = "enabled", target_arch = "x86_64", target_os = "none"))]
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") QEMU_DEBUG_PORT,
                in("al") c,
                options(nomem, nostack, preserves_flags)
            );
        }
        #[cfg(not(all(feature = "enabled", target_arch = "x86_64", target_os = "none")))]
        let _ = c;
    }

    /// `fmt::Write` adapter over [`dbg_putc`].
    pub struct QemuSink;

    impl Write for QemuSink {
        #[inline]
        fn write_str(&mut self, s: &str) -> fmt::Result {
            s.bytes().for_each(dbg_putc);
            Ok(())
        }
    }

    #[inline]
    pub fn qemu_write(args: fmt::Arguments<'_>) {
        // Best effort; there is nowhere to report a failed debug write.
        let _ = fmt::write(&mut QemuSink, args);
    }
}

#[macro_export]
macro_rules! qemu_trace {
    ($($arg:tt)*) => {{
        $crate::qemu_fmt::qemu_write(core::format_args!($($arg)*));
    }};
}
