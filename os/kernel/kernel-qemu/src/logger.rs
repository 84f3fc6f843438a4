use crate::qemu_fmt::QemuSink;
use core::fmt;
use kernel_sync::SyncOnceCell;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: SyncOnceCell<QemuLogger> = SyncOnceCell::new();

/// `log` backend writing `[LEVEL] target: message` lines to the debug port.
pub struct QemuLogger {
    max_level: LevelFilter,
}

impl QemuLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Install as the global logger. Call once during early boot.
    ///
    /// # Errors
    /// If a logger is already installed.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        let logger = LOGGER.get_or_init(|| self);
        log::set_logger(logger)?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for QemuLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = write_record(&mut QemuSink, record);
        }
    }

    fn flush(&self) {}
}

/// Format `record` as one `[LEVEL] target: message` line.
///
/// # Errors
/// Whatever `out` reports.
pub fn write_record(out: &mut impl fmt::Write, record: &Record<'_>) -> fmt::Result {
    writeln!(out, "[{}] {}: {}", record.level(), record.target(), record.args())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn records_render_as_single_lines() {
        let mut out = String::new();
        let record = Record::builder()
            .level(Level::Warn)
            .target("kernel_alloc::coremap")
            .args(format_args!("no free run of 3 pages"))
            .build();
        write_record(&mut out, &record).unwrap();
        assert_eq!(out, "[WARN] kernel_alloc::coremap: no free run of 3 pages\n");
    }

    #[test]
    fn level_filter_applies() {
        let logger = QemuLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let info = Metadata::builder().level(Level::Info).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&info));
    }
}
