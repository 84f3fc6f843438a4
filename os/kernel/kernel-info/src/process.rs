//! # Process Limits

/// Capacity of the process table; also the exclusive upper bound of PIDs.
pub const PID_MAX: i32 = 256;

/// Lowest PID handed out to a forked process.
pub const PID_MIN: i32 = 2;

/// Never a valid process; `ppid` of processes without a parent.
pub const INVALID_PID: i32 = 0;

/// Reserved slot of the kernel process created at boot.
pub const KERNEL_PID: i32 = 1;

/// Name of the kernel process.
pub const KERNEL_PROCESS_NAME: &str = "[kernel]";

const _: () = {
    assert!(INVALID_PID < KERNEL_PID);
    assert!(KERNEL_PID < PID_MIN);
    assert!(PID_MIN < PID_MAX);
};
