use kernel::Errno;
use kernel::syscall::{ProcessSyscalls, ThreadExit, WNOHANG};
use kernel_proc::{
    AddressSpace, AddressSpaceError, Context, ExitStatus, ForkedChild, Pid, Platform, Process,
    ProcessTable, SpawnError, TrapFrame,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

struct NullSpace;

impl AddressSpace for NullSpace {
    fn copy(&self) -> Result<Self, AddressSpaceError> {
        Ok(Self)
    }

    fn activate(&self) {}
}

/// Parks spawned children instead of running them.
#[derive(Default)]
struct Parked {
    children: Mutex<Vec<ForkedChild<Parked>>>,
    fail_spawn: AtomicBool,
}

impl Platform for Parked {
    type AddressSpace = NullSpace;
    type Vnode = ();
    type Thread = ();

    fn spawn_with_entry(
        &self,
        _name: &str,
        _owner: &Arc<Process<Self>>,
        entry: ForkedChild<Self>,
    ) -> Result<(), SpawnError> {
        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(SpawnError::TooManyThreads);
        }
        self.children.lock().unwrap().push(entry);
        Ok(())
    }

    fn relax(&self) {
        thread::yield_now();
    }
}

/// Unwinds instead of leaving the thread.
struct Unwind;

impl ThreadExit for Unwind {
    fn thread_exit(self) -> ! {
        panic::panic_any(Unwind)
    }
}

fn setup() -> (ProcessTable<Parked>, Pid) {
    let table = ProcessTable::bootstrap(Parked::default());
    let shell = table.create_process("sh").unwrap();
    shell.set_address_space(Some(NullSpace));
    shell.add_thread();
    let shell = table.insert(shell, Pid::KERNEL).unwrap();
    (table, shell.pid())
}

#[test]
fn getpid_reports_the_caller() {
    let (table, sh) = setup();
    let sys = ProcessSyscalls::new(&table);
    let tf = TrapFrame::default();
    assert_eq!(sys.sys_getpid(&Context::new(sh, &tf)), sh);
}

#[test]
fn fork_returns_the_child_pid_to_the_parent() {
    let (table, sh) = setup();
    let sys = ProcessSyscalls::new(&table);
    let tf = TrapFrame::default();

    let child = sys.sys_fork(&Context::new(sh, &tf)).unwrap();
    assert_ne!(child, sh);
    assert_eq!(table.parent_of(child), Some(sh));
    assert_eq!(table.platform().children.lock().unwrap().len(), 1);
}

#[test]
fn fork_failures_become_errno_values() {
    let (table, sh) = setup();
    let sys = ProcessSyscalls::new(&table);
    let tf = TrapFrame::default();

    table.platform().fail_spawn.store(true, Ordering::SeqCst);
    assert_eq!(sys.sys_fork(&Context::new(sh, &tf)), Err(Errno::EAGAIN));
    table.platform().fail_spawn.store(false, Ordering::SeqCst);

    while table.allocate_pid().is_some() {
        sys.sys_fork(&Context::new(sh, &tf)).unwrap();
    }
    assert_eq!(sys.sys_fork(&Context::new(sh, &tf)), Err(Errno::ENPROC));
}

#[test]
fn waitpid_rejects_unknown_options() {
    let (table, sh) = setup();
    let sys = ProcessSyscalls::new(&table);
    let tf = TrapFrame::default();
    let child = sys.sys_fork(&Context::new(sh, &tf)).unwrap();

    assert_eq!(sys.sys_waitpid(sh, child.as_i32(), 2), Err(Errno::EINVAL));
    assert_eq!(sys.sys_waitpid(sh, child.as_i32(), -1), Err(Errno::EINVAL));
    assert!(table.get(child).is_some());
}

#[test]
fn waitpid_reports_lookup_errors() {
    let (table, sh) = setup();
    let sys = ProcessSyscalls::new(&table);

    assert_eq!(sys.sys_waitpid(sh, sh.as_i32(), 0), Err(Errno::ECHILD));
    assert_eq!(sys.sys_waitpid(sh, Pid::KERNEL.as_i32(), 0), Err(Errno::ECHILD));
    assert_eq!(sys.sys_waitpid(sh, 9999, 0), Err(Errno::ESRCH));
    assert_eq!(sys.sys_waitpid(sh, 77, WNOHANG), Err(Errno::ESRCH));
}

#[test]
fn waitpid_nohang_polls_until_the_child_exits() {
    let (table, sh) = setup();
    let sys = ProcessSyscalls::new(&table);
    let tf = TrapFrame::default();
    let child = sys.sys_fork(&Context::new(sh, &tf)).unwrap();

    assert_eq!(sys.sys_waitpid(sh, child.as_i32(), WNOHANG), Ok(None));

    let exited = panic::catch_unwind(AssertUnwindSafe(|| sys.sys_exit(child, 7, Unwind)));
    assert!(exited.unwrap_err().is::<Unwind>());

    assert_eq!(
        sys.sys_waitpid(sh, child.as_i32(), WNOHANG),
        Ok(Some((child, ExitStatus::exited(7))))
    );
    assert_eq!(sys.sys_waitpid(sh, child.as_i32(), WNOHANG), Err(Errno::ESRCH));
    assert!(table.get(child).is_none());
}

#[test]
fn blocking_waitpid_returns_once_the_child_exits() {
    let (table, sh) = setup();
    let sys = ProcessSyscalls::new(&table);
    let tf = TrapFrame::default();
    let child = sys.sys_fork(&Context::new(sh, &tf)).unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(20));
            let _ = panic::catch_unwind(AssertUnwindSafe(|| sys.sys_exit(child, 42, Unwind)));
        });
        let (pid, status) = sys.sys_waitpid(sh, child.as_i32(), 0).unwrap().unwrap();
        assert_eq!(pid, child);
        assert_eq!(status.code(), Some(42));
    });
}
