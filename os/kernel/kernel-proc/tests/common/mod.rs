#![allow(dead_code)]

use kernel_proc::{
    AddressSpace, AddressSpaceError, Context, ForkedChild, Pid, Platform, Process, ProcessTable,
    SpawnError, TrapFrame,
};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Counters shared by a [`FakePlatform`] and everything it creates.
#[derive(Default)]
pub struct Stats {
    pub live_spaces: AtomicUsize,
    pub activations: AtomicUsize,
    pub fail_copy: AtomicBool,
    pub fail_spawn: AtomicBool,
}

/// Address space that only counts how many of it are alive.
pub struct FakeSpace {
    pub generation: u32,
    stats: Arc<Stats>,
}

impl FakeSpace {
    pub fn new(stats: &Arc<Stats>) -> Self {
        stats.live_spaces.fetch_add(1, Ordering::SeqCst);
        Self {
            generation: 0,
            stats: Arc::clone(stats),
        }
    }
}

impl Drop for FakeSpace {
    fn drop(&mut self) {
        self.stats.live_spaces.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AddressSpace for FakeSpace {
    fn copy(&self) -> Result<Self, AddressSpaceError> {
        if self.stats.fail_copy.load(Ordering::SeqCst) {
            return Err(AddressSpaceError);
        }
        let mut copy = Self::new(&self.stats);
        copy.generation = self.generation + 1;
        Ok(copy)
    }

    fn activate(&self) {
        self.stats.activations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Hands every spawned child to the test through a channel instead of
/// running it.
pub struct FakePlatform {
    pub stats: Arc<Stats>,
    spawned: Mutex<Sender<ForkedChild<FakePlatform>>>,
    next_thread: AtomicU32,
}

impl Platform for FakePlatform {
    type AddressSpace = FakeSpace;
    type Vnode = Arc<str>;
    type Thread = u32;

    fn spawn_with_entry(
        &self,
        _name: &str,
        owner: &Arc<Process<Self>>,
        entry: ForkedChild<Self>,
    ) -> Result<u32, SpawnError> {
        assert!(Arc::ptr_eq(owner, entry.process()));
        if self.stats.fail_spawn.load(Ordering::SeqCst) {
            return Err(SpawnError::TooManyThreads);
        }
        self.spawned.lock().unwrap().send(entry).unwrap();
        Ok(self.next_thread.fetch_add(1, Ordering::SeqCst))
    }

    fn relax(&self) {
        thread::yield_now();
    }
}

pub struct Harness {
    pub table: Arc<ProcessTable<FakePlatform>>,
    pub children: Receiver<ForkedChild<FakePlatform>>,
    pub stats: Arc<Stats>,
}

impl Harness {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let stats = Arc::new(Stats::default());
        let platform = FakePlatform {
            stats: Arc::clone(&stats),
            spawned: Mutex::new(tx),
            next_thread: AtomicU32::new(100),
        };
        Self {
            table: Arc::new(ProcessTable::bootstrap(platform)),
            children: rx,
            stats,
        }
    }

    /// A user process with its own address space and cwd, child of the kernel.
    pub fn user_process(&self, name: &str, cwd: &Arc<str>) -> Pid {
        let p = self.table.create_process(name).unwrap();
        p.set_address_space(Some(FakeSpace::new(&self.stats)));
        p.set_cwd(Some(Arc::clone(cwd)));
        self.table.insert(p, Pid::KERNEL).unwrap().pid()
    }

    pub fn fork(&self, parent: Pid, tf: &TrapFrame) -> Pid {
        self.table.fork(&Context::new(parent, tf)).unwrap()
    }

    /// Run the next spawned child on a real thread: it resumes, sleeps for
    /// `delay` and exits with `code`.
    pub fn run_child(&self, code: i32, delay: Duration) -> thread::JoinHandle<TrapFrame> {
        let child = self.children.recv_timeout(Duration::from_secs(5)).unwrap();
        let table = Arc::clone(&self.table);
        thread::spawn(move || {
            let tf = child.prepare();
            let pid = child.pid();
            drop(child);
            thread::sleep(delay);
            table.exit(pid, code);
            tf
        })
    }
}

pub fn syscall_frame() -> TrapFrame {
    TrapFrame {
        rip: 0x0040_1a30,
        rsp: 0x7fff_ff00,
        rax: 2,
        rdx: 0xffff,
        rbx: 0x1111,
        r12: 0x1212,
        ..TrapFrame::default()
    }
}
