use kernel_sync::TicketLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn try_lock_fails_while_held_and_guard_releases() {
    let l = TicketLock::new(Vec::<u8>::new());
    let g = l.try_lock().expect("uncontended");
    assert!(l.is_locked());
    assert!(l.try_lock().is_none());
    drop(g);
    assert!(!l.is_locked());

    l.with_lock(|v| v.push(1));
    l.with_lock(|v| v.push(2));
    assert_eq!(l.into_inner(), vec![1, 2]);
}

#[test]
fn waiters_draw_tickets() {
    let l = Arc::new(TicketLock::new(0_u32));
    let waiting = Arc::new(AtomicBool::new(false));
    let g = l.lock();
    assert_eq!(l.raw().queued(), 1);

    let waiter = {
        let l = Arc::clone(&l);
        let waiting = Arc::clone(&waiting);
        thread::spawn(move || {
            waiting.store(true, Ordering::SeqCst);
            *l.lock() += 1;
        })
    };
    while !waiting.load(Ordering::SeqCst) || l.raw().queued() < 2 {
        thread::sleep(Duration::from_millis(1));
    }
    drop(g);
    waiter.join().unwrap();

    assert_eq!(l.raw().queued(), 0);
    assert_eq!(l.with_lock(|v| *v), 1);
}

#[test]
fn contended_writers_are_serialized() {
    let threads = 6;
    let iters = 2_000;
    let l = Arc::new(TicketLock::new(0_usize));
    let start = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let l = Arc::clone(&l);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                for _ in 0..iters {
                    *l.lock() += 1;
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(*l.lock(), threads * iters);
}
