use kernel_sync::Semaphore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn try_p_consumes_available_counts_only() {
    let s = Semaphore::new(2);
    assert!(s.try_p());
    assert!(s.try_p());
    assert!(!s.try_p());
    assert_eq!(s.count(), 0);

    s.v();
    assert_eq!(s.count(), 1);
    assert!(s.try_p());
}

#[test]
fn p_blocks_until_v() {
    let s = Arc::new(Semaphore::new(0));
    let passed = Arc::new(AtomicBool::new(false));

    let waiter = {
        let s = Arc::clone(&s);
        let passed = Arc::clone(&passed);
        thread::spawn(move || {
            s.p_with(thread::yield_now);
            passed.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(20));
    assert!(!passed.load(Ordering::SeqCst), "p returned without a v");

    s.v();
    waiter.join().unwrap();
    assert!(passed.load(Ordering::SeqCst));
    assert_eq!(s.count(), 0);
}

#[test]
fn every_v_releases_exactly_one_waiter() {
    let waiters = 6;
    let s = Arc::new(Semaphore::new(0));
    let start = Arc::new(Barrier::new(waiters + 1));

    let handles: Vec<_> = (0..waiters)
        .map(|_| {
            let s = Arc::clone(&s);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                s.p_with(thread::yield_now);
            })
        })
        .collect();

    start.wait();
    for _ in 0..waiters {
        s.v();
    }
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(s.count(), 0);
}
