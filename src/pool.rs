//! Bounded render workers.
//!
//! [`WorkerPool`] runs tasks on a [rayon](https://docs.rs/rayon) thread pool
//! sized to its slot count, and gates submission with a slot counter:
//!
//! - [`WorkerPool::dispatch`] blocks until a slot is free, takes it, and hands
//!   the task to the pool.
//! - The slot is returned when the task ends, including when it panics.
//! - [`WorkerPool::wait_all`] is the completion barrier: it returns once every
//!   dispatched task has released its slot.
//!
//! Blocking in `dispatch` keeps a large dataset from queueing one closure per
//! entry up front; at most `capacity` tasks exist at any moment.
//!
//! Slot accounting is a [crossbeam](https://docs.rs/crossbeam) bounded
//! channel of unit tokens: sending takes a slot, receiving gives one back.

use crossbeam::channel::{Receiver, Sender, bounded};
use log::error;
use std::any::Any;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("worker pool needs at least one slot")]
    ZeroSlots,
    #[error("cannot start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Returns its slot on drop, so unwinding tasks give it back too.
struct SlotGuard(Receiver<()>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        // Every guard pairs with a token sent in `dispatch`, so this never blocks.
        let _ = self.0.recv();
    }
}

/// Runs tasks on a rayon pool, at most `capacity` at a time.
///
/// Slots are tokens in a bounded channel: a full channel means every slot is
/// taken. The pool owns both ends, so the channel never disconnects.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    taken_tx: Sender<()>,
    taken_rx: Receiver<()>,
    capacity: usize,
}

impl WorkerPool {
    /// Create a pool running at most `capacity` tasks at once.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroSlots);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(capacity)
            .thread_name(|i| format!("render-{i}"))
            .panic_handler(|payload| error!("render task panicked: {}", panic_message(&*payload)))
            .build()?;
        let (taken_tx, taken_rx) = bounded(capacity);
        Ok(Self {
            pool,
            taken_tx,
            taken_rx,
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tasks dispatched and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.taken_tx.len()
    }

    /// Start `task` once a slot is free. Blocks the caller until then.
    pub fn dispatch<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.taken_tx.send(()).is_err() {
            return;
        }
        let guard = SlotGuard(self.taken_rx.clone());
        self.pool.spawn(move || {
            let _guard = guard;
            task();
        });
    }

    /// Block until every dispatched task has finished.
    ///
    /// Takes every slot, which only succeeds once all running tasks have
    /// released theirs, then hands them back.
    pub fn wait_all(&self) {
        let mut taken = 0;
        while taken < self.capacity && self.taken_tx.send(()).is_ok() {
            taken += 1;
        }
        for _ in 0..taken {
            let _ = self.taken_rx.recv();
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn zero_capacity_is_error() {
        assert!(matches!(WorkerPool::new(0), Err(PoolError::ZeroSlots)));
    }

    #[test]
    fn wait_all_without_tasks_returns() {
        let pool = WorkerPool::new(4).unwrap();
        pool.wait_all();
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn runs_every_dispatched_task() {
        let pool = WorkerPool::new(3).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            let done = Arc::clone(&done);
            pool.dispatch(move || {
                done.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.wait_all();

        assert_eq!(done.load(Ordering::SeqCst), 50);
        assert_eq!(pool.in_flight(), 0);
    }

    fn peak_concurrency(capacity: usize, tasks: usize) -> usize {
        let pool = WorkerPool::new(capacity).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..tasks {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.dispatch(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(5));
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }
        pool.wait_all();
        peak.load(Ordering::SeqCst)
    }

    #[test]
    fn never_exceeds_capacity() {
        for capacity in [1, 2, 4] {
            let peak = peak_concurrency(capacity, 20);
            assert!(
                peak <= capacity,
                "peak {peak} exceeded capacity {capacity}"
            );
        }
    }

    #[test]
    fn single_slot_runs_serially() {
        assert_eq!(peak_concurrency(1, 10), 1);
    }

    #[test]
    fn in_flight_bounded_while_dispatching() {
        let pool = WorkerPool::new(2).unwrap();
        for _ in 0..10 {
            pool.dispatch(|| thread::sleep(Duration::from_millis(2)));
            assert!(pool.in_flight() <= pool.capacity());
        }
        pool.wait_all();
    }

    #[test]
    fn panicking_task_releases_its_slot() {
        let pool = WorkerPool::new(1).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        pool.dispatch(|| panic!("render blew up"));
        let after = Arc::clone(&done);
        // Would block forever if the panicking task kept the only slot.
        pool.dispatch(move || {
            after.fetch_add(1, Ordering::SeqCst);
        });
        pool.wait_all();

        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn wait_all_waits_for_running_task() {
        let pool = WorkerPool::new(2).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        let flag = Arc::clone(&done);
        pool.dispatch(move || {
            thread::sleep(Duration::from_millis(30));
            flag.store(1, Ordering::SeqCst);
        });
        assert_eq!(pool.in_flight(), 1);
        pool.wait_all();

        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn pool_is_reusable_after_wait_all() {
        let pool = WorkerPool::new(2).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            for _ in 0..5 {
                let done = Arc::clone(&done);
                pool.dispatch(move || {
                    done.fetch_add(1, Ordering::SeqCst);
                });
            }
            pool.wait_all();
        }

        assert_eq!(done.load(Ordering::SeqCst), 10);
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn panic_message_extracts_strings() {
        let literal: Box<dyn Any + Send> = Box::new("static message");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        let other: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(&*literal), "static message");
        assert_eq!(panic_message(&*owned), "owned message");
        assert_eq!(panic_message(&*other), "non-string panic payload");
    }
}
