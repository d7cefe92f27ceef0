//! A fixed-size worker pool with a FIFO task queue, built on a mutex and a
//! condition variable rather than a work-stealing scheduler — the engine
//! wants strict FIFO dequeue order and a simple, auditable drain contract.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use tracing::{error, info};

use crate::ingest::Buffer;

/// A task closure is handed a `&mut Buffer` owned by the worker that runs
/// it, rather than reaching for a thread-local: the buffer lives in the
/// worker's own stack frame (`worker_loop`'s local), so its lifetime is
/// governed directly by the worker thread's lifetime instead of a global.
type Task = Box<dyn FnOnce(&mut Buffer) + Send + 'static>;

enum Message {
    Run(Task),
    Shutdown,
}

struct Shared {
    queue: Mutex<std::collections::VecDeque<Message>>,
    condvar: Condvar,
}

/// A fixed-size pool of OS threads draining one shared FIFO queue.
///
/// Submissions are accepted in FIFO order and run in whatever order workers
/// happen to finish. Dropping or `join`ing the pool signals every worker to
/// stop once the queue drains and blocks until all of them exit — this is
/// the only shutdown path, and it never deadlocks as long as submitted
/// tasks don't themselves call back into the pool.
pub struct WorkerPool {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
    draining: Arc<AtomicBool>,
}

/// Returned by `submit` when called after the pool has begun draining.
#[derive(Debug)]
pub struct PoolClosed;

impl WorkerPool {
    /// Start `n` workers, each running a loop that dequeues and executes
    /// submitted closures. `n` must be at least 1.
    pub fn new(n: usize) -> WorkerPool {
        assert!(n >= 1, "worker pool requires at least one thread");

        let shared = Arc::new(Shared {
            queue: Mutex::new(std::collections::VecDeque::new()),
            condvar: Condvar::new(),
        });

        info!(threads = n, "starting worker pool");

        let handles = (0..n)
            .map(|worker_id| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || worker_loop(worker_id, shared))
            })
            .collect();

        WorkerPool {
            shared,
            handles,
            draining: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enqueue a task. Never blocks on a capacity limit — the queue is an
    /// unbounded FIFO — but returns `Err(PoolClosed)` once draining has
    /// begun instead of silently discarding the task.
    pub fn submit<F>(&self, task: F) -> Result<(), PoolClosed>
    where
        F: FnOnce(&mut Buffer) + Send + 'static,
    {
        if self.draining.load(Ordering::Acquire) {
            return Err(PoolClosed);
        }
        let mut queue = self.shared.queue.lock().unwrap();
        queue.push_back(Message::Run(Box::new(task)));
        self.shared.condvar.notify_one();
        Ok(())
    }

    /// Signal every worker to stop accepting new work once the queue drains,
    /// then block until all workers have joined.
    pub fn join(self) {
        // The real work happens in `Drop`; this is just a readable spelling
        // of "drain and wait" at call sites.
        drop(self);
    }

    fn shutdown(&mut self) {
        if self.draining.swap(true, Ordering::AcqRel) {
            return; // already shut down
        }
        {
            let mut queue = self.shared.queue.lock().unwrap();
            for _ in 0..self.handles.len() {
                queue.push_back(Message::Shutdown);
            }
            self.shared.condvar.notify_all();
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        info!("worker pool drained");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(worker_id: usize, shared: Arc<Shared>) {
    // Lazily created on first use, grown monotonically, reused across every
    // file this worker services, and dropped when the worker exits — the
    // buffer's lifetime is exactly this stack frame's lifetime.
    let mut buffer = Buffer::new();

    loop {
        let message = {
            let mut queue = shared.queue.lock().unwrap();
            while queue.is_empty() {
                queue = shared.condvar.wait(queue).unwrap();
            }
            queue.pop_front().unwrap()
        };

        match message {
            Message::Shutdown => break,
            Message::Run(task) => {
                // A task that panics must not poison the pool: catch it at
                // the worker boundary, log once, and keep draining the
                // queue rather than propagating the unwind.
                let result = panic::catch_unwind(AssertUnwindSafe(|| task(&mut buffer)));
                if let Err(payload) = result {
                    let msg = panic_message(&payload);
                    error!(worker_id, error = %msg, "worker task panicked, continuing");
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
