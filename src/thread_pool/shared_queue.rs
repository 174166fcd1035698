use std::{
    collections::VecDeque,
    sync::{Arc, Condvar, Mutex, MutexGuard},
    thread::{self, JoinHandle},
};

use log::{debug, error};

use super::ShutdownMode;
use crate::{
    queue::{Job, TaskQueue},
    PoolError, Result,
};

/// A thread pool with a fixed set of workers sharing one FIFO job queue.
///
/// Idle workers block on a condition variable until a job is queued or
/// shutdown is requested. The pool is generic over its queue; the
/// default is a plain `VecDeque`.
pub struct SharedQueueThreadPool<Q: TaskQueue = VecDeque<Job>> {
    shared: Arc<Shared<Q>>,
    worker_count: u32,
}

struct State<Q> {
    queue: Q,
    shutting_down: bool,
    drain_on_shutdown: bool,
}

struct Shared<Q> {
    state: Mutex<State<Q>>,
    cond: Condvar,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl<Q: TaskQueue> Shared<Q> {
    // Jobs run with the state lock released, so poison here means a
    // worker died inside the critical section itself. Log and carry on
    // with the recovered guard rather than hang every other thread.
    fn lock_state(&self) -> MutexGuard<'_, State<Q>> {
        self.state.lock().unwrap_or_else(|poisoned| {
            error!("pool state lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn wait_for_work<'a>(&self, guard: MutexGuard<'a, State<Q>>) -> MutexGuard<'a, State<Q>> {
        self.cond.wait(guard).unwrap_or_else(|poisoned| {
            error!("pool state lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_workers(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.workers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SharedQueueThreadPool {
    /// Creates a pool with `threads` workers over the default
    /// `VecDeque` job queue.
    ///
    /// # Errors
    ///
    /// Fails if `threads` is zero or if a worker thread cannot be
    /// spawned.
    pub fn new(threads: u32) -> Result<Self> {
        Self::with_queue(threads)
    }

    /// Creates a pool with one worker per logical CPU on the host.
    pub fn with_default_workers() -> Result<Self> {
        Self::with_queue(num_cpus::get() as u32)
    }
}

impl<Q: TaskQueue> SharedQueueThreadPool<Q> {
    /// Creates a pool with `threads` workers over a custom job queue.
    ///
    /// Creation is transactional: if any worker thread fails to spawn,
    /// the workers that did start are shut down and joined before the
    /// error is returned, so no partially running pool escapes.
    pub fn with_queue(threads: u32) -> Result<Self> {
        if threads == 0 {
            return Err(PoolError::ZeroWorkers);
        }

        // Queue and synchronization primitives exist before any worker
        // starts, so no worker can observe uninitialized state.
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: Q::new(),
                shutting_down: false,
                drain_on_shutdown: false,
            }),
            cond: Condvar::new(),
            workers: Mutex::new(Vec::with_capacity(threads as usize)),
        });
        let mut pool = SharedQueueThreadPool {
            shared,
            worker_count: threads,
        };

        for i in 0..threads {
            let worker = Arc::clone(&pool.shared);
            let spawned = thread::Builder::new()
                .name(format!("workpool-worker-{}", i))
                .spawn(move || run_worker(worker));
            match spawned {
                Ok(handle) => pool.shared.lock_workers().push(handle),
                Err(e) => {
                    pool.shutdown(ShutdownMode::Abandon);
                    return Err(e.into());
                }
            }
        }
        Ok(pool)
    }

    /// Submits a job for execution by some idle worker.
    ///
    /// Jobs are executed in FIFO order relative to the shared queue;
    /// which worker runs which job is unspecified.
    ///
    /// # Errors
    ///
    /// Fails with [`PoolError::ShuttingDown`] once shutdown has been
    /// requested; the job is not enqueued and no worker is woken.
    pub fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.lock_state();
        if state.shutting_down {
            return Err(PoolError::ShuttingDown);
        }
        state.queue.enqueue(Box::new(job));
        self.shared.cond.notify_one();
        Ok(())
    }

    /// The number of workers, fixed at creation.
    pub fn worker_count(&self) -> u32 {
        self.worker_count
    }

    /// Stops the pool, blocking until every worker thread has exited.
    ///
    /// With [`ShutdownMode::Drain`] the workers first finish every job
    /// already queued; with [`ShutdownMode::Abandon`] queued jobs that
    /// never started are discarded unexecuted. Calling this on a pool
    /// that is already shutting down is a no-op.
    pub fn shutdown(&mut self, mode: ShutdownMode) {
        {
            let mut state = self.shared.lock_state();
            if state.shutting_down {
                return;
            }
            state.drain_on_shutdown = mode == ShutdownMode::Drain;
            state.shutting_down = true;
            self.shared.cond.notify_all();
        }

        // Workers can still register panic replacements until their own
        // handle is joined, so pop one at a time instead of draining the
        // registry in one shot.
        loop {
            let handle = self.shared.lock_workers().pop();
            match handle {
                Some(handle) => {
                    if handle.join().is_err() {
                        error!("worker thread exited by panic");
                    }
                }
                None => break,
            }
        }

        let mut state = self.shared.lock_state();
        let mut discarded = 0usize;
        while state.queue.dequeue().is_some() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!("discarded {} queued jobs", discarded);
        }
    }
}

impl<Q: TaskQueue> Drop for SharedQueueThreadPool<Q> {
    fn drop(&mut self) {
        self.shutdown(ShutdownMode::Drain);
    }
}

// Respawns the worker if a job panicked out of the loop, keeping the
// worker count fixed for the life of the pool.
struct Sentinel<Q: TaskQueue>(Arc<Shared<Q>>);

impl<Q: TaskQueue> Drop for Sentinel<Q> {
    fn drop(&mut self) {
        if !thread::panicking() {
            return;
        }
        error!("worker thread panicked while running a job");
        if self.0.lock_state().shutting_down {
            return;
        }
        let shared = Arc::clone(&self.0);
        match thread::Builder::new().spawn(move || run_worker(shared)) {
            Ok(handle) => self.0.lock_workers().push(handle),
            Err(e) => error!("Failed to spawn a thread: {}", e),
        }
    }
}

fn run_worker<Q: TaskQueue>(shared: Arc<Shared<Q>>) {
    let _sentinel = Sentinel(Arc::clone(&shared));
    loop {
        let mut state = shared.lock_state();
        while state.queue.is_empty() && !state.shutting_down {
            state = shared.wait_for_work(state);
        }
        // Draining workers keep serving the queue until it is empty;
        // abandoning workers leave queued jobs for teardown to discard.
        if state.shutting_down && (!state.drain_on_shutdown || state.queue.is_empty()) {
            break;
        }
        let job = match state.queue.dequeue() {
            Some(job) => job,
            // unreachable: the queue is non-empty and the lock is held
            None => continue,
        };
        drop(state);
        job();
    }
    debug!("Thread pool is shutting down, thread exits");
}
