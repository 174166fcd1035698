use std::collections::VecDeque;

/// A unit of work: a closure bundled with whatever state it captured.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A trait for the FIFO queue backing a thread pool.
///
/// Implementations carry no synchronization of their own; the pool
/// accesses the queue only while holding its internal lock.
///
/// # Notes
///
/// Jobs must come back out in the order they were put in. Queue order
/// is the only execution-order guarantee the pool makes.
pub trait TaskQueue: Send + 'static {
    /// Creates an empty queue.
    fn new() -> Self
    where
        Self: Sized;

    /// Returns `true` if no jobs are pending.
    fn is_empty(&self) -> bool;

    /// Appends a job at the tail.
    fn enqueue(&mut self, job: Job);

    /// Removes and returns the job at the head, or `None` if empty.
    fn dequeue(&mut self) -> Option<Job>;
}

impl TaskQueue for VecDeque<Job> {
    fn new() -> Self {
        VecDeque::new()
    }

    fn is_empty(&self) -> bool {
        VecDeque::is_empty(self)
    }

    fn enqueue(&mut self, job: Job) {
        self.push_back(job);
    }

    fn dequeue(&mut self) -> Option<Job> {
        self.pop_front()
    }
}
