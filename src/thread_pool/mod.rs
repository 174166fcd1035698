mod shared_queue;

pub use shared_queue::SharedQueueThreadPool;

/// How a pool treats jobs still queued when shutdown is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Finish every queued job before stopping the workers.
    Drain,
    /// Stop as soon as the jobs currently executing complete; queued
    /// jobs that never started are discarded unexecuted.
    Abandon,
}
